use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::{Simulation, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    /// Mean solve rate across iterations that completed.
    pub solve_rate: f64,
    /// Mean lifetime earnings across iterations that completed.
    pub mean_earned: f64,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let outcome = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let avg_duration = if outcome.durations.is_empty() {
            Duration::ZERO
        } else {
            outcome.durations.iter().sum::<Duration>()
                / u32::try_from(outcome.durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: outcome.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: outcome.successes,
            failures: outcome.failures,
            average_duration: avg_duration,
            performance_data: outcome.durations,
            solve_rate: mean(&outcome.solve_rates),
            mean_earned: mean(&outcome.earnings),
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> IterationOutcome {
        let mut outcome = IterationOutcome::default();
        let simulation = match Simulation::new(plan.clone()) {
            Ok(simulation) => simulation,
            Err(err) => {
                outcome.failures.push(format!("setup failed: {err:#}"));
                return outcome;
            }
        };

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let verdict = simulation.run(iteration_seed).and_then(|summary| {
                plan.evaluate(&summary)?;
                Ok(summary)
            });

            match verdict {
                Ok(summary) => {
                    outcome.successes += 1;
                    let duration = start_time.elapsed();
                    outcome.durations.push(duration);
                    outcome.solve_rates.push(summary.solve_rate());
                    outcome.earnings.push(summary.total_earned);

                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                            i + 1,
                            iterations,
                            describe(&summary)
                        );
                    }
                }
                Err(err) => {
                    let message = format!("{err:#}");
                    outcome.failures.push(format!(
                        "Iteration {} (seed {iteration_seed}): {message}",
                        i + 1
                    ));
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            message.red()
                        );
                    }
                }
            }
        }

        outcome
    }
}

#[derive(Default)]
struct IterationOutcome {
    successes: usize,
    failures: Vec<String>,
    durations: Vec<Duration>,
    solve_rates: Vec<f64>,
    earnings: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = values.len() as f64;
    values.iter().sum::<f64>() / count
}

fn describe(summary: &SimulationSummary) -> String {
    format!(
        "solved:{}/{} guesses:{} earned:${:.0} upgrades:{} generators:{}",
        summary.puzzles_solved,
        summary.puzzles_played,
        summary.guesses_made,
        summary.total_earned,
        summary.upgrade_levels,
        summary.generators_owned
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{GuessPolicy, SpendPolicy};

    fn scenario(plan: SimulationPlan) -> TestScenario {
        TestScenario::simulation("Unit", plan)
    }

    #[test]
    fn passing_scenario_reports_every_seed() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard).with_puzzles(2);
        let results = LogicTester::new(false).run_scenario(&scenario(plan), &[1, 2], 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
        assert!(results.iter().all(|r| r.successful_iterations == 2));
        assert!(results.iter().all(|r| r.mean_earned > 0.0));
    }

    #[test]
    fn failed_expectation_marks_iteration() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard)
            .with_puzzles(1)
            .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> {
                anyhow::bail!("never satisfied")
            });
        let results = LogicTester::new(false).run_scenario(&scenario(plan), &[5], 3);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 3);
        assert!(result.failures[0].contains("never satisfied"));
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn durations_serialize_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Unit".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            performance_data: vec![Duration::from_millis(12)],
            solve_rate: 1.0,
            mean_earned: 10.0,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
        assert_eq!(json["performance_data"][0], 12);
    }
}
