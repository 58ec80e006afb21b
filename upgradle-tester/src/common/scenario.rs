//! Named simulation scenarios selectable from the command line.
use anyhow::{Result, ensure};

use crate::logic::{GuessPolicy, SimulationPlan, SimulationSummary, SpendPolicy};

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const SCENARIOS: [(&str, &str); 6] = [
    ("smoke", "Random guesses over a few puzzles; invariants only"),
    ("solver", "Consistent-candidate solver without spending"),
    ("economy", "Solver that buys upgrades and chases longer words"),
    ("idle", "Generator-only spending with passive ticks"),
    ("resume", "Persist mid-run and continue from the restored save"),
    ("hints", "Guaranteed hint reveals on every guess"),
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

/// Keys `all` expands to, in run order.
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|(key, _)| (*key).to_string()).collect()
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => TestScenario::simulation(
            "Smoke Test",
            SimulationPlan::new(GuessPolicy::Random, SpendPolicy::Hoard)
                .with_puzzles(3)
                .with_expectation(played_every_puzzle),
        ),
        "solver" => TestScenario::simulation(
            "Solver Accuracy",
            SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard)
                .with_puzzles(20)
                .with_expectation(played_every_puzzle)
                .with_expectation(solver_accuracy),
        ),
        "economy" => TestScenario::simulation(
            "Upgrade Economy",
            SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Upgrades)
                .with_puzzles(40)
                .chasing_longer_words()
                .with_expectation(played_every_puzzle)
                .with_expectation(economy_progress),
        ),
        "idle" => TestScenario::simulation(
            "Idle Income",
            SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Idle)
                .with_puzzles(20)
                .with_ticks(30)
                .with_expectation(idle_income),
        ),
        "resume" => TestScenario::simulation(
            "Save and Resume",
            SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Balanced)
                .with_puzzles(12)
                .with_ticks(5)
                .with_resume_after(6)
                .with_expectation(resumed_cleanly),
        ),
        "hints" => TestScenario::simulation(
            "Hint Reveals",
            SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard)
                .with_puzzles(10)
                .with_hint_chance(1.0)
                .with_expectation(played_every_puzzle),
        ),
        _ => return None,
    };
    Some(scenario)
}

fn played_every_puzzle(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.puzzles_played > 0, "no puzzles were played");
    ensure!(
        summary.guesses_made >= summary.puzzles_played,
        "only {} guesses over {} puzzles",
        summary.guesses_made,
        summary.puzzles_played
    );
    Ok(())
}

fn solver_accuracy(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.solve_rate() >= 0.75,
        "solver cleared only {:.0}% of puzzles",
        summary.solve_rate() * 100.0
    );
    Ok(())
}

fn economy_progress(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.upgrade_levels >= 3,
        "only {} upgrade levels bought after {} puzzles",
        summary.upgrade_levels,
        summary.puzzles_played
    );
    ensure!(summary.purchases > 0, "spender never bought anything");
    Ok(())
}

fn idle_income(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.generators_owned > 0, "no generator was bought");
    ensure!(summary.tick_income > 0.0, "ticks never paid out");
    Ok(())
}

fn resumed_cleanly(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.resumed == Some(true),
        "resume check result: {:?}",
        summary.resumed
    );
    Ok(())
}
