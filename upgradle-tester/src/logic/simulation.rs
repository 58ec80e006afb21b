//! Drives a [`GameEngine`] with bot policies and audits every transition.
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use upgradle_game::{
    Catalog, EngineConfig, GameAction, GameEngine, GameState, GameStorage, LOG_LIMIT, STORAGE_KEY,
    WordBank, WordLength, passive_income, total_upgrade_levels,
};
use upgradle_game::numbers::u64_to_f64;

use super::policy::{GuessPolicy, Purchase, SpendPolicy};

const DICTIONARY_DATA: &str =
    include_str!("../../../upgradle-web/static/assets/data/dictionary.json");
const POLICY_SALT: u64 = 0x5EED_B075;
const MAX_GUESSES_PER_PUZZLE: u32 = 16;
const MAX_PURCHASES_PER_VISIT: u32 = 64;
const MAX_VIOLATIONS: usize = 32;
const MONEY_EPSILON: f64 = 1e-6;

/// In-memory snapshot store shared between an engine and its restored successor.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl GameStorage for MemoryStorage {
    type Error = Infallible;

    fn save_snapshot(&self, key: &str, snapshot: &str) -> Result<(), Self::Error> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn load_snapshot(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn delete_snapshot(&self, key: &str) -> Result<(), Self::Error> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

type SimEngine = GameEngine<WordBank, MemoryStorage>;

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn = Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Declarative plan for one simulated session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub puzzles: u32,
    pub guesser: GuessPolicy,
    pub spender: SpendPolicy,
    pub ticks_per_puzzle: u32,
    /// Switch to the longest unlocked length whenever one opens up.
    pub chase_longer_words: bool,
    /// Persist and reload the engine after this many puzzles.
    pub resume_after: Option<u32>,
    pub hint_chance: Option<f64>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(guesser: GuessPolicy, spender: SpendPolicy) -> Self {
        Self {
            puzzles: 10,
            guesser,
            spender,
            ticks_per_puzzle: 0,
            chase_longer_words: false,
            resume_after: None,
            hint_chance: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_puzzles(mut self, puzzles: u32) -> Self {
        self.puzzles = puzzles;
        self
    }

    #[must_use]
    pub const fn with_ticks(mut self, ticks_per_puzzle: u32) -> Self {
        self.ticks_per_puzzle = ticks_per_puzzle;
        self
    }

    #[must_use]
    pub const fn chasing_longer_words(mut self) -> Self {
        self.chase_longer_words = true;
        self
    }

    #[must_use]
    pub const fn with_resume_after(mut self, puzzles: u32) -> Self {
        self.resume_after = Some(puzzles);
        self
    }

    #[must_use]
    pub const fn with_hint_chance(mut self, chance: f64) -> Self {
        self.hint_chance = Some(chance);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }

    /// First failing expectation, if any. Audit violations always fail.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        if let Some(first) = summary.violations.first() {
            bail!(
                "{} invariant violation(s), first: {first}",
                summary.violations.len()
            );
        }
        self.expectations
            .iter()
            .try_for_each(|expectation| expectation.evaluate(summary))
    }
}

/// Outcome of one seeded simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub puzzles_played: u32,
    pub puzzles_solved: u32,
    pub guesses_made: u32,
    pub upgrade_levels: u32,
    pub generators_owned: u32,
    pub purchases: u32,
    pub ticks: u32,
    pub tick_income: f64,
    pub final_money: f64,
    pub total_earned: f64,
    pub words: u32,
    pub longest_length: usize,
    pub resumed: Option<bool>,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    pub fn solve_rate(&self) -> f64 {
        if self.puzzles_played == 0 {
            0.0
        } else {
            f64::from(self.puzzles_solved) / f64::from(self.puzzles_played)
        }
    }

    fn flag(&mut self, message: String) {
        if self.violations.len() < MAX_VIOLATIONS {
            log::debug!("seed {}: {message}", self.seed);
            self.violations.push(message);
        }
    }
}

/// Bundled dictionary, parsed once per simulation.
pub fn bundled_dictionary() -> Result<WordBank> {
    WordBank::from_json(DICTIONARY_DATA).context("bundled dictionary failed to load")
}

pub struct Simulation {
    plan: SimulationPlan,
    bank: WordBank,
    catalog: Catalog,
}

impl Simulation {
    pub fn new(plan: SimulationPlan) -> Result<Self> {
        Ok(Self {
            plan,
            bank: bundled_dictionary()?,
            catalog: Catalog::load_from_static(),
        })
    }

    fn config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(chance) = self.plan.hint_chance {
            config.hint_chance = chance;
        }
        config
    }

    pub fn run(&self, seed: u64) -> Result<SimulationSummary> {
        let storage = MemoryStorage::default();
        let mut engine = GameEngine::new(
            self.bank.clone(),
            storage.clone(),
            self.catalog.clone(),
            self.config(),
            seed,
        );
        let mut rng = ChaCha20Rng::seed_from_u64(seed ^ POLICY_SALT);
        let mut summary = SimulationSummary {
            seed,
            ..SimulationSummary::default()
        };

        for puzzle in 0..self.plan.puzzles {
            self.play_puzzle(&mut engine, &mut rng, &mut summary)?;
            self.run_ticks(&mut engine, &mut summary);
            self.go_shopping(&mut engine, &mut summary);

            if self.plan.resume_after == Some(puzzle + 1) {
                engine = self.resume(&engine, &storage, seed, &mut summary)?;
            }

            if puzzle + 1 < self.plan.puzzles {
                self.advance(&mut engine, &mut summary);
            }
        }

        let state = engine.state();
        summary.upgrade_levels = total_upgrade_levels(state);
        summary.generators_owned = state.generator_levels.values().sum();
        summary.final_money = state.money;
        summary.total_earned = state.total_earned;
        summary.words = state.words;
        summary.longest_length = state
            .unlocked_lengths
            .iter()
            .map(|length| length.letters())
            .max()
            .unwrap_or(0);
        Ok(summary)
    }

    fn dispatch(&self, engine: &mut SimEngine, action: &GameAction, summary: &mut SimulationSummary) {
        let before = engine.state().clone();
        let after = engine.dispatch(action);
        for problem in audit_transition(&before, after, action, &self.catalog) {
            summary.flag(problem);
        }
    }

    fn play_puzzle(
        &self,
        engine: &mut SimEngine,
        rng: &mut ChaCha20Rng,
        summary: &mut SimulationSummary,
    ) -> Result<()> {
        let mut attempts = 0;
        while engine.state().is_active() {
            if attempts >= MAX_GUESSES_PER_PUZZLE {
                summary.flag(format!(
                    "puzzle {} still active after {attempts} guesses",
                    engine.state().puzzle_number
                ));
                break;
            }
            attempts += 1;
            let Some(word) = self.plan.guesser.next_guess(engine.state(), &self.bank, rng) else {
                bail!("no {}-letter words to guess", engine.state().selected_length);
            };
            for letter in word.chars() {
                self.dispatch(engine, &GameAction::InputLetter(letter), summary);
            }
            let rows = engine.state().guesses.len();
            self.dispatch(engine, &GameAction::SubmitGuess, summary);
            if engine.state().guesses.len() > rows {
                summary.guesses_made += 1;
            } else {
                summary.flag(format!("dictionary word {word} was rejected"));
            }
        }
        summary.puzzles_played += 1;
        if engine.state().solved {
            summary.puzzles_solved += 1;
        }
        Ok(())
    }

    fn run_ticks(&self, engine: &mut SimEngine, summary: &mut SimulationSummary) {
        for _ in 0..self.plan.ticks_per_puzzle {
            let before = engine.state().money;
            self.dispatch(engine, &GameAction::Tick, summary);
            summary.ticks += 1;
            summary.tick_income += engine.state().money - before;
        }
    }

    fn go_shopping(&self, engine: &mut SimEngine, summary: &mut SimulationSummary) {
        for round in 0..MAX_PURCHASES_PER_VISIT {
            let Some(purchase) = self
                .plan
                .spender
                .next_purchase(engine.state(), &self.catalog, round)
            else {
                return;
            };
            let action = match &purchase {
                Purchase::Upgrade { id, .. } => GameAction::BuyUpgrade(id.clone()),
                Purchase::Generator { id, .. } => GameAction::BuyGenerator(id.clone()),
            };
            let before = engine.state().money;
            self.dispatch(engine, &action, summary);
            let expected = before - u64_to_f64(purchase.cost());
            let after = engine.state().money;
            if (after - expected).abs() > MONEY_EPSILON {
                summary.flag(format!(
                    "{purchase:?} left ${after:.2}, expected ${expected:.2}"
                ));
                return;
            }
            summary.purchases += 1;
        }
    }

    fn advance(&self, engine: &mut SimEngine, summary: &mut SimulationSummary) {
        let selected = engine.state().selected_length;
        let longest = engine.state().unlocked_lengths.iter().next_back().copied();
        match longest {
            Some(length) if self.plan.chase_longer_words && length != selected => {
                self.dispatch(engine, &GameAction::SetLength(length), summary);
            }
            _ => self.dispatch(engine, &GameAction::StartNextPuzzle, summary),
        }
    }

    fn resume(
        &self,
        engine: &SimEngine,
        storage: &MemoryStorage,
        seed: u64,
        summary: &mut SimulationSummary,
    ) -> Result<SimEngine> {
        engine.persist()?;
        if storage.load_snapshot(STORAGE_KEY)?.is_none() {
            bail!("persist left no snapshot under {STORAGE_KEY}");
        }
        let restored = GameEngine::restore_or_new(
            self.bank.clone(),
            storage.clone(),
            self.catalog.clone(),
            self.config(),
            seed.rotate_left(17),
        );
        let matches = restored.state() == engine.state();
        if !matches {
            summary.flag(format!(
                "restored state diverged at puzzle {}",
                engine.state().puzzle_number
            ));
        }
        summary.resumed = Some(matches);
        Ok(restored)
    }
}

/// Check the invariants every reachable state must hold, plus the
/// per-action guarantees that can be observed from outside the reducer.
pub fn audit_transition(
    before: &GameState,
    after: &GameState,
    action: &GameAction,
    catalog: &Catalog,
) -> Vec<String> {
    let mut problems = audit_state(after, catalog);
    let letters = after.selected_length.letters();

    match action {
        GameAction::Tick => {
            let expected = passive_income(before, &catalog.generators);
            let delta = after.money - before.money;
            if (delta - expected).abs() > MONEY_EPSILON {
                problems.push(format!("tick paid ${delta:.2}, income is ${expected:.2}"));
            }
        }
        GameAction::SubmitGuess if after.guesses.len() > before.guesses.len() => {
            if let Some(row) = after.guesses.last() {
                let credited = after.total_earned - before.total_earned;
                if (credited - row.payout).abs() > MONEY_EPSILON {
                    problems.push(format!(
                        "guess {} paid ${:.2} but credited ${credited:.2}",
                        row.word, row.payout
                    ));
                }
            }
            if after.solved && after.words <= before.words {
                problems.push("solve did not award words".to_string());
            }
        }
        GameAction::SetLength(length) if after != before => {
            if after.selected_length != *length || after.current_word.len() != letters {
                problems.push(format!("length switch to {length} left a stale puzzle"));
            }
        }
        _ => {}
    }

    if after.money < before.money
        && !matches!(action, GameAction::BuyUpgrade(_) | GameAction::BuyGenerator(_))
    {
        problems.push(format!("{action:?} spent money"));
    }
    problems
}

/// Structural invariants of a single state.
pub fn audit_state(state: &GameState, catalog: &Catalog) -> Vec<String> {
    let mut problems = Vec::new();
    let letters = state.selected_length.letters();

    if !state.money.is_finite() || state.money < -MONEY_EPSILON {
        problems.push(format!("money is ${}", state.money));
    }
    if state.total_earned + MONEY_EPSILON < state.money {
        problems.push("money exceeds lifetime earnings".to_string());
    }
    if !state.unlocked_lengths.contains(&WordLength::Five) {
        problems.push("5-letter words were locked".to_string());
    }
    if !state.unlocked_lengths.contains(&state.selected_length) {
        problems.push(format!("selected length {} is locked", state.selected_length));
    }
    if state.current_word.len() != letters {
        problems.push(format!("target {} has the wrong length", state.current_word));
    }
    if state.current_input.len() > letters {
        problems.push(format!("input {} overflows the row", state.current_input));
    }
    if state.guesses.len() > usize::try_from(state.guess_limit).unwrap_or(usize::MAX) {
        problems.push("more guesses than the limit".to_string());
    }
    if state.log.len() > LOG_LIMIT {
        problems.push(format!("log holds {} entries", state.log.len()));
    }
    if state.solved && !state.puzzle_complete {
        problems.push("solved puzzle is still active".to_string());
    }
    for row in &state.guesses {
        if row.word.len() != letters || row.marks.len() != letters {
            problems.push(format!("row {} does not match the length", row.id));
        }
        if row.payout < 0.0 {
            problems.push(format!("row {} paid a negative amount", row.id));
        }
    }
    for upgrade in &catalog.upgrades {
        let level = state.upgrade_level(&upgrade.id);
        if upgrade.max_level.is_some_and(|max| level > max) {
            problems.push(format!("{} is above its max level", upgrade.id));
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_passes_audit() {
        let bank = bundled_dictionary().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let state = upgradle_game::new_game(&bank, &mut rng);
        assert!(audit_state(&state, &Catalog::load_from_static()).is_empty());
    }

    #[test]
    fn audit_catches_overspent_money() {
        let bank = bundled_dictionary().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut state = upgradle_game::new_game(&bank, &mut rng);
        state.money = -5.0;
        let problems = audit_state(&state, &Catalog::load_from_static());
        assert!(problems.iter().any(|p| p.contains("money is")));
    }

    #[test]
    fn solver_run_is_clean_and_deterministic() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard).with_puzzles(4);
        let sim = Simulation::new(plan).unwrap();
        let first = sim.run(42).unwrap();
        let second = sim.run(42).unwrap();
        assert!(first.violations.is_empty(), "{:?}", first.violations);
        assert_eq!(first.puzzles_played, 4);
        assert_eq!(first.guesses_made, second.guesses_made);
        assert!((first.total_earned - second.total_earned).abs() < f64::EPSILON);
    }

    #[test]
    fn expectations_see_the_summary() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard)
            .with_puzzles(1)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                anyhow::ensure!(summary.purchases > 0, "bought nothing");
                Ok(())
            });
        let summary = Simulation::new(plan.clone()).unwrap().run(3).unwrap();
        let err = plan.evaluate(&summary).unwrap_err();
        assert!(err.to_string().contains("bought nothing"));
    }

    #[test]
    fn violations_fail_evaluation() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Hoard);
        let summary = SimulationSummary {
            violations: vec!["money is $-1".to_string()],
            ..SimulationSummary::default()
        };
        assert!(plan.evaluate(&summary).is_err());
    }

    #[test]
    fn resume_round_trips_through_storage() {
        let plan = SimulationPlan::new(GuessPolicy::Solver, SpendPolicy::Upgrades)
            .with_puzzles(3)
            .with_resume_after(2);
        let summary = Simulation::new(plan).unwrap().run(9).unwrap();
        assert_eq!(summary.resumed, Some(true));
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }
}
