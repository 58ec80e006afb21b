//! Upgradle Game Engine
//!
//! Platform-agnostic core for the Upgradle word-guessing idle game. Every
//! transition goes through a pure reducer; word lists, storage and the clock are
//! supplied by the host through the traits below.

pub mod catalog;
pub mod constants;
pub mod effects;
pub mod evaluator;
pub mod math;
pub mod numbers;
pub mod persistence;
pub mod puzzle;
pub mod reducer;
pub mod state;
pub mod views;
pub mod words;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Generator, Upgrade, UpgradeEffect};
pub use constants::{LOG_LIMIT, STORAGE_KEY};
pub use effects::apply_upgrade_effect;
pub use evaluator::{Evaluation, evaluate_guess};
pub use math::{generator_cost, passive_income, total_upgrade_levels, upgrade_cost};
pub use persistence::{SnapshotError, encode_snapshot, merge_snapshot, restore_state, sanitize};
pub use puzzle::{finished_status, new_game, start_puzzle};
pub use reducer::{GameAction, ReduceContext, reduce};
pub use state::{GameState, GuessRow, LetterMark, WordLength};
pub use views::{
    BoardRow, HeatClass, RowKind, board_rows, generator_available, heat_class, keyboard_state,
    sorted_upgrades, upgrade_available, upgrade_tier_order, visible_generator_tiers,
};
pub use words::{WordBank, WordBankError};

/// Source of puzzle targets and the acceptance list for guesses.
pub trait WordSource {
    /// Pick a target of `length` letters. Repeats are allowed.
    fn pick_word(&self, length: WordLength, rng: &mut dyn RngCore) -> String;

    /// Whether `word` may be submitted as a guess at `length`.
    fn is_valid_word(&self, word: &str, length: WordLength) -> bool;
}

/// Key-value home for serialized game snapshots, supplied by the host
/// (`localStorage` in the browser, memory in tests).
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a serialized snapshot under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save_snapshot(&self, key: &str, snapshot: &str) -> Result<(), Self::Error>;

    /// Load the snapshot stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load_snapshot(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Delete the snapshot stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be removed.
    fn delete_snapshot(&self, key: &str) -> Result<(), Self::Error>;
}

/// Notified after every transition that changed state.
pub trait StateObserver {
    fn on_transition(&mut self, previous: &GameState, next: &GameState, action: &GameAction);
}

impl<F> StateObserver for F
where
    F: FnMut(&GameState, &GameState, &GameAction),
{
    fn on_transition(&mut self, previous: &GameState, next: &GameState, action: &GameAction) {
        self(previous, next, action);
    }
}

/// Tunables a host may override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hint_chance: f64,
    pub tick_interval_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hint_chance: constants::DEFAULT_HINT_CHANCE,
            tick_interval_ms: constants::DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

/// Main game engine owning the live state
pub struct GameEngine<W, S>
where
    W: WordSource,
    S: GameStorage,
{
    words: W,
    storage: S,
    catalog: Catalog,
    config: EngineConfig,
    rng: ChaCha20Rng,
    state: GameState,
    observers: Vec<Box<dyn StateObserver>>,
}

impl<W, S> GameEngine<W, S>
where
    W: WordSource,
    S: GameStorage,
{
    /// Create an engine with a brand-new game, ignoring any saved snapshot
    pub fn new(words: W, storage: S, catalog: Catalog, config: EngineConfig, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = new_game(&words, &mut rng);
        Self {
            words,
            storage,
            catalog,
            config,
            rng,
            state,
            observers: Vec::new(),
        }
    }

    /// Create an engine resuming the stored snapshot, or a new game if there is none
    pub fn restore_or_new(
        words: W,
        storage: S,
        catalog: Catalog,
        config: EngineConfig,
        seed: u64,
    ) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let snapshot = storage.load_snapshot(STORAGE_KEY).unwrap_or_else(|err| {
            log::warn!("Failed to read saved game: {err}");
            None
        });
        let state = restore_state(snapshot.as_deref(), &words, &mut rng);
        Self {
            words,
            storage,
            catalog,
            config,
            rng,
            state,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn words(&self) -> &W {
        &self.words
    }

    pub fn subscribe(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    /// Apply `action`, persist the result if it changed, and notify observers.
    pub fn dispatch(&mut self, action: &GameAction) -> &GameState {
        let mut ctx = ReduceContext {
            catalog: &self.catalog,
            words: &self.words,
            rng: &mut self.rng,
            hint_chance: self.config.hint_chance,
        };
        let next = reduce(&self.state, action, &mut ctx);
        if next != self.state {
            let previous = std::mem::replace(&mut self.state, next);
            self.save_quietly();
            for observer in &mut self.observers {
                observer.on_transition(&previous, &self.state, action);
            }
        }
        &self.state
    }

    /// Discard the save and start over. The fresh game is saved and observers
    /// see a [`GameAction::Reset`] transition.
    pub fn reset(&mut self) -> &GameState {
        if let Err(err) = self.storage.delete_snapshot(STORAGE_KEY) {
            log::warn!("Failed to delete saved game: {err}");
        }
        self.dispatch(&GameAction::Reset)
    }

    /// Write the current state to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or the storage write fails.
    pub fn persist(&self) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let snapshot = encode_snapshot(&self.state)?;
        self.storage
            .save_snapshot(STORAGE_KEY, &snapshot)
            .map_err(Into::into)
    }

    fn save_quietly(&self) {
        match encode_snapshot(&self.state) {
            Ok(snapshot) => {
                if let Err(err) = self.storage.save_snapshot(STORAGE_KEY, &snapshot) {
                    log::warn!("Failed to save game: {err}");
                }
            }
            Err(err) => log::warn!("Failed to encode game: {err}"),
        }
    }
}
