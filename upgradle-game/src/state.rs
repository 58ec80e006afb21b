use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::constants::{DEFAULT_GUESS_LIMIT, LOG_LIMIT, LOG_WELCOME};

/// Playable word lengths. Serialized as the bare number so snapshots read `5`, `6`, `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordLength {
    #[default]
    Five,
    Six,
    Seven,
}

impl WordLength {
    pub const ALL: [Self; 3] = [Self::Five, Self::Six, Self::Seven];

    #[must_use]
    pub const fn letters(self) -> usize {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
        }
    }

    #[must_use]
    pub const fn from_letters(letters: usize) -> Option<Self> {
        match letters {
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            7 => Some(Self::Seven),
            _ => None,
        }
    }

    /// Secondary-currency reward for solving a puzzle of this length.
    #[must_use]
    pub const fn word_reward(self) -> u32 {
        match self {
            Self::Five => 1,
            Self::Six => 2,
            Self::Seven => 3,
        }
    }
}

impl fmt::Display for WordLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letters())
    }
}

impl TryFrom<u8> for WordLength {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_letters(usize::from(value))
            .ok_or_else(|| format!("unsupported word length {value}"))
    }
}

impl From<WordLength> for u8 {
    fn from(value: WordLength) -> Self {
        match value {
            WordLength::Five => 5,
            WordLength::Six => 6,
            WordLength::Seven => 7,
        }
    }
}

/// Per-letter feedback. Variant order is informativeness: `Correct > Present > Miss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterMark {
    Miss,
    Present,
    Correct,
}

impl LetterMark {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miss => "miss",
            Self::Present => "present",
            Self::Correct => "correct",
        }
    }
}

impl fmt::Display for LetterMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted guess. Never modified after it is appended to the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessRow {
    pub id: String,
    pub word: String,
    pub marks: Vec<LetterMark>,
    pub payout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub money: f64,
    pub total_earned: f64,
    pub words: u32,
    pub unlocked_lengths: BTreeSet<WordLength>,
    pub selected_length: WordLength,
    pub guesses: Vec<GuessRow>,
    pub current_word: String,
    pub current_input: String,
    pub guess_limit: u32,
    pub puzzle_complete: bool,
    pub solved: bool,
    #[serde(default)]
    pub puzzle_status: Option<String>,
    #[serde(default)]
    pub upgrade_levels: BTreeMap<String, u32>,
    #[serde(default)]
    pub generator_levels: BTreeMap<String, u32>,
    pub payout_bonus: f64,
    pub payout_multiplier: f64,
    #[serde(default = "default_idle_multiplier")]
    pub idle_multiplier: f64,
    pub show_hot_cold: bool,
    #[serde(default)]
    pub hint_reveals: BTreeMap<usize, char>,
    pub puzzle_number: u32,
    pub puzzles_solved: u32,
    #[serde(default)]
    pub log: VecDeque<String>,
}

fn default_idle_multiplier() -> f64 {
    1.0
}

impl Default for GameState {
    /// Pristine economy with no active puzzle; see [`crate::puzzle::new_game`] for a playable state.
    fn default() -> Self {
        Self {
            money: 0.0,
            total_earned: 0.0,
            words: 0,
            unlocked_lengths: BTreeSet::from([WordLength::Five]),
            selected_length: WordLength::Five,
            guesses: Vec::new(),
            current_word: String::new(),
            current_input: String::new(),
            guess_limit: DEFAULT_GUESS_LIMIT,
            puzzle_complete: false,
            solved: false,
            puzzle_status: None,
            upgrade_levels: BTreeMap::new(),
            generator_levels: BTreeMap::new(),
            payout_bonus: 0.0,
            payout_multiplier: 1.0,
            idle_multiplier: default_idle_multiplier(),
            show_hot_cold: false,
            hint_reveals: BTreeMap::new(),
            puzzle_number: 0,
            puzzles_solved: 0,
            log: VecDeque::from([LOG_WELCOME.to_string()]),
        }
    }
}

impl GameState {
    /// Prepend a log line, evicting the oldest entries past [`LOG_LIMIT`].
    pub fn push_log(&mut self, entry: impl Into<String>) {
        self.log.push_front(entry.into());
        self.log.truncate(LOG_LIMIT);
    }

    #[must_use]
    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.upgrade_levels.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn generator_level(&self, id: &str) -> u32 {
        self.generator_levels.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn guesses_left(&self) -> u32 {
        let used = u32::try_from(self.guesses.len()).unwrap_or(u32::MAX);
        self.guess_limit.saturating_sub(used)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.puzzle_complete
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.money += amount;
        self.total_earned += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_newest_first_and_caps() {
        let mut state = GameState::default();
        for i in 0..12 {
            state.push_log(format!("entry {i}"));
        }
        assert_eq!(state.log.len(), LOG_LIMIT);
        assert_eq!(state.log.front().map(String::as_str), Some("entry 11"));
        assert_eq!(state.log.back().map(String::as_str), Some("entry 4"));
    }

    #[test]
    fn word_length_serializes_as_number() {
        let json = serde_json::to_string(&WordLength::Six).unwrap();
        assert_eq!(json, "6");
        let back: WordLength = serde_json::from_str("7").unwrap();
        assert_eq!(back, WordLength::Seven);
        assert!(serde_json::from_str::<WordLength>("4").is_err());
    }

    #[test]
    fn marks_order_by_informativeness() {
        assert!(LetterMark::Correct > LetterMark::Present);
        assert!(LetterMark::Present > LetterMark::Miss);
        assert_eq!(
            serde_json::to_string(&LetterMark::Present).unwrap(),
            "\"present\""
        );
    }

    #[test]
    fn guesses_left_counts_down() {
        let mut state = GameState::default();
        assert_eq!(state.guesses_left(), DEFAULT_GUESS_LIMIT);
        state.guesses.push(GuessRow {
            id: "1-0".into(),
            word: "CRANE".into(),
            marks: vec![LetterMark::Miss; 5],
            payout: 10.0,
        });
        assert_eq!(state.guesses_left(), DEFAULT_GUESS_LIMIT - 1);
    }
}
