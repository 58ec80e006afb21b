//! In-memory dictionary bucketed by word length.
use rand::RngCore;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::WordSource;
use crate::state::WordLength;

/// Minimal word list used when the real dictionary cannot be loaded.
pub const FALLBACK_WORDS: [(WordLength, [&str; 5]); 3] = [
    (
        WordLength::Five,
        ["CRANE", "SLATE", "PRIZE", "CHORD", "MONTH"],
    ),
    (
        WordLength::Six,
        ["PLANET", "STREAM", "GARNET", "THRIVE", "BUNDLE"],
    ),
    (
        WordLength::Seven,
        ["CAPTURE", "VICTORY", "ANALOGY", "PRAISED", "MYSTERY"],
    ),
];

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("dictionary JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dictionary has no usable {0}-letter words")]
    EmptyBucket(WordLength),
}

#[derive(Debug, Clone, Default)]
pub struct WordBank {
    buckets: BTreeMap<WordLength, Vec<String>>,
    valid: HashSet<String>,
}

impl WordBank {
    /// Parse a `{"5": [...], "6": [...], "7": [...]}` dictionary document.
    ///
    /// Entries are uppercased; words with non-letters or the wrong length are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any playable length ends up empty.
    pub fn from_json(json: &str) -> Result<Self, WordBankError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut bank = Self::default();
        for (key, words) in raw {
            let Some(length) = key.trim().parse().ok().and_then(WordLength::from_letters) else {
                log::debug!("ignoring dictionary bucket `{key}`");
                continue;
            };
            for word in words {
                bank.insert(length, &word);
            }
        }
        bank.ensure_complete()?;
        Ok(bank)
    }

    /// Build a dictionary from a flat word list, dropping duplicates and simple plurals
    /// (`…IES` over `…Y`, `…ES` or `…S` over a listed singular).
    ///
    /// # Errors
    ///
    /// Returns an error if any playable length ends up empty.
    pub fn from_word_list<'a>(words: impl IntoIterator<Item = &'a str>) -> Result<Self, WordBankError> {
        let uppercase: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_uppercase()))
            .collect();
        let all: HashSet<&str> = uppercase.iter().map(String::as_str).collect();

        let mut bank = Self::default();
        for word in &uppercase {
            if is_simple_plural(word, &all) {
                continue;
            }
            if let Some(length) = WordLength::from_letters(word.len()) {
                bank.insert(length, word);
            }
        }
        bank.ensure_complete()?;
        Ok(bank)
    }

    /// The built-in fallback list.
    #[must_use]
    pub fn fallback() -> Self {
        let mut bank = Self::default();
        for (length, words) in FALLBACK_WORDS {
            for word in words {
                bank.insert(length, word);
            }
        }
        bank
    }

    /// Parse `json`, degrading to [`WordBank::fallback`] with a warning on failure.
    #[must_use]
    pub fn load_or_fallback(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            log::warn!("Failed to load dictionary, falling back to minimal list: {err}");
            Self::fallback()
        })
    }

    #[must_use]
    pub fn words(&self, length: WordLength) -> &[String] {
        self.buckets.get(&length).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }

    fn insert(&mut self, length: WordLength, word: &str) {
        let upper = word.trim().to_ascii_uppercase();
        if upper.len() != length.letters() || !upper.chars().all(|c| c.is_ascii_uppercase()) {
            return;
        }
        if self.valid.insert(upper.clone()) {
            self.buckets.entry(length).or_default().push(upper);
        }
    }

    fn ensure_complete(&self) -> Result<(), WordBankError> {
        match WordLength::ALL
            .into_iter()
            .find(|length| self.words(*length).is_empty())
        {
            Some(length) => Err(WordBankError::EmptyBucket(length)),
            None => Ok(()),
        }
    }
}

fn is_simple_plural(word: &str, all: &HashSet<&str>) -> bool {
    if word.len() <= 3 {
        return false;
    }
    if let Some(stem) = word.strip_suffix("IES")
        && all.contains(format!("{stem}Y").as_str())
    {
        return true;
    }
    if let Some(stem) = word.strip_suffix("ES")
        && all.contains(stem)
    {
        return true;
    }
    word.strip_suffix('S').is_some_and(|stem| all.contains(stem))
}

fn fallback_word(length: WordLength) -> String {
    FALLBACK_WORDS
        .iter()
        .find(|(l, _)| *l == length)
        .map_or_else(String::new, |(_, words)| words[0].to_string())
}

impl WordSource for WordBank {
    fn pick_word(&self, length: WordLength, rng: &mut dyn RngCore) -> String {
        self.words(length)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| fallback_word(length))
    }

    fn is_valid_word(&self, word: &str, length: WordLength) -> bool {
        word.len() == length.letters() && self.valid.contains(&word.to_ascii_uppercase())
    }
}
