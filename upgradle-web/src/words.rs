//! Bundled dictionary.
use upgradle_game::WordBank;

const DICTIONARY_DATA: &str = include_str!("../static/assets/data/dictionary.json");

/// Load the bundled dictionary, degrading to the built-in fallback list.
#[must_use]
pub fn load_dictionary() -> WordBank {
    WordBank::load_or_fallback(DICTIONARY_DATA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use upgradle_game::{WordLength, WordSource};

    #[test]
    fn bundled_dictionary_parses_every_length() {
        let bank = WordBank::from_json(DICTIONARY_DATA).unwrap();
        for length in WordLength::ALL {
            assert!(bank.words(length).len() >= 50, "{length}-letter bucket too small");
        }
    }

    #[test]
    fn bundled_dictionary_includes_fallback_words() {
        let bank = load_dictionary();
        assert!(bank.is_valid_word("APPLE", WordLength::Five));
        assert!(bank.is_valid_word("crane", WordLength::Five));
        assert!(bank.is_valid_word("PLANET", WordLength::Six));
        assert!(bank.is_valid_word("ANALOGY", WordLength::Seven));
    }
}
