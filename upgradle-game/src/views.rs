//! Read-only projections of [`GameState`] for rendering.
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, Generator, Upgrade};
use crate::constants::{HEAT_HOT_DISTANCE, HEAT_WARM_DISTANCE, tier_requirement};
use crate::math::{generator_cost, total_upgrade_levels, upgrade_cost};
use crate::numbers::u64_to_f64;
use crate::state::{GameState, LetterMark};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Guess,
    Current,
    Empty,
}

/// One line of the board. `word` is always `selected_length` characters, padded with spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub id: String,
    pub kind: RowKind,
    pub word: String,
    pub marks: Vec<LetterMark>,
    pub payout: f64,
}

/// Submitted guesses, then the in-progress row (while the puzzle is live), then blanks
/// until the board holds `guess_limit` rows.
#[must_use]
pub fn board_rows(state: &GameState) -> Vec<BoardRow> {
    let letters = state.selected_length.letters();
    let mut rows: Vec<BoardRow> = state
        .guesses
        .iter()
        .map(|guess| BoardRow {
            id: guess.id.clone(),
            kind: RowKind::Guess,
            word: guess.word.clone(),
            marks: guess.marks.clone(),
            payout: guess.payout,
        })
        .collect();

    if !state.puzzle_complete {
        rows.push(BoardRow {
            id: "current".into(),
            kind: RowKind::Current,
            word: format!("{:<letters$}", state.current_input),
            marks: vec![LetterMark::Miss; letters],
            payout: 0.0,
        });
    }

    let limit = usize::try_from(state.guess_limit).unwrap_or(usize::MAX);
    while rows.len() < limit {
        rows.push(BoardRow {
            id: format!("empty-{}", rows.len()),
            kind: RowKind::Empty,
            word: " ".repeat(letters),
            marks: vec![LetterMark::Miss; letters],
            payout: 0.0,
        });
    }
    rows
}

/// Most informative mark seen for each guessed letter.
#[must_use]
pub fn keyboard_state(state: &GameState) -> BTreeMap<char, LetterMark> {
    let mut status: BTreeMap<char, LetterMark> = BTreeMap::new();
    for guess in &state.guesses {
        for (letter, mark) in guess.word.chars().zip(&guess.marks) {
            if letter.is_whitespace() {
                continue;
            }
            let slot = status.entry(letter.to_ascii_uppercase()).or_insert(*mark);
            if *mark > *slot {
                *slot = *mark;
            }
        }
    }
    status
}

/// Upgrades ordered by word cost, then base cost.
#[must_use]
pub fn sorted_upgrades(catalog: &Catalog) -> Vec<&Upgrade> {
    let mut upgrades: Vec<&Upgrade> = catalog.upgrades.iter().collect();
    upgrades.sort_by(|a, b| {
        a.word_cost
            .unwrap_or(0)
            .cmp(&b.word_cost.unwrap_or(0))
            .then(a.base_cost.total_cmp(&b.base_cost))
    });
    upgrades
}

/// Distinct upgrade tiers, ascending.
#[must_use]
pub fn upgrade_tier_order(catalog: &Catalog) -> Vec<u32> {
    catalog
        .upgrades
        .iter()
        .map(|u| u.tier)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Generator tiers shown in the shop: every tier up to one past the highest owned.
#[must_use]
pub fn visible_generator_tiers(state: &GameState, catalog: &Catalog) -> Vec<u32> {
    let highest_owned = catalog
        .generators
        .iter()
        .filter(|g| state.generator_level(&g.id) > 0)
        .map(|g| g.tier)
        .max()
        .unwrap_or(0);
    let highest_visible = (highest_owned + 1).max(1);
    catalog
        .generators
        .iter()
        .map(|g| g.tier)
        .filter(|tier| *tier <= highest_visible)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatClass {
    Hot,
    Warm,
    Cold,
}

impl HeatClass {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Hot => "heat-hot",
            Self::Warm => "heat-warm",
            Self::Cold => "heat-cold",
        }
    }
}

/// Alphabet-distance hint used instead of colours once hot/cold mode is online.
#[must_use]
pub fn heat_class(letter: Option<char>, target: Option<char>) -> HeatClass {
    let (Some(letter), Some(target)) = (letter, target) else {
        return HeatClass::Cold;
    };
    if !letter.is_ascii_alphabetic() || !target.is_ascii_alphabetic() {
        return HeatClass::Cold;
    }
    let distance = u32::from(letter.to_ascii_uppercase()).abs_diff(u32::from(target.to_ascii_uppercase()));
    if distance <= HEAT_HOT_DISTANCE {
        HeatClass::Hot
    } else if distance <= HEAT_WARM_DISTANCE {
        HeatClass::Warm
    } else {
        HeatClass::Cold
    }
}

/// Whether `BuyUpgrade(upgrade.id)` would succeed right now.
#[must_use]
pub fn upgrade_available(state: &GameState, upgrade: &Upgrade) -> bool {
    let level = state.upgrade_level(&upgrade.id);
    let below_max = upgrade.max_level.is_none_or(|max| level < max);
    let prereq_met = upgrade
        .requires
        .as_deref()
        .is_none_or(|req| state.upgrade_level(req) > 0);
    below_max
        && prereq_met
        && total_upgrade_levels(state) >= tier_requirement(upgrade.tier)
        && state.money >= u64_to_f64(upgrade_cost(upgrade, level))
        && state.words >= upgrade.word_cost.unwrap_or(0)
}

/// Whether `BuyGenerator(generator.id)` would succeed right now.
#[must_use]
pub fn generator_available(state: &GameState, generator: &Generator) -> bool {
    let prereq_met = generator
        .requires
        .as_deref()
        .is_none_or(|req| state.generator_level(req) > 0);
    prereq_met
        && state.money >= u64_to_f64(generator_cost(generator, state.generator_level(&generator.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GuessRow;
    use crate::state::LetterMark::{Correct, Miss, Present};

    fn with_guess(word: &str, marks: Vec<LetterMark>) -> GameState {
        let mut state = GameState::default();
        state.guesses.push(GuessRow {
            id: "1-0".into(),
            word: word.into(),
            marks,
            payout: 12.0,
        });
        state
    }

    #[test]
    fn board_pads_to_guess_limit() {
        let mut state = with_guess("CRANE", vec![Miss, Present, Miss, Miss, Correct]);
        state.current_input = "AP".into();
        let rows = board_rows(&state);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].kind, RowKind::Guess);
        assert_eq!(rows[1].kind, RowKind::Current);
        assert_eq!(rows[1].word, "AP   ");
        assert_eq!(rows[2].id, "empty-2");
        assert!(rows[2..].iter().all(|r| r.word == "     "));

        state.puzzle_complete = true;
        let rows = board_rows(&state);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.kind != RowKind::Current));
    }

    #[test]
    fn keyboard_keeps_best_mark() {
        let mut state = with_guess("EERIE", vec![Present, Miss, Present, Miss, Correct]);
        state.guesses.push(GuessRow {
            id: "1-1".into(),
            word: "RIVER".into(),
            marks: vec![Miss; 5],
            payout: 10.0,
        });
        let keys = keyboard_state(&state);
        assert_eq!(keys.get(&'E'), Some(&Correct));
        assert_eq!(keys.get(&'R'), Some(&Present));
        assert_eq!(keys.get(&'I'), Some(&Miss));
        assert_eq!(keys.get(&'V'), Some(&Miss));
        assert!(!keys.contains_key(&'Z'));
    }

    #[test]
    fn upgrades_sort_by_words_then_cost() {
        let catalog = Catalog::load_from_static();
        let sorted = sorted_upgrades(&catalog);
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (wa, wb) = (a.word_cost.unwrap_or(0), b.word_cost.unwrap_or(0));
            assert!(wa < wb || (wa == wb && a.base_cost <= b.base_cost));
        }
        assert_eq!(upgrade_tier_order(&catalog), vec![1, 2, 3]);
    }

    #[test]
    fn generator_tiers_unlock_progressively() {
        let catalog = Catalog::load_from_static();
        let mut state = GameState::default();
        assert_eq!(visible_generator_tiers(&state, &catalog), vec![1]);
        state.generator_levels.insert("ink-lathe".into(), 1);
        assert_eq!(visible_generator_tiers(&state, &catalog), vec![1, 2]);
        state.generator_levels.insert("glyph-furnace".into(), 2);
        assert_eq!(visible_generator_tiers(&state, &catalog), vec![1, 2, 3]);
    }

    #[test]
    fn heat_by_alphabet_distance() {
        assert_eq!(heat_class(Some('A'), Some('C')), HeatClass::Hot);
        assert_eq!(heat_class(Some('a'), Some('F')), HeatClass::Warm);
        assert_eq!(heat_class(Some('A'), Some('Z')), HeatClass::Cold);
        assert_eq!(heat_class(None, Some('A')), HeatClass::Cold);
        assert_eq!(HeatClass::Warm.css_class(), "heat-warm");
    }

    #[test]
    fn availability_matches_purchase_rules() {
        let catalog = Catalog::load_from_static();
        let quill = catalog.find_upgrade("sharp-quill").unwrap();
        let charter = catalog.find_upgrade("six-letter-charter").unwrap();
        let lathe = catalog.find_generator("ink-lathe").unwrap();
        let mut state = GameState::default();
        assert!(!upgrade_available(&state, quill));
        state.money = 10_000.0;
        assert!(upgrade_available(&state, quill));
        assert!(!upgrade_available(&state, charter));
        assert!(generator_available(&state, lathe));
    }
}
