//! Bot policies that drive the engine during simulations.
use rand::Rng;
use rand::seq::SliceRandom;
use upgradle_game::{
    Catalog, GameState, WordBank, evaluate_guess, generator_available, generator_cost,
    sorted_upgrades, upgrade_available, upgrade_cost,
};

/// How the bot chooses its next guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessPolicy {
    /// Any dictionary word of the active length.
    Random,
    /// A word consistent with every mark and hint seen so far.
    Solver,
}

impl GuessPolicy {
    pub fn next_guess<R: Rng>(self, state: &GameState, bank: &WordBank, rng: &mut R) -> Option<String> {
        let pool = bank.words(state.selected_length);
        match self {
            Self::Random => pool.choose(rng).cloned(),
            Self::Solver => {
                let candidates: Vec<&String> = pool
                    .iter()
                    .filter(|word| consistent_with_board(state, word))
                    .collect();
                candidates
                    .choose(rng)
                    .map(|word| (*word).clone())
                    .or_else(|| pool.choose(rng).cloned())
            }
        }
    }
}

/// Whether `candidate` would have produced every mark on the board and
/// matches every revealed hint.
pub fn consistent_with_board(state: &GameState, candidate: &str) -> bool {
    let hints_match = state
        .hint_reveals
        .iter()
        .all(|(slot, letter)| candidate.chars().nth(*slot) == Some(*letter));
    hints_match
        && state
            .guesses
            .iter()
            .all(|row| evaluate_guess(&row.word, candidate).marks == row.marks)
}

/// What the bot does with its money between puzzles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendPolicy {
    /// Never buys anything.
    Hoard,
    /// Buys the cheapest available upgrade until nothing is affordable.
    Upgrades,
    /// Alternates between the cheapest upgrade and the cheapest generator.
    Balanced,
    /// Buys only generators.
    Idle,
}

/// A single purchase the bot wants to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Purchase {
    Upgrade { id: String, cost: u64 },
    Generator { id: String, cost: u64 },
}

impl Purchase {
    pub const fn cost(&self) -> u64 {
        match self {
            Self::Upgrade { cost, .. } | Self::Generator { cost, .. } => *cost,
        }
    }
}

impl SpendPolicy {
    /// Pick the next purchase for `state`, or `None` to stop shopping.
    /// `round` counts purchases already made in this shopping trip.
    pub fn next_purchase(self, state: &GameState, catalog: &Catalog, round: u32) -> Option<Purchase> {
        match self {
            Self::Hoard => None,
            Self::Upgrades => cheapest_upgrade(state, catalog),
            Self::Idle => cheapest_generator(state, catalog),
            Self::Balanced => {
                let (first, second) = if round % 2 == 0 {
                    (cheapest_upgrade(state, catalog), cheapest_generator(state, catalog))
                } else {
                    (cheapest_generator(state, catalog), cheapest_upgrade(state, catalog))
                };
                first.or(second)
            }
        }
    }
}

fn cheapest_upgrade(state: &GameState, catalog: &Catalog) -> Option<Purchase> {
    sorted_upgrades(catalog)
        .into_iter()
        .filter(|upgrade| upgrade_available(state, upgrade))
        .map(|upgrade| Purchase::Upgrade {
            id: upgrade.id.clone(),
            cost: upgrade_cost(upgrade, state.upgrade_level(&upgrade.id)),
        })
        .min_by_key(Purchase::cost)
}

fn cheapest_generator(state: &GameState, catalog: &Catalog) -> Option<Purchase> {
    catalog
        .generators
        .iter()
        .filter(|generator| generator_available(state, generator))
        .map(|generator| Purchase::Generator {
            id: generator.id.clone(),
            cost: generator_cost(generator, state.generator_level(&generator.id)),
        })
        .min_by_key(Purchase::cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use upgradle_game::{GuessRow, WordLength};

    fn bank() -> WordBank {
        WordBank::from_word_list(["APPLE", "CRANE", "SLATE", "PLANET", "CAPTURE"]).unwrap()
    }

    fn state_with_guess(word: &str, target: &str) -> GameState {
        let mut state = GameState::default();
        state.selected_length = WordLength::Five;
        state.current_word = target.to_string();
        state.guesses.push(GuessRow {
            id: "1-0".to_string(),
            word: word.to_string(),
            marks: evaluate_guess(word, target).marks,
            payout: 0.0,
        });
        state
    }

    #[test]
    fn solver_only_picks_consistent_words() {
        let state = state_with_guess("CRANE", "SLATE");
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..10 {
            let guess = GuessPolicy::Solver.next_guess(&state, &bank(), &mut rng).unwrap();
            assert_eq!(guess, "SLATE");
        }
    }

    #[test]
    fn hints_prune_candidates() {
        let mut state = GameState::default();
        state.hint_reveals.insert(0, 'C');
        assert!(consistent_with_board(&state, "CRANE"));
        assert!(!consistent_with_board(&state, "APPLE"));
    }

    #[test]
    fn hoarder_never_shops() {
        let mut state = GameState::default();
        state.money = 1_000_000.0;
        let catalog = Catalog::load_from_static();
        assert_eq!(SpendPolicy::Hoard.next_purchase(&state, &catalog, 0), None);
    }

    #[test]
    fn upgrades_policy_picks_cheapest_affordable() {
        let mut state = GameState::default();
        state.money = 100.0;
        let catalog = Catalog::load_from_static();
        let purchase = SpendPolicy::Upgrades.next_purchase(&state, &catalog, 0).unwrap();
        assert_eq!(
            purchase,
            Purchase::Upgrade {
                id: "sharp-quill".to_string(),
                cost: 25
            }
        );
    }

    #[test]
    fn idle_policy_waits_for_generator_money() {
        let mut state = GameState::default();
        state.money = 100.0;
        let catalog = Catalog::load_from_static();
        assert_eq!(SpendPolicy::Idle.next_purchase(&state, &catalog, 0), None);
        state.money = 260.0;
        assert_eq!(
            SpendPolicy::Idle.next_purchase(&state, &catalog, 0).map(|p| p.cost()),
            Some(260)
        );
    }
}
