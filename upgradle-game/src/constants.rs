//! Centralized balance and tuning constants for Upgradle game logic.

// Persistence ---------------------------------------------------------------
pub const STORAGE_KEY: &str = "upgradle-state";

// Log ------------------------------------------------------------------------
pub const LOG_LIMIT: usize = 8;
pub(crate) const LOG_WELCOME: &str = "Welcome to Upgradle. Enter words to mint cash.";
pub(crate) const LOG_NEED_FULL_WORD: &str = "Need a full-length word to submit.";
pub(crate) const LOG_UNKNOWN_WORD: &str = "Ledger rejects unknown words.";
pub(crate) const LOG_HOT_COLD_ONLINE: &str = "Heat signatures now online.";

// Board ----------------------------------------------------------------------
pub const DEFAULT_GUESS_LIMIT: u32 = 6;

// Payout weights -------------------------------------------------------------
pub(crate) const PAYOUT_BASE: u32 = 5;
pub(crate) const PAYOUT_CORRECT: u32 = 6;
pub(crate) const PAYOUT_PRESENT: u32 = 3;
pub(crate) const PAYOUT_MISS: u32 = 1;
pub(crate) const PAYOUT_CORRECT_BONUS: u32 = 6;
pub(crate) const PAYOUT_SOLVE_BASE: u32 = 40;
pub(crate) const PAYOUT_SOLVE_PER_LETTER: u32 = 4;

// Tier gates -----------------------------------------------------------------
/// Minimum aggregate upgrade levels required before a tier's upgrades can be bought.
pub const TIER_REQUIREMENTS: [(u32, u32); 3] = [(1, 0), (2, 6), (3, 14)];

/// Aggregate upgrade levels needed to purchase within `tier`; unknown tiers are open.
#[must_use]
pub fn tier_requirement(tier: u32) -> u32 {
    TIER_REQUIREMENTS
        .iter()
        .find(|(t, _)| *t == tier)
        .map_or(0, |(_, need)| *need)
}

// Engine tuning --------------------------------------------------------------
pub const DEFAULT_HINT_CHANCE: f64 = 0.01;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1_000;

// Hot/cold thresholds (alphabet distance) ------------------------------------
pub(crate) const HEAT_HOT_DISTANCE: u32 = 2;
pub(crate) const HEAT_WARM_DISTANCE: u32 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_requirements_match_table() {
        assert_eq!(tier_requirement(1), 0);
        assert_eq!(tier_requirement(2), 6);
        assert_eq!(tier_requirement(3), 14);
        assert_eq!(tier_requirement(9), 0);
    }
}
