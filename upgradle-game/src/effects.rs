//! Folding a purchased upgrade's effect bundle into game state.
use crate::catalog::Upgrade;
use crate::constants::LOG_HOT_COLD_ONLINE;
use crate::state::GameState;

/// Apply `upgrade`'s effects after a level purchase.
///
/// `previous_level` is the level held *before* the purchase. One-shot effects
/// (length unlocks, hot/cold mode, multipliers) only fire when it is `0`; the payout
/// bonus and guess-limit delta stack on every level.
pub fn apply_upgrade_effect(state: &mut GameState, upgrade: &Upgrade, previous_level: u32) {
    let effect = &upgrade.effect;
    let first_purchase = previous_level == 0;

    if first_purchase
        && let Some(length) = effect.unlock_length
        && state.unlocked_lengths.insert(length)
    {
        log::info!("unlocked {length}-letter words via {}", upgrade.id);
    }

    if first_purchase && effect.show_hot_cold {
        state.show_hot_cold = true;
        state.push_log(LOG_HOT_COLD_ONLINE);
    }

    if effect.payout_bonus != 0.0 {
        state.payout_bonus += effect.payout_bonus;
    }

    if first_purchase && let Some(multiplier) = effect.payout_multiplier {
        state.payout_multiplier *= multiplier;
    }

    if first_purchase && let Some(multiplier) = effect.idle_multiplier {
        state.idle_multiplier *= multiplier;
    }

    if effect.guess_limit > 0 {
        state.guess_limit = state.guess_limit.saturating_add(effect.guess_limit);
    }
}
