//! Cost curves and passive income.
use crate::catalog::{Generator, Upgrade};
use crate::numbers::{ceil_f64_to_u64, u32_to_i32_saturating};
use crate::state::GameState;

/// Geometric cost curve, rounded up to whole currency.
#[must_use]
pub fn curve_cost(base_cost: f64, cost_growth: f64, owned: u32) -> u64 {
    ceil_f64_to_u64(base_cost * cost_growth.powi(u32_to_i32_saturating(owned)))
}

/// Price of the next unit of `generator` when `owned` are already held.
#[must_use]
pub fn generator_cost(generator: &Generator, owned: u32) -> u64 {
    curve_cost(generator.base_cost, generator.cost_growth, owned)
}

/// Price of raising `upgrade` from `level` to `level + 1`.
#[must_use]
pub fn upgrade_cost(upgrade: &Upgrade, level: u32) -> u64 {
    curve_cost(upgrade.base_cost, upgrade.cost_growth, level)
}

/// Sum of every upgrade level owned; gates tier purchases.
#[must_use]
pub fn total_upgrade_levels(state: &GameState) -> u32 {
    state
        .upgrade_levels
        .values()
        .fold(0_u32, |sum, level| sum.saturating_add(*level))
}

/// Currency earned per tick from all owned generators.
#[must_use]
pub fn passive_income(state: &GameState, generators: &[Generator]) -> f64 {
    let base: f64 = generators
        .iter()
        .filter_map(|generator| {
            let owned = state.generator_level(&generator.id);
            (owned > 0).then(|| f64::from(owned) * generator.base_income)
        })
        .sum();
    base * state.idle_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, UpgradeEffect};

    fn lathe() -> Generator {
        Generator {
            id: "ink-lathe".into(),
            name: "Ink Lathe".into(),
            description: String::new(),
            base_cost: 260.0,
            cost_growth: 1.35,
            base_income: 2.0,
            tier: 1,
            requires: None,
        }
    }

    #[test]
    fn generator_cost_rounds_up() {
        let g = lathe();
        assert_eq!(generator_cost(&g, 0), 260);
        // 260 * 1.35 = 351.0
        assert_eq!(generator_cost(&g, 1), 351);
        // 260 * 1.35^2 = 473.85
        assert_eq!(generator_cost(&g, 2), 474);
    }

    #[test]
    fn costs_strictly_increase_from_base() {
        let catalog = Catalog::load_from_static();
        for upgrade in &catalog.upgrades {
            let mut prev = upgrade_cost(upgrade, 0);
            assert!(prev as f64 >= upgrade.base_cost);
            for level in 1..12 {
                let next = upgrade_cost(upgrade, level);
                assert!(next > prev, "{} not increasing at {level}", upgrade.id);
                prev = next;
            }
        }
        for generator in &catalog.generators {
            let mut prev = generator_cost(generator, 0);
            assert!(prev as f64 >= generator.base_cost);
            for owned in 1..12 {
                let next = generator_cost(generator, owned);
                assert!(next > prev, "{} not increasing at {owned}", generator.id);
                prev = next;
            }
        }
    }

    #[test]
    fn upgrade_cost_uses_level_exponent() {
        let upgrade = Upgrade {
            id: "u".into(),
            name: "U".into(),
            description: String::new(),
            base_cost: 10.0,
            cost_growth: 2.0,
            max_level: None,
            tier: 1,
            word_cost: None,
            requires: None,
            effect: UpgradeEffect::default(),
        };
        assert_eq!(upgrade_cost(&upgrade, 3), 80);

        // 10 * 2^1030 overflows f64; the price must saturate rather than wrap to free.
        let runaway = upgrade_cost(&upgrade, 1030);
        assert!(runaway >= upgrade_cost(&upgrade, 1020));
        assert_eq!(runaway, u64::MAX);
    }

    #[test]
    fn passive_income_scales_with_owned_and_idle_multiplier() {
        let mut state = GameState::default();
        let gens = vec![lathe()];
        assert!(passive_income(&state, &gens).abs() < f64::EPSILON);

        state.generator_levels.insert("ink-lathe".into(), 3);
        assert!((passive_income(&state, &gens) - 6.0).abs() < f64::EPSILON);

        state.idle_multiplier = 1.5;
        assert!((passive_income(&state, &gens) - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_levels_sums_all_upgrades() {
        let mut state = GameState::default();
        state.upgrade_levels.insert("a".into(), 2);
        state.upgrade_levels.insert("b".into(), 5);
        assert_eq!(total_upgrade_levels(&state), 7);
    }
}
