//! Upgrade pricing and stat derivation.
//!
//! Prices grow exponentially with the level already owned:
//! `floor(base_cost * cost_multiplier ^ level)`. Stats are additive on top
//! of the base table: `stat = base + level * value_multiplier`, recomputed
//! from scratch every time.

use crate::config::{BaseStats, StatKind, UpgradeDef};
use crate::state::{PlayerStats, UpgradeLevels};

/// Price of buying the next level when `current_level` levels are owned.
///
/// Saturates at `u64::MAX` for absurd levels.
#[must_use]
pub fn compute_upgrade_cost(def: &UpgradeDef, current_level: u32) -> u64 {
    let exponent = i32::try_from(current_level).unwrap_or(i32::MAX);
    let cost = (def.base_cost as f64 * def.cost_multiplier.powi(exponent)).floor();
    if cost >= u64::MAX as f64 {
        u64::MAX
    } else {
        cost as u64
    }
}

/// Derives ship stats from the base table and upgrade levels.
///
/// The result is at full hull. Ids in `levels` with no definition in
/// `defs` are ignored.
#[must_use]
pub fn apply_upgrades(base: &BaseStats, levels: &UpgradeLevels, defs: &[UpgradeDef]) -> PlayerStats {
    let mut stats = PlayerStats::from_base(base);
    for def in defs {
        let bonus = levels.level(&def.id) as f32 * def.value_multiplier;
        match def.stat {
            StatKind::MaxHull => stats.max_hull += bonus,
            StatKind::CargoSize => {
                stats.cargo_size = stats.cargo_size.saturating_add(bonus.max(0.0).round() as u32);
            }
            StatKind::LaserPower => stats.laser_power += bonus,
            StatKind::LaserRange => stats.laser_range += bonus,
            StatKind::EngineSpeed => stats.engine_speed += bonus,
            StatKind::TurnSpeed => stats.turn_speed += bonus,
        }
    }
    stats.heal();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;
    use proptest::prelude::*;

    #[test]
    fn test_cost_curve() {
        let config = EconomyConfig::default();
        let hull = config.upgrade("hull").unwrap();
        assert_eq!(compute_upgrade_cost(hull, 0), 50);
        assert_eq!(compute_upgrade_cost(hull, 1), 75);
        assert_eq!(compute_upgrade_cost(hull, 2), 112);

        let engine = config.upgrade("engine").unwrap();
        assert_eq!(compute_upgrade_cost(engine, 0), 80);
        assert_eq!(compute_upgrade_cost(engine, 1), 112);
    }

    #[test]
    fn test_cost_saturates() {
        let config = EconomyConfig::default();
        let cargo = config.upgrade("cargo").unwrap();
        assert_eq!(compute_upgrade_cost(cargo, 10_000), u64::MAX);
    }

    #[test]
    fn test_apply_upgrades_adds_per_level() {
        let config = EconomyConfig::default();
        let levels: UpgradeLevels = [("hull", 2), ("cargo", 1), ("laser_p", 3), ("engine", 1)]
            .into_iter()
            .collect();
        let stats = apply_upgrades(&config.base_stats, &levels, &config.upgrades);

        assert_eq!(stats.max_hull, 150.0);
        assert_eq!(stats.current_hull, 150.0);
        assert_eq!(stats.cargo_size, 30);
        assert_eq!(stats.laser_power, 25.0);
        assert!((stats.engine_speed - 0.17).abs() < 1e-6);
        assert_eq!(stats.laser_range, 300.0);
        assert_eq!(stats.turn_speed, 0.05);
    }

    #[test]
    fn test_unknown_levels_are_ignored() {
        let config = EconomyConfig::default();
        let levels: UpgradeLevels = [("warp", 9)].into_iter().collect();
        let stats = apply_upgrades(&config.base_stats, &levels, &config.upgrades);
        assert_eq!(stats, PlayerStats::from_base(&config.base_stats));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_cost_strictly_increasing(level in 0u32..40, index in 0usize..4) {
            let config = EconomyConfig::default();
            let def = &config.upgrades[index];
            prop_assert!(compute_upgrade_cost(def, level + 1) > compute_upgrade_cost(def, level));
        }

        #[test]
        fn prop_rederivation_is_idempotent(
            hull in 0u32..50,
            cargo in 0u32..50,
            laser in 0u32..50,
            engine in 0u32..50,
        ) {
            let config = EconomyConfig::default();
            let levels: UpgradeLevels = [("hull", hull), ("cargo", cargo), ("laser_p", laser), ("engine", engine)]
                .into_iter()
                .collect();
            let first = apply_upgrades(&config.base_stats, &levels, &config.upgrades);
            let second = apply_upgrades(&config.base_stats, &levels, &config.upgrades);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.cargo_size, 20 + cargo * 10);
        }
    }
}
