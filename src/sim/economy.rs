use crate::sim::world::{BuyOnConfig, UpgradeConfig};
use std::collections::BTreeMap;

pub const EXCHANGE_COST_PERCENT: f64 = 0.20;
pub const EXCHANGE_RATE_GROWTH: f64 = 1.01;
pub const HOURS_PER_OFFLINE_CAP_LEVEL: f64 = 2.0;

const SI_TIERS: [(f64, &str); 5] = [
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrestigeReward {
    pub general_coins: f64,
    pub multiplier: f64,
    pub xp: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExchangeBoostResult {
    pub general_coins_earned: f64,
    pub world_coins_cost: f64,
    pub new_exchange_rate: f64,
}

pub fn cost_for_next(buy_on: &BuyOnConfig, owned: u32) -> f64 {
    buy_on.base_cost * buy_on.cost_scaling.powi(owned as i32)
}

/// Product of the multipliers of every purchased upgrade that targets `buy_on_id`.
pub fn effective_multiplier(
    buy_on_id: &str,
    upgrades: &[UpgradeConfig],
    purchased: &BTreeMap<String, bool>,
) -> f64 {
    upgrades
        .iter()
        .filter(|upgrade| upgrade.target_buy_on == buy_on_id)
        .filter(|upgrade| purchased.get(&upgrade.id).copied().unwrap_or(false))
        .map(|upgrade| upgrade.multiplier)
        .product()
}

pub fn world_cps(
    buy_ons: &[BuyOnConfig],
    upgrades: &[UpgradeConfig],
    counts: &BTreeMap<String, u32>,
    purchased: &BTreeMap<String, bool>,
    prestige_multiplier: f64,
    global_multiplier: f64,
) -> f64 {
    let mut total = 0.0;
    for buy_on in buy_ons {
        let count = counts.get(&buy_on.id).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        let mult = effective_multiplier(&buy_on.id, upgrades, purchased);
        total += buy_on.base_cps * count as f64 * mult;
    }
    total * prestige_multiplier * global_multiplier
}

/// Multiplier gained by the prestige following `prestige_count` earlier ones.
pub fn prestige_multiplier_gain(prestige_count: u32) -> f64 {
    1.0 + 0.5 / ((prestige_count as f64) + 1.0).sqrt()
}

pub fn prestige_reward(
    total_coins_earned: f64,
    prestige_count: u32,
    current_multiplier: f64,
) -> PrestigeReward {
    PrestigeReward {
        general_coins: total_coins_earned.max(0.0).sqrt() * 0.1,
        multiplier: current_multiplier * prestige_multiplier_gain(prestige_count),
        xp: 500 * (prestige_count as u64 + 1),
    }
}

pub fn exchange_boost(balance: f64, rate: f64) -> ExchangeBoostResult {
    if balance <= 0.0 {
        return ExchangeBoostResult::default();
    }
    let cost = balance * EXCHANGE_COST_PERCENT;
    ExchangeBoostResult {
        general_coins_earned: cost * rate,
        world_coins_cost: cost,
        new_exchange_rate: rate * EXCHANGE_RATE_GROWTH,
    }
}

/// Coins a world accrues while the game is closed, capped at `cap_hours`.
pub fn offline_world_income(cps: f64, offline_pct: f64, elapsed_secs: f64, cap_hours: f64) -> f64 {
    if cps <= 0.0 || offline_pct <= 0.0 || elapsed_secs <= 0.0 || cap_hours <= 0.0 {
        return 0.0;
    }
    let earned = cps * offline_pct * elapsed_secs;
    let cap = cps * cap_hours * 3600.0 * offline_pct;
    earned.min(cap)
}

pub fn offline_overview_income(rate_per_sec: f64, elapsed_secs: f64, cap: f64) -> f64 {
    if rate_per_sec <= 0.0 || elapsed_secs <= 0.0 || cap <= 0.0 {
        return 0.0;
    }
    (rate_per_sec * elapsed_secs).min(cap)
}

pub fn effective_offline_cap_hours(base_cap_hours: f64, upgrade_level: u32) -> f64 {
    base_cap_hours + upgrade_level as f64 * HOURS_PER_OFFLINE_CAP_LEVEL
}

pub fn format_coins_bare(amount: f64) -> String {
    let (sign, magnitude) = if amount < 0.0 {
        ("-", -amount)
    } else {
        ("", amount)
    };
    for (threshold, suffix) in SI_TIERS {
        if magnitude >= threshold {
            return format!("{sign}{:.2}{suffix}", magnitude / threshold);
        }
    }
    format!("{sign}{magnitude:.0}")
}

pub fn format_coins(amount: f64, symbol: &str) -> String {
    format!("{symbol}: {}", format_coins_bare(amount))
}

pub fn format_cps(amount: f64) -> String {
    for (threshold, suffix) in SI_TIERS {
        if amount >= threshold {
            return format!("{:.2}{suffix}", amount / threshold);
        }
    }
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn buy_on(id: &str, base_cost: f64, cost_scaling: f64, base_cps: f64) -> BuyOnConfig {
        BuyOnConfig {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            base_cost,
            cost_scaling,
            base_cps,
            level_requirement: 0,
        }
    }

    fn upgrade(id: &str, target: &str, multiplier: f64) -> UpgradeConfig {
        UpgradeConfig {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            target_buy_on: target.to_string(),
            multiplier,
            cost: 100.0,
            level_requirement: 0,
        }
    }

    #[test]
    fn cost_grows_with_ownership() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let scaling = rng.gen_range(1.01..2.0);
            let item = buy_on("miner", rng.gen_range(1.0..500.0), scaling, 1.0);
            let owned = rng.gen_range(0..60);
            assert!(cost_for_next(&item, owned + 1) > cost_for_next(&item, owned));
        }
    }

    #[test]
    fn flat_scaling_keeps_cost_constant() {
        let item = buy_on("flat", 25.0, 1.0, 1.0);
        assert_eq!(cost_for_next(&item, 0), 25.0);
        assert_eq!(cost_for_next(&item, 40), 25.0);
    }

    #[test]
    fn effective_multiplier_only_counts_purchased_targets() {
        let upgrades = vec![
            upgrade("a", "miner", 2.0),
            upgrade("b", "miner", 3.0),
            upgrade("c", "drill", 5.0),
        ];
        let mut purchased = BTreeMap::new();
        assert_eq!(effective_multiplier("miner", &upgrades, &purchased), 1.0);

        purchased.insert("a".to_string(), true);
        purchased.insert("b".to_string(), false);
        purchased.insert("c".to_string(), true);
        assert_eq!(effective_multiplier("miner", &upgrades, &purchased), 2.0);

        purchased.insert("b".to_string(), true);
        assert_eq!(effective_multiplier("miner", &upgrades, &purchased), 6.0);
    }

    #[test]
    fn world_cps_combines_counts_upgrades_and_multipliers() {
        let buy_ons = vec![buy_on("miner", 10.0, 1.15, 0.5), buy_on("drill", 100.0, 1.15, 4.0)];
        let upgrades = vec![upgrade("sharp", "miner", 2.0)];
        let mut counts = BTreeMap::new();
        counts.insert("miner".to_string(), 4);
        let mut purchased = BTreeMap::new();
        purchased.insert("sharp".to_string(), true);

        // 0.5 * 4 * 2.0 = 4.0, drill unowned
        let cps = world_cps(&buy_ons, &upgrades, &counts, &purchased, 1.5, 2.0);
        assert!(approx(cps, 12.0, 1e-9));
        assert_eq!(world_cps(&buy_ons, &upgrades, &BTreeMap::new(), &purchased, 1.5, 2.0), 0.0);
    }

    #[test]
    fn prestige_gain_diminishes_but_stays_above_one() {
        assert!(approx(prestige_multiplier_gain(0), 1.5, 1e-12));
        assert!(approx(prestige_multiplier_gain(1), 1.0 + 0.5 / 2f64.sqrt(), 1e-12));
        assert!(approx(prestige_multiplier_gain(3), 1.25, 1e-12));
        for n in 0..500 {
            assert!(prestige_multiplier_gain(n) > 1.0);
            assert!(prestige_multiplier_gain(n + 1) < prestige_multiplier_gain(n));
        }
    }

    #[test]
    fn prestige_reward_matches_formula() {
        let first = prestige_reward(1_000_000.0, 0, 1.0);
        assert!(approx(first.general_coins, 100.0, 0.01));
        assert_eq!(first.xp, 500);
        assert!(approx(first.multiplier, 1.5, 1e-12));

        let second = prestige_reward(10_000_000.0, 1, 1.5);
        assert!(approx(second.general_coins, 10_000_000f64.sqrt() * 0.1, 0.01));
        assert_eq!(second.xp, 1000);
        assert!(second.multiplier > 1.5);
    }

    #[test]
    fn exchange_boost_standard_case() {
        let result = exchange_boost(1000.0, 0.001);
        assert!(approx(result.world_coins_cost, 200.0, 0.001));
        assert!(approx(result.general_coins_earned, 0.2, 0.001));
        assert!(approx(result.new_exchange_rate, 0.00101, 1e-6));
    }

    #[test]
    fn exchange_boost_on_empty_balance_is_all_zero() {
        assert_eq!(exchange_boost(0.0, 0.001), ExchangeBoostResult::default());
    }

    #[test]
    fn offline_world_income_caps_at_configured_hours() {
        assert!(approx(offline_world_income(10.0, 0.10, 1800.0, 8.0), 1800.0, 0.001));
        assert!(approx(offline_world_income(10.0, 0.10, 28_800.0, 8.0), 28_800.0, 0.001));
        assert!(approx(offline_world_income(10.0, 0.10, 100_000.0, 8.0), 28_800.0, 0.001));
        assert!(approx(offline_world_income(10.0, 0.05, 3600.0, 8.0), 1800.0, 0.001));
    }

    #[test]
    fn offline_world_income_rejects_non_positive_inputs() {
        assert_eq!(offline_world_income(0.0, 0.10, 3600.0, 8.0), 0.0);
        assert_eq!(offline_world_income(10.0, 0.10, 0.0, 8.0), 0.0);
        assert_eq!(offline_world_income(10.0, 0.10, -100.0, 8.0), 0.0);
        assert_eq!(offline_world_income(10.0, 0.0, 3600.0, 8.0), 0.0);
        assert_eq!(offline_world_income(10.0, 0.10, 3600.0, 0.0), 0.0);
    }

    #[test]
    fn offline_overview_income_caps() {
        assert!(approx(offline_overview_income(0.01, 1000.0, 100.0), 10.0, 0.001));
        assert!(approx(offline_overview_income(0.01, 20_000.0, 100.0), 100.0, 0.001));
        assert_eq!(offline_overview_income(0.0, 3600.0, 100.0), 0.0);
    }

    #[test]
    fn offline_cap_hours_scale_with_upgrades() {
        assert_eq!(effective_offline_cap_hours(8.0, 0), 8.0);
        assert_eq!(effective_offline_cap_hours(8.0, 1), 10.0);
        assert_eq!(effective_offline_cap_hours(8.0, 5), 18.0);
    }

    #[test]
    fn coin_formatting_uses_si_suffixes() {
        assert_eq!(format_coins_bare(0.0), "0");
        assert_eq!(format_coins_bare(999.0), "999");
        assert_eq!(format_coins_bare(1000.0), "1.00K");
        assert_eq!(format_coins_bare(1500.0), "1.50K");
        assert_eq!(format_coins_bare(1_230_000.0), "1.23M");
        assert_eq!(format_coins_bare(1e9), "1.00B");
        assert_eq!(format_coins_bare(1e12), "1.00T");
        assert_eq!(format_coins_bare(1e15), "1.00Q");
        assert_eq!(format_coins_bare(-500.0), "-500");
        assert_eq!(format_coins(1500.0, "TC"), "TC: 1.50K");
        assert_eq!(format_cps(0.5), "0.50");
        assert_eq!(format_cps(2_500.0), "2.50K");
    }
}
