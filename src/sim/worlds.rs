use super::world::{
    BuyOnConfig, PrestigeThreshold, RegistryError, ThresholdKind, UpgradeConfig, WorldConfig,
    WorldRegistry,
};

pub const TERRA: &str = "terra";
pub const AQUA: &str = "aqua";

pub fn default_registry() -> Result<WorldRegistry, RegistryError> {
    WorldRegistry::from_configs(builtin_worlds())
}

pub fn builtin_worlds() -> Vec<WorldConfig> {
    vec![terra(), aqua()]
}

fn terra() -> WorldConfig {
    WorldConfig {
        id: TERRA.to_string(),
        name: "Terra".to_string(),
        coin_name: "Terra-Coin".to_string(),
        coin_symbol: "TC".to_string(),
        accent_color: "#7fbf5a".to_string(),
        base_exchange_rate: 0.001,
        offline_percentage: 0.10,
        offline_cap_hours: 8.0,
        buy_ons: vec![
            buy_on("auto_miner", "Auto Miner", "Chips at surface ore.", 15.0, 1.15, 0.1, 0),
            buy_on("drill_bot", "Drill Bot", "Bores shallow shafts.", 100.0, 1.15, 1.0, 0),
            buy_on("smelter", "Smelter", "Refines ore into coin stock.", 1_100.0, 1.15, 8.0, 2),
            buy_on(
                "deep_excavator",
                "Deep Excavator",
                "Reaches the mantle seams.",
                12_000.0,
                1.15,
                47.0,
                5,
            ),
            buy_on(
                "quantum_extractor",
                "Quantum Extractor",
                "Pulls ore from adjacent probabilities.",
                130_000.0,
                1.15,
                260.0,
                10,
            ),
        ],
        upgrades: vec![
            upgrade("sharpened_picks", "Sharpened Picks", "auto_miner", 2.0, 100.0, 0),
            upgrade("reinforced_drills", "Reinforced Drills", "drill_bot", 2.0, 1_000.0, 0),
            upgrade("blast_furnace", "Blast Furnace", "smelter", 2.0, 11_000.0, 2),
            upgrade("sonar_mapping", "Sonar Mapping", "deep_excavator", 2.0, 120_000.0, 5),
        ],
        prestige_threshold: PrestigeThreshold {
            kind: ThresholdKind::CoinsEarned,
            value: 1_000_000.0,
        },
    }
}

fn aqua() -> WorldConfig {
    WorldConfig {
        id: AQUA.to_string(),
        name: "Aqua".to_string(),
        coin_name: "Aqua-Coin".to_string(),
        coin_symbol: "AC".to_string(),
        accent_color: "#3fa7d6".to_string(),
        base_exchange_rate: 0.0008,
        offline_percentage: 0.10,
        offline_cap_hours: 8.0,
        buy_ons: vec![
            buy_on("kelp_farm", "Kelp Farm", "Grows tradeable kelp.", 20.0, 1.15, 0.15, 0),
            buy_on("tidal_turbine", "Tidal Turbine", "Harvests the tides.", 150.0, 1.15, 1.4, 0),
            buy_on("pearl_diver", "Pearl Diver", "Brings up reef pearls.", 1_500.0, 1.16, 10.0, 3),
            buy_on("reef_forge", "Reef Forge", "Presses coral into coin.", 18_000.0, 1.16, 60.0, 6),
        ],
        upgrades: vec![
            upgrade("fertile_currents", "Fertile Currents", "kelp_farm", 2.0, 150.0, 0),
            upgrade("storm_blades", "Storm Blades", "tidal_turbine", 2.0, 1_500.0, 0),
        ],
        prestige_threshold: PrestigeThreshold {
            kind: ThresholdKind::BuyOnsOwned,
            value: 50.0,
        },
    }
}

fn buy_on(
    id: &str,
    name: &str,
    description: &str,
    base_cost: f64,
    cost_scaling: f64,
    base_cps: f64,
    level_requirement: u32,
) -> BuyOnConfig {
    BuyOnConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        base_cost,
        cost_scaling,
        base_cps,
        level_requirement,
    }
}

fn upgrade(
    id: &str,
    name: &str,
    target_buy_on: &str,
    multiplier: f64,
    cost: f64,
    level_requirement: u32,
) -> UpgradeConfig {
    UpgradeConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("Doubles {target_buy_on} output."),
        target_buy_on: target_buy_on.to_string(),
        multiplier,
        cost,
        level_requirement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_consistent() {
        for world in builtin_worlds() {
            for buy_on in &world.buy_ons {
                assert!(buy_on.cost_scaling >= 1.0, "{}", buy_on.id);
                assert!(buy_on.base_cps > 0.0, "{}", buy_on.id);
            }
            for upgrade in &world.upgrades {
                assert!(
                    world.buy_ons.iter().any(|b| b.id == upgrade.target_buy_on),
                    "{} targets unknown buy-on",
                    upgrade.id
                );
            }
        }
    }

    #[test]
    fn default_registry_builds() {
        let registry = default_registry().expect("builtin worlds register");
        assert!(registry.get(TERRA).is_some());
        assert!(registry.get(AQUA).is_some());
    }
}
