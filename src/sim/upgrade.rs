use super::economy;
use super::world::{BuyOnConfig, RegistryError, UpgradeConfig, WorldConfig};
use std::collections::{BTreeMap, HashMap};

/// Buy-on and upgrade catalog for a single world, copied out of its config.
#[derive(Debug, Clone, Default)]
pub struct UpgradeRegistry {
    buy_ons: Vec<BuyOnConfig>,
    buy_on_index: HashMap<String, usize>,
    upgrades: Vec<UpgradeConfig>,
    upgrade_index: HashMap<String, usize>,
}

impl UpgradeRegistry {
    pub fn from_config(world: &WorldConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for buy_on in &world.buy_ons {
            if registry.buy_on_index.contains_key(&buy_on.id) {
                return Err(RegistryError::DuplicateBuyOn {
                    world: world.id.clone(),
                    id: buy_on.id.clone(),
                });
            }
            registry
                .buy_on_index
                .insert(buy_on.id.clone(), registry.buy_ons.len());
            registry.buy_ons.push(buy_on.clone());
        }
        for upgrade in &world.upgrades {
            if registry.upgrade_index.contains_key(&upgrade.id) {
                return Err(RegistryError::DuplicateUpgrade {
                    world: world.id.clone(),
                    id: upgrade.id.clone(),
                });
            }
            registry
                .upgrade_index
                .insert(upgrade.id.clone(), registry.upgrades.len());
            registry.upgrades.push(upgrade.clone());
        }
        Ok(registry)
    }

    pub fn buy_on(&self, id: &str) -> Option<&BuyOnConfig> {
        self.buy_on_index.get(id).map(|idx| &self.buy_ons[*idx])
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeConfig> {
        self.upgrade_index.get(id).map(|idx| &self.upgrades[*idx])
    }

    pub fn buy_ons(&self) -> &[BuyOnConfig] {
        &self.buy_ons
    }

    pub fn upgrades(&self) -> &[UpgradeConfig] {
        &self.upgrades
    }

    pub fn world_cps(
        &self,
        counts: &BTreeMap<String, u32>,
        purchased: &BTreeMap<String, bool>,
        prestige_multiplier: f64,
        global_multiplier: f64,
    ) -> f64 {
        economy::world_cps(
            &self.buy_ons,
            &self.upgrades,
            counts,
            purchased,
            prestige_multiplier,
            global_multiplier,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::worlds::{TERRA, builtin_worlds};

    fn terra() -> WorldConfig {
        builtin_worlds()
            .into_iter()
            .find(|world| world.id == TERRA)
            .expect("terra config")
    }

    #[test]
    fn lookup_by_id_and_order() {
        let registry = UpgradeRegistry::from_config(&terra()).expect("terra registers");
        assert_eq!(registry.buy_ons()[0].id, "auto_miner");
        assert_eq!(
            registry.buy_on("smelter").map(|b| b.level_requirement),
            Some(2)
        );
        assert_eq!(
            registry.upgrade("sharpened_picks").map(|u| u.target_buy_on.as_str()),
            Some("auto_miner")
        );
        assert!(registry.buy_on("unknown").is_none());
    }

    #[test]
    fn duplicate_buy_on_is_rejected() {
        let mut config = terra();
        let copy = config.buy_ons[1].clone();
        config.buy_ons.push(copy);
        assert_eq!(
            UpgradeRegistry::from_config(&config).unwrap_err(),
            RegistryError::DuplicateBuyOn {
                world: TERRA.to_string(),
                id: "drill_bot".to_string()
            }
        );
    }

    #[test]
    fn duplicate_upgrade_is_rejected() {
        let mut config = terra();
        let copy = config.upgrades[0].clone();
        config.upgrades.push(copy);
        assert!(matches!(
            UpgradeRegistry::from_config(&config),
            Err(RegistryError::DuplicateUpgrade { .. })
        ));
    }

    #[test]
    fn world_cps_applies_purchased_upgrades() {
        let registry = UpgradeRegistry::from_config(&terra()).expect("terra registers");
        let mut counts = BTreeMap::new();
        counts.insert("auto_miner".to_string(), 10);
        let mut purchased = BTreeMap::new();

        let base = registry.world_cps(&counts, &purchased, 1.0, 1.0);
        assert!((base - 1.0).abs() < 1e-9);

        purchased.insert("sharpened_picks".to_string(), true);
        let boosted = registry.world_cps(&counts, &purchased, 1.0, 1.0);
        assert!((boosted - 2.0).abs() < 1e-9);
    }
}
