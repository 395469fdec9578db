use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyOnConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_cost: f64,
    pub cost_scaling: f64,
    pub base_cps: f64,
    #[serde(default)]
    pub level_requirement: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_buy_on: String,
    pub multiplier: f64,
    pub cost: f64,
    #[serde(default)]
    pub level_requirement: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    CoinsEarned,
    BuyOnsOwned,
    CompletionPercent,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrestigeThreshold {
    pub kind: ThresholdKind,
    pub value: f64,
}

/// Static balancing data for one world, already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub id: String,
    pub name: String,
    pub coin_name: String,
    pub coin_symbol: String,
    pub accent_color: String,
    pub base_exchange_rate: f64,
    pub offline_percentage: f64,
    pub offline_cap_hours: f64,
    pub buy_ons: Vec<BuyOnConfig>,
    pub upgrades: Vec<UpgradeConfig>,
    pub prestige_threshold: PrestigeThreshold,
}

/// Mutable runtime state of a single world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub world_id: String,
    pub coins: f64,
    pub total_coins_earned: f64,
    pub cps: f64,
    #[serde(default)]
    pub buy_on_counts: BTreeMap<String, u32>,
    #[serde(default)]
    pub purchased_upgrades: BTreeMap<String, bool>,
    pub prestige_count: u32,
    pub prestige_multiplier: f64,
    pub exchange_rate: f64,
    #[serde(default)]
    pub offline_cap_upgrade_level: u32,
    #[serde(default)]
    pub completion_percent: f64,
    #[serde(default)]
    pub total_clicks: u64,
}

impl WorldState {
    pub fn new(world_id: &str, base_exchange_rate: f64) -> Self {
        Self {
            world_id: world_id.to_string(),
            coins: 0.0,
            total_coins_earned: 0.0,
            cps: 0.0,
            buy_on_counts: BTreeMap::new(),
            purchased_upgrades: BTreeMap::new(),
            prestige_count: 0,
            prestige_multiplier: 1.0,
            exchange_rate: base_exchange_rate,
            offline_cap_upgrade_level: 0,
            completion_percent: 0.0,
            total_clicks: 0,
        }
    }

    pub fn owned(&self, buy_on_id: &str) -> u32 {
        self.buy_on_counts.get(buy_on_id).copied().unwrap_or(0)
    }

    pub fn total_buy_ons_owned(&self) -> u64 {
        self.buy_on_counts.values().map(|count| *count as u64).sum()
    }

    pub fn has_upgrade(&self, upgrade_id: &str) -> bool {
        self.purchased_upgrades
            .get(upgrade_id)
            .copied()
            .unwrap_or(false)
    }

    /// Adds earned coins to both the balance and the lifetime total.
    pub fn earn(&mut self, amount: f64) {
        self.coins += amount;
        self.total_coins_earned += amount;
    }

    /// Value of the configured prestige metric, on the threshold's scale.
    pub fn prestige_metric(&self, kind: ThresholdKind) -> Option<f64> {
        match kind {
            ThresholdKind::CoinsEarned => Some(self.total_coins_earned),
            ThresholdKind::BuyOnsOwned => Some(self.total_buy_ons_owned() as f64),
            ThresholdKind::CompletionPercent => Some(self.completion_percent * 100.0),
            ThresholdKind::Unknown => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate world id {0}")]
    DuplicateWorld(String),
    #[error("duplicate buy-on id {id} in world {world}")]
    DuplicateBuyOn { world: String, id: String },
    #[error("duplicate upgrade id {id} in world {world}")]
    DuplicateUpgrade { world: String, id: String },
    #[error("duplicate achievement id {0}")]
    DuplicateAchievement(String),
}

/// Ordered lookup of world definitions. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct WorldRegistry {
    worlds: Vec<WorldConfig>,
    by_id: HashMap<String, usize>,
}

impl WorldRegistry {
    pub fn from_configs(
        configs: impl IntoIterator<Item = WorldConfig>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for config in configs {
            if registry.by_id.contains_key(&config.id) {
                return Err(RegistryError::DuplicateWorld(config.id));
            }
            registry
                .by_id
                .insert(config.id.clone(), registry.worlds.len());
            registry.worlds.push(config);
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&WorldConfig> {
        self.by_id.get(id).map(|idx| &self.worlds[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldConfig> {
        self.worlds.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.worlds.iter().map(|world| world.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}
