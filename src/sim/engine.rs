use super::achievement::AchievementRegistry;
use super::economy::{self, ExchangeBoostResult, PrestigeReward};
use super::state::{GameState, Screen};
use super::upgrade::UpgradeRegistry;
use super::world::{RegistryError, WorldConfig, WorldRegistry, WorldState};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

const BASE_CLICK_POWER: f64 = 1.0;
const GLOBAL_INCOME_MULTIPLIER: f64 = 1.0;

/// Why the engine declined an action. These are ordinary gameplay refusals,
/// never logged as failures.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("unknown world {0}")]
    UnknownWorld(String),
    #[error("unknown buy-on {0}")]
    UnknownBuyOn(String),
    #[error("unknown upgrade {0}")]
    UnknownUpgrade(String),
    #[error("requires level {required}")]
    LevelTooLow { required: u32 },
    #[error("needs {cost:.2} coins, have {balance:.2}")]
    InsufficientFunds { cost: f64, balance: f64 },
    #[error("{0} already purchased")]
    AlreadyPurchased(String),
    #[error("prestige threshold not reached")]
    PrestigeNotReady,
    #[error("no coins to exchange")]
    NothingToExchange,
}

/// Owns the game state and funnels every mutation through its methods.
pub struct Engine {
    pub(super) state: GameState,
    pub(super) worlds: WorldRegistry,
    pub(super) achievements: AchievementRegistry,
    upgrades: HashMap<String, UpgradeRegistry>,
    pub(super) earned: BTreeSet<String>,
    pub(super) cosmetics: BTreeSet<String>,
    pub(super) achievement_timer: f64,
    pub(super) autosave_timer: f64,
}

impl Engine {
    pub fn new(
        state: GameState,
        worlds: WorldRegistry,
        achievements: AchievementRegistry,
    ) -> Result<Self, RegistryError> {
        let mut upgrades = HashMap::with_capacity(worlds.len());
        for world in worlds.iter() {
            upgrades.insert(world.id.clone(), UpgradeRegistry::from_config(world)?);
        }
        Ok(Self {
            state,
            worlds,
            achievements,
            upgrades,
            earned: BTreeSet::new(),
            cosmetics: BTreeSet::new(),
            achievement_timer: 0.0,
            autosave_timer: 0.0,
        })
    }

    /// Restores achievements earned in an earlier session.
    pub fn with_earned(mut self, earned: BTreeSet<String>) -> Self {
        self.earned = earned;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn worlds(&self) -> &WorldRegistry {
        &self.worlds
    }

    pub fn achievements(&self) -> &AchievementRegistry {
        &self.achievements
    }

    pub fn upgrades(&self, world_id: &str) -> Option<&UpgradeRegistry> {
        self.upgrades.get(world_id)
    }

    pub fn earned(&self) -> &BTreeSet<String> {
        &self.earned
    }

    pub fn cosmetics(&self) -> &BTreeSet<String> {
        &self.cosmetics
    }

    pub fn world(&self, world_id: &str) -> Option<&WorldState> {
        self.state.worlds.get(world_id)
    }

    pub fn set_location(&mut self, screen: Screen, world_id: &str) {
        self.state.last_screen = screen;
        self.state.last_world_id = world_id.to_string();
    }

    pub fn click_power(&self, world_id: &str, global_multiplier: f64) -> f64 {
        let Some(world) = self.state.worlds.get(world_id) else {
            return 0.0;
        };
        let global = if global_multiplier > 0.0 {
            global_multiplier
        } else {
            1.0
        };
        BASE_CLICK_POWER * world.prestige_multiplier * global
    }

    /// Returns the coins earned by one manual click; zero for an unknown world.
    pub fn handle_click(&mut self, world_id: &str, global_multiplier: f64) -> f64 {
        let power = self.click_power(world_id, global_multiplier);
        let Some(world) = self.state.worlds.get_mut(world_id) else {
            return 0.0;
        };
        world.earn(power);
        world.total_clicks += 1;
        self.state.player.total_clicks += 1;
        self.state.player.credit_world_earnings(world_id, power);
        power
    }

    /// Buys exactly one unit and returns what it cost.
    pub fn purchase_buy_on(&mut self, world_id: &str, buy_on_id: &str) -> Result<f64, ActionError> {
        let registry = self
            .upgrades
            .get(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        let buy_on = registry
            .buy_on(buy_on_id)
            .ok_or_else(|| ActionError::UnknownBuyOn(buy_on_id.to_string()))?;
        if !self.state.player.meets_level(buy_on.level_requirement) {
            return Err(ActionError::LevelTooLow {
                required: buy_on.level_requirement,
            });
        }
        let world = self
            .state
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        let cost = economy::cost_for_next(buy_on, world.owned(buy_on_id));
        if world.coins < cost {
            return Err(ActionError::InsufficientFunds {
                cost,
                balance: world.coins,
            });
        }

        world.coins -= cost;
        *world.buy_on_counts.entry(buy_on_id.to_string()).or_insert(0) += 1;
        world.cps = registry.world_cps(
            &world.buy_on_counts,
            &world.purchased_upgrades,
            world.prestige_multiplier,
            GLOBAL_INCOME_MULTIPLIER,
        );
        debug!(world = world_id, buy_on = buy_on_id, cost, "purchased buy-on");
        Ok(cost)
    }

    pub fn purchase_upgrade(&mut self, world_id: &str, upgrade_id: &str) -> Result<f64, ActionError> {
        let registry = self
            .upgrades
            .get(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        let upgrade = registry
            .upgrade(upgrade_id)
            .ok_or_else(|| ActionError::UnknownUpgrade(upgrade_id.to_string()))?;
        let world = self
            .state
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        if world.has_upgrade(upgrade_id) {
            return Err(ActionError::AlreadyPurchased(upgrade_id.to_string()));
        }
        if !self.state.player.meets_level(upgrade.level_requirement) {
            return Err(ActionError::LevelTooLow {
                required: upgrade.level_requirement,
            });
        }
        if world.coins < upgrade.cost {
            return Err(ActionError::InsufficientFunds {
                cost: upgrade.cost,
                balance: world.coins,
            });
        }

        world.coins -= upgrade.cost;
        world.purchased_upgrades.insert(upgrade_id.to_string(), true);
        world.cps = registry.world_cps(
            &world.buy_on_counts,
            &world.purchased_upgrades,
            world.prestige_multiplier,
            GLOBAL_INCOME_MULTIPLIER,
        );
        debug!(world = world_id, upgrade = upgrade_id, "purchased upgrade");
        Ok(upgrade.cost)
    }

    pub fn can_prestige(&self, world_id: &str) -> bool {
        let Some((config, world)) = self.world_pair(world_id) else {
            return false;
        };
        let threshold = config.prestige_threshold;
        world
            .prestige_metric(threshold.kind)
            .is_some_and(|current| current >= threshold.value)
    }

    /// Current value and target for the world's prestige bar.
    pub fn prestige_progress(&self, world_id: &str) -> (f64, f64) {
        let Some((config, world)) = self.world_pair(world_id) else {
            return (0.0, 1.0);
        };
        let threshold = config.prestige_threshold;
        let current = world.prestige_metric(threshold.kind).unwrap_or(0.0);
        (current, threshold.value)
    }

    pub fn execute_prestige(&mut self, world_id: &str) -> Result<PrestigeReward, ActionError> {
        if !self.can_prestige(world_id) {
            return Err(ActionError::PrestigeNotReady);
        }
        let world = self
            .state
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        let reward = economy::prestige_reward(
            world.total_coins_earned,
            world.prestige_count,
            world.prestige_multiplier,
        );

        world.prestige_count += 1;
        world.prestige_multiplier = reward.multiplier;
        world.coins = 0.0;
        world.buy_on_counts.clear();
        world.purchased_upgrades.clear();
        world.cps = 0.0;

        self.state.player.add_general_coins(reward.general_coins);
        self.state.player.add_xp(reward.xp);
        debug!(
            world = world_id,
            multiplier = reward.multiplier,
            general_coins = reward.general_coins,
            "prestiged"
        );
        Ok(reward)
    }

    pub fn can_exchange_boost(&self, world_id: &str) -> bool {
        self.state
            .worlds
            .get(world_id)
            .is_some_and(|world| world.coins > 0.0)
    }

    pub fn exchange_boost_preview(&self, world_id: &str) -> ExchangeBoostResult {
        self.state
            .worlds
            .get(world_id)
            .map(|world| economy::exchange_boost(world.coins, world.exchange_rate))
            .unwrap_or_default()
    }

    pub fn execute_exchange_boost(&mut self, world_id: &str) -> Result<ExchangeBoostResult, ActionError> {
        let world = self
            .state
            .worlds
            .get_mut(world_id)
            .ok_or_else(|| ActionError::UnknownWorld(world_id.to_string()))?;
        if world.coins <= 0.0 {
            return Err(ActionError::NothingToExchange);
        }
        let result = economy::exchange_boost(world.coins, world.exchange_rate);
        world.coins -= result.world_coins_cost;
        world.exchange_rate = result.new_exchange_rate;
        self.state.player.add_general_coins(result.general_coins_earned);
        Ok(result)
    }

    fn world_pair(&self, world_id: &str) -> Option<(&WorldConfig, &WorldState)> {
        Some((self.worlds.get(world_id)?, self.state.worlds.get(world_id)?))
    }
}
