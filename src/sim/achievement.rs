use super::state::GameState;
use super::world::RegistryError;
use std::collections::{BTreeSet, HashMap};

pub type Condition = fn(&GameState) -> bool;

#[derive(Debug, Clone, PartialEq)]
pub enum Reward {
    Xp(u64),
    GeneralCoins(f64),
    Multiplier(f64),
    Cosmetic { id: String },
}

#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Shown as "???" until earned.
    pub hidden: bool,
    pub xp_grant: u64,
    pub reward: Option<Reward>,
    pub condition: Condition,
}

impl Achievement {
    pub fn new(id: &str, name: &str, description: &str, xp_grant: u64, condition: Condition) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            hidden: false,
            xp_grant,
            reward: None,
            condition,
        }
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AchievementRegistry {
    achievements: Vec<Achievement>,
    by_id: HashMap<String, usize>,
}

impl AchievementRegistry {
    pub fn from_achievements(
        achievements: impl IntoIterator<Item = Achievement>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for achievement in achievements {
            if registry.by_id.contains_key(&achievement.id) {
                return Err(RegistryError::DuplicateAchievement(achievement.id));
            }
            registry
                .by_id
                .insert(achievement.id.clone(), registry.achievements.len());
            registry.achievements.push(achievement);
        }
        Ok(registry)
    }

    pub fn with_defaults() -> Result<Self, RegistryError> {
        Self::from_achievements(default_achievements())
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.by_id.get(id).map(|idx| &self.achievements[*idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter()
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn display_name(&self, id: &str, earned: &BTreeSet<String>) -> Option<&str> {
        let achievement = self.get(id)?;
        if achievement.hidden && !earned.contains(id) {
            Some("???")
        } else {
            Some(achievement.name.as_str())
        }
    }
}

/// Ids of unearned achievements whose condition now holds, in registration
/// order. Records nothing; the caller applies unlocks and rewards.
pub fn check_achievements(
    state: &GameState,
    registry: &AchievementRegistry,
    earned: &BTreeSet<String>,
) -> Vec<String> {
    registry
        .iter()
        .filter(|achievement| !earned.contains(&achievement.id))
        .filter(|achievement| (achievement.condition)(state))
        .map(|achievement| achievement.id.clone())
        .collect()
}

pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement::new("first_click", "First Click", "Click once in any world.", 25, |state| {
            state.player.total_clicks >= 1
        }),
        Achievement::new(
            "click_apprentice",
            "Click Apprentice",
            "Reach 100 total clicks.",
            50,
            |state| state.player.total_clicks >= 100,
        ),
        Achievement::new("first_buyon", "Automation Begins", "Buy your first buy-on.", 40, |state| {
            state.total_buy_ons_owned() >= 1
        }),
        Achievement::new(
            "collector_10",
            "Collector",
            "Own 10 total buy-ons across all worlds.",
            100,
            |state| state.total_buy_ons_owned() >= 10,
        ),
        Achievement::new(
            "terra_million",
            "Terra Millionaire",
            "Earn 1,000,000 Terra-Coins.",
            150,
            |state| lifetime_coins(state, "terra") >= 1_000_000.0,
        ),
        Achievement::new(
            "aqua_million",
            "Aqua Millionaire",
            "Earn 1,000,000 Aqua-Coins.",
            150,
            |state| lifetime_coins(state, "aqua") >= 1_000_000.0,
        ),
        Achievement::new(
            "first_prestige",
            "Ascension I",
            "Perform your first prestige.",
            180,
            |state| state.total_prestiges() >= 1,
        )
        .with_reward(Reward::GeneralCoins(25.0)),
        Achievement::new(
            "prestige_10",
            "Prestige Veteran",
            "Reach 10 total prestiges across worlds.",
            300,
            |state| state.total_prestiges() >= 10,
        )
        .with_reward(Reward::GeneralCoins(100.0)),
        Achievement::new(
            "worldhopper",
            "Worldhopper",
            "Earn coins in two different worlds.",
            90,
            |state| {
                state
                    .player
                    .world_total_coins_earned
                    .values()
                    .filter(|earned| **earned > 0.0)
                    .count()
                    >= 2
            },
        ),
        Achievement::new("level_5", "Rising Star", "Reach account level 5.", 120, |state| {
            state.player.level >= 5
        }),
    ]
}

fn lifetime_coins(state: &GameState, world_id: &str) -> f64 {
    state
        .worlds
        .get(world_id)
        .map(|world| world.total_coins_earned)
        .unwrap_or(0.0)
}
