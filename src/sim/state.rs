use super::player::Player;
use super::world::{WorldRegistry, WorldState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Overview,
    World,
    Dashboard,
    OfflineReport,
}

/// Player plus every world's runtime state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub worlds: BTreeMap<String, WorldState>,
    pub last_screen: Screen,
    pub last_world_id: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            worlds: BTreeMap::new(),
            last_screen: Screen::Overview,
            last_world_id: String::new(),
        }
    }

    pub fn for_registry(registry: &WorldRegistry) -> Self {
        let mut state = Self::new();
        for world in registry.iter() {
            state.worlds.insert(
                world.id.clone(),
                WorldState::new(&world.id, world.base_exchange_rate),
            );
        }
        state
    }

    pub fn total_buy_ons_owned(&self) -> u64 {
        self.worlds
            .values()
            .map(WorldState::total_buy_ons_owned)
            .sum()
    }

    pub fn total_prestiges(&self) -> u64 {
        self.worlds
            .values()
            .map(|world| world.prestige_count as u64)
            .sum()
    }
}
