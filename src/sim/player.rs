use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global progress that survives every prestige.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub xp: u64,
    pub level: u32,
    pub general_coins: f64,
    pub lifetime_general_coins: f64,
    pub total_clicks: u64,
    pub total_play_seconds: f64,
    #[serde(default)]
    pub world_total_coins_earned: BTreeMap<String, f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            xp: 0,
            level: 1,
            general_coins: 0.0,
            lifetime_general_coins: 0.0,
            total_clicks: 0,
            total_play_seconds: 0.0,
            world_total_coins_earned: BTreeMap::new(),
        }
    }

    /// Adds XP and advances as many levels as the new total allows.
    /// Returns true if at least one level was gained.
    pub fn add_xp(&mut self, xp: u64) -> bool {
        self.xp = self.xp.saturating_add(xp);
        let mut leveled = false;
        while self.level < MAX_LEVEL && self.xp >= xp_for_level(self.level + 1) {
            self.level += 1;
            leveled = true;
        }
        leveled
    }

    pub fn meets_level(&self, required: u32) -> bool {
        required == 0 || self.level >= required
    }

    pub fn add_general_coins(&mut self, amount: f64) {
        self.general_coins += amount;
        self.lifetime_general_coins += amount;
    }

    pub fn credit_world_earnings(&mut self, world_id: &str, amount: f64) {
        *self
            .world_total_coins_earned
            .entry(world_id.to_string())
            .or_insert(0.0) += amount;
    }
}

// Step costs grow 1.5x per level; near level 97 the cumulative total stops fitting in u64.
pub const MAX_LEVEL: u32 = 90;

/// Cumulative XP needed to reach level `n` from level 1. Each step cost is
/// truncated before it is summed.
pub fn xp_for_level(n: u32) -> u64 {
    if n <= 1 {
        return 0;
    }
    let mut total: u64 = 0;
    let mut step = 100.0_f64;
    for _ in 1..n {
        total = total.saturating_add(step as u64);
        step *= 1.5;
    }
    total
}

pub fn xp_needed_for_next_level(n: u32) -> u64 {
    xp_for_level(n + 1) - xp_for_level(n)
}
