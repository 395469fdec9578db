use super::achievement::{Reward, check_achievements};
use super::engine::Engine;
use std::time::Duration;
use tracing::{debug, info};

/// Simulated seconds between achievement evaluations.
pub const ACHIEVEMENT_CHECK_INTERVAL: f64 = 5.0;
/// Simulated seconds between autosave requests.
pub const AUTOSAVE_INTERVAL: f64 = 30.0;
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

// Absorbs float drift so fifty 0.1s steps complete a 5s interval.
const TIMER_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AchievementUnlocked { id: String },
    LevelUp { level: u32 },
    AutosaveRequested,
}

impl Engine {
    /// Advances the simulation by `dt` seconds. Never reads a clock; the
    /// caller owns time and performs any I/O the returned events ask for.
    pub fn tick(&mut self, dt: f64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if dt <= 0.0 {
            return events;
        }

        for (world_id, world) in self.state.worlds.iter_mut() {
            if world.cps <= 0.0 {
                continue;
            }
            let earned = world.cps * dt;
            world.earn(earned);
            self.state.player.credit_world_earnings(world_id, earned);
        }
        self.state.player.total_play_seconds += dt;

        self.achievement_timer += dt;
        if self.achievement_timer + TIMER_EPSILON >= ACHIEVEMENT_CHECK_INTERVAL {
            self.achievement_timer = 0.0;
            self.unlock_achievements(&mut events);
        }

        self.autosave_timer += dt;
        if self.autosave_timer + TIMER_EPSILON >= AUTOSAVE_INTERVAL {
            self.autosave_timer = 0.0;
            events.push(EngineEvent::AutosaveRequested);
        }

        events
    }

    fn unlock_achievements(&mut self, events: &mut Vec<EngineEvent>) {
        let unlocked = check_achievements(&self.state, &self.achievements, &self.earned);
        for id in unlocked {
            let Some(achievement) = self.achievements.get(&id) else {
                continue;
            };
            let player = &mut self.state.player;
            let level_before = player.level;
            player.add_xp(achievement.xp_grant);
            match &achievement.reward {
                Some(Reward::Xp(xp)) => {
                    player.add_xp(*xp);
                }
                Some(Reward::GeneralCoins(amount)) => player.add_general_coins(*amount),
                Some(Reward::Cosmetic { id: cosmetic }) => {
                    self.cosmetics.insert(cosmetic.clone());
                }
                Some(Reward::Multiplier(value)) => {
                    debug!(achievement = %id, multiplier = value, "multiplier reward recorded");
                }
                None => {}
            }
            let level_after = player.level;

            info!(achievement = %id, "achievement unlocked");
            self.earned.insert(id.clone());
            if level_after > level_before {
                events.push(EngineEvent::LevelUp { level: level_after });
            }
            events.push(EngineEvent::AchievementUnlocked { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::achievement::{Achievement, AchievementRegistry};
    use crate::sim::state::GameState;
    use crate::sim::worlds::{AQUA, TERRA, default_registry};
    use std::cell::Cell;

    fn engine_with(achievements: AchievementRegistry) -> Engine {
        let worlds = default_registry().expect("builtin worlds");
        let state = GameState::for_registry(&worlds);
        Engine::new(state, worlds, achievements).expect("engine builds")
    }

    fn engine() -> Engine {
        engine_with(AchievementRegistry::with_defaults().expect("default achievements"))
    }

    fn unlocked(events: &[EngineEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::AchievementUnlocked { id } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    thread_local! {
        static EVALUATIONS: Cell<u32> = const { Cell::new(0) };
    }

    fn counting_condition(_: &GameState) -> bool {
        EVALUATIONS.with(|count| count.set(count.get() + 1));
        false
    }

    #[test]
    fn accrues_income_for_producing_worlds() {
        let mut engine = engine();
        engine.state.worlds.get_mut(TERRA).expect("terra").cps = 2.0;

        let events = engine.tick(1.5);
        assert!(events.is_empty());
        let terra = engine.world(TERRA).expect("terra");
        assert!((terra.coins - 3.0).abs() < 1e-9);
        assert!((terra.total_coins_earned - 3.0).abs() < 1e-9);
        assert_eq!(engine.world(AQUA).expect("aqua").coins, 0.0);
        let player = &engine.state().player;
        assert!((player.world_total_coins_earned[TERRA] - 3.0).abs() < 1e-9);
        assert!(!player.world_total_coins_earned.contains_key(AQUA));
        assert!((player.total_play_seconds - 1.5).abs() < 1e-9);
    }

    #[test]
    fn short_ticks_skip_achievement_evaluation() {
        EVALUATIONS.with(|count| count.set(0));
        let registry = AchievementRegistry::from_achievements(vec![Achievement::new(
            "never",
            "Never",
            "",
            0,
            counting_condition,
        )])
        .expect("registers");
        let mut engine = engine_with(registry);

        engine.tick(4.9);
        assert_eq!(EVALUATIONS.with(Cell::get), 0);

        // The timer accumulates, so the next tick completes the interval.
        engine.tick(0.1);
        assert_eq!(EVALUATIONS.with(Cell::get), 1);
        engine.tick(4.9);
        assert_eq!(EVALUATIONS.with(Cell::get), 1);
    }

    #[test]
    fn always_true_achievement_fires_exactly_once() {
        let registry = AchievementRegistry::from_achievements(vec![Achievement::new(
            "free",
            "Free",
            "",
            10,
            |_| true,
        )])
        .expect("registers");
        let mut engine = engine_with(registry);

        let mut fired = 0;
        for _ in 0..20 {
            fired += unlocked(&engine.tick(5.0)).len();
        }
        assert_eq!(fired, 1);
        assert!(engine.earned().contains("free"));
        assert_eq!(engine.state().player.xp, 10);
    }

    #[test]
    fn unlock_grants_xp_reward_and_level_up() {
        let mut engine = engine();
        engine.state.player.total_clicks = 100;
        engine.state.player.xp = 50;

        let events = engine.tick(ACHIEVEMENT_CHECK_INTERVAL);
        assert_eq!(unlocked(&events), vec!["first_click", "click_apprentice"]);
        // first_click leaves 75 XP; click_apprentice crosses 100.
        assert_eq!(
            events,
            vec![
                EngineEvent::AchievementUnlocked {
                    id: "first_click".to_string()
                },
                EngineEvent::LevelUp { level: 2 },
                EngineEvent::AchievementUnlocked {
                    id: "click_apprentice".to_string()
                },
            ]
        );
        assert_eq!(engine.state().player.xp, 125);
        assert_eq!(engine.state().player.level, 2);
    }

    #[test]
    fn general_coin_rewards_credit_current_and_lifetime() {
        let mut engine = engine();
        engine.state.worlds.get_mut(TERRA).expect("terra").prestige_count = 1;

        let events = engine.tick(ACHIEVEMENT_CHECK_INTERVAL);
        assert_eq!(unlocked(&events), vec!["first_prestige"]);
        let player = &engine.state().player;
        assert!((player.general_coins - 25.0).abs() < 1e-9);
        assert!((player.lifetime_general_coins - 25.0).abs() < 1e-9);
        assert_eq!(player.xp, 180);
    }

    #[test]
    fn cosmetic_rewards_are_recorded() {
        let registry = AchievementRegistry::from_achievements(vec![
            Achievement::new("shiny", "Shiny", "", 0, |_| true).with_reward(Reward::Cosmetic {
                id: "gold_frame".to_string(),
            }),
        ])
        .expect("registers");
        let mut engine = engine_with(registry);
        engine.tick(ACHIEVEMENT_CHECK_INTERVAL);
        assert!(engine.cosmetics().contains("gold_frame"));
    }

    fn autosaves(events: &[EngineEvent]) -> usize {
        events
            .iter()
            .filter(|event| **event == EngineEvent::AutosaveRequested)
            .count()
    }

    #[test]
    fn autosave_requested_once_per_interval() {
        let mut short = engine();
        assert_eq!(autosaves(&short.tick(29.9)), 0);

        let mut long = engine();
        assert_eq!(autosaves(&long.tick(AUTOSAVE_INTERVAL)), 1);
        assert_eq!(autosaves(&long.tick(AUTOSAVE_INTERVAL * 3.0)), 1);

        let mut steady = engine();
        let total: usize = (0..120).map(|_| autosaves(&steady.tick(0.5))).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn small_steps_complete_intervals_on_time() {
        let registry = AchievementRegistry::from_achievements(vec![Achievement::new(
            "free",
            "Free",
            "",
            0,
            |_| true,
        )])
        .expect("registers");
        let mut engine = engine_with(registry);

        let mut first_unlock = None;
        let mut first_autosave = None;
        for step in 1..=300 {
            let events = engine.tick(0.1);
            if first_unlock.is_none() && !unlocked(&events).is_empty() {
                first_unlock = Some(step);
            }
            if first_autosave.is_none() && autosaves(&events) > 0 {
                first_autosave = Some(step);
            }
        }
        assert_eq!(first_unlock, Some(50));
        assert_eq!(first_autosave, Some(300));
    }

    #[test]
    fn income_lands_before_achievements_and_autosave() {
        let mut engine = engine();
        engine.state.worlds.get_mut(TERRA).expect("terra").cps = 40_000.0;

        let events = engine.tick(AUTOSAVE_INTERVAL);
        assert_eq!(
            events,
            vec![
                EngineEvent::LevelUp { level: 2 },
                EngineEvent::AchievementUnlocked {
                    id: "terra_million".to_string()
                },
                EngineEvent::AutosaveRequested,
            ]
        );
        // Whatever the autosave writes already includes the unlock.
        assert!(engine.earned().contains("terra_million"));
        assert_eq!(engine.state().player.xp, 150);
        assert!(engine.world(TERRA).expect("terra").total_coins_earned >= 1_000_000.0);
    }

    #[test]
    fn non_positive_delta_does_nothing() {
        let mut engine = engine();
        engine.state.worlds.get_mut(TERRA).expect("terra").cps = 5.0;
        let before = engine.state().clone();
        assert!(engine.tick(0.0).is_empty());
        assert!(engine.tick(-1.0).is_empty());
        assert_eq!(engine.state(), &before);
    }
}
