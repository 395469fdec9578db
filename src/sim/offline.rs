use super::economy;
use super::state::{GameState, Screen};
use super::world::WorldRegistry;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// General coins per second earned while away from the overview screen.
pub const OVERVIEW_RATE_PER_SECOND: f64 = 0.01;
pub const OVERVIEW_CAP: f64 = 100.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfflineReport {
    pub world_id: Option<String>,
    pub world_coins: f64,
    pub general_coins: f64,
    pub elapsed: Duration,
}

impl OfflineReport {
    pub fn is_empty(&self) -> bool {
        self.world_coins <= 0.0 && self.general_coins <= 0.0
    }
}

/// Credits income earned between `saved_at` and `now` to whatever the player
/// was looking at when the game closed.
pub fn apply_offline(
    saved_at: DateTime<Utc>,
    now: DateTime<Utc>,
    state: &mut GameState,
    worlds: &WorldRegistry,
) -> OfflineReport {
    let Ok(elapsed) = (now - saved_at).to_std() else {
        return OfflineReport::default();
    };
    let elapsed_secs = elapsed.as_secs_f64();
    if elapsed_secs <= 0.0 {
        return OfflineReport::default();
    }
    let mut report = OfflineReport {
        elapsed,
        ..OfflineReport::default()
    };

    match state.last_screen {
        Screen::World => {
            let world_id = state.last_world_id.clone();
            let (Some(config), Some(world)) =
                (worlds.get(&world_id), state.worlds.get_mut(&world_id))
            else {
                return report;
            };
            let cap_hours = economy::effective_offline_cap_hours(
                config.offline_cap_hours,
                world.offline_cap_upgrade_level,
            );
            let earned = economy::offline_world_income(
                world.cps,
                config.offline_percentage,
                elapsed_secs,
                cap_hours,
            );
            if earned > 0.0 {
                world.earn(earned);
                state.player.credit_world_earnings(&world_id, earned);
            }
            report.world_id = Some(world_id);
            report.world_coins = earned;
        }
        Screen::Overview => {
            let earned =
                economy::offline_overview_income(OVERVIEW_RATE_PER_SECOND, elapsed_secs, OVERVIEW_CAP);
            state.player.add_general_coins(earned);
            report.general_coins = earned;
        }
        Screen::Dashboard | Screen::OfflineReport => {}
    }
    report
}
