use crate::persist::Settings;
use crate::sim::state::Screen;
use std::collections::VecDeque;

const MAX_MESSAGES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    BuyOns,
    Upgrades,
}

/// Selection and presentation state for the terminal shell. Game state lives
/// in the engine.
#[derive(Debug)]
pub struct App {
    focus: FocusTarget,
    pub screen: Screen,
    pub world_index: usize,
    pub selected_buy_on: usize,
    pub selected_upgrade: usize,
    pub achievements_open: bool,
    pub settings: Settings,
    messages: VecDeque<String>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            focus: FocusTarget::BuyOns,
            screen: Screen::Overview,
            world_index: 0,
            selected_buy_on: 0,
            selected_upgrade: 0,
            achievements_open: false,
            settings,
            messages: VecDeque::with_capacity(MAX_MESSAGES),
        }
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        self.focus = focus;
    }

    /// Moves to the next world, wrapping, and opens its screen.
    pub fn next_world(&mut self, world_count: usize) {
        if world_count == 0 {
            return;
        }
        if self.screen == Screen::World {
            self.world_index = (self.world_index + 1) % world_count;
        } else {
            self.world_index = self.world_index.min(world_count - 1);
        }
        self.screen = Screen::World;
        self.selected_buy_on = 0;
        self.selected_upgrade = 0;
    }

    pub fn toggle_overview(&mut self) {
        self.screen = match self.screen {
            Screen::Overview => Screen::World,
            _ => Screen::Overview,
        };
    }

    pub fn toggle_achievements(&mut self) {
        self.achievements_open = !self.achievements_open;
    }

    pub fn move_selection(&mut self, delta: isize, len: usize) {
        let selected = match self.focus {
            FocusTarget::BuyOns => &mut self.selected_buy_on,
            FocusTarget::Upgrades => &mut self.selected_upgrade,
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let mut idx = *selected as isize + delta;
        if idx < 0 {
            idx = len as isize - 1;
        } else if idx >= len as isize {
            idx = 0;
        }
        *selected = idx as usize;
    }

    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.messages.iter()
    }

    pub fn add_message<S: Into<String>>(&mut self, message: S) {
        if self.messages.len() >= MAX_MESSAGES {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_world_wraps_and_enters_world_screen() {
        let mut app = App::new(Settings::default());
        app.next_world(2);
        assert_eq!(app.screen, Screen::World);
        assert_eq!(app.world_index, 0);
        app.next_world(2);
        assert_eq!(app.world_index, 1);
        app.next_world(2);
        assert_eq!(app.world_index, 0);
    }

    #[test]
    fn selection_wraps_within_focused_list() {
        let mut app = App::new(Settings::default());
        app.move_selection(-1, 5);
        assert_eq!(app.selected_buy_on, 4);
        app.set_focus(FocusTarget::Upgrades);
        app.move_selection(1, 3);
        assert_eq!(app.selected_upgrade, 1);
        assert_eq!(app.selected_buy_on, 4);
    }

    #[test]
    fn message_log_keeps_latest_entries() {
        let mut app = App::new(Settings::default());
        for i in 0..12 {
            app.add_message(format!("event {i}"));
        }
        let messages: Vec<&String> = app.messages().collect();
        assert_eq!(messages.len(), MAX_MESSAGES);
        assert_eq!(messages[0], "event 4");
        assert_eq!(messages[MAX_MESSAGES - 1], "event 11");
    }
}
