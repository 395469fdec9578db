use crate::app::{App, FocusTarget};
use crate::sim::economy;
use crate::sim::engine::Engine;
use crate::sim::world::WorldConfig;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, engine: &Engine, world: &WorldConfig) {
    let border_style = if app.focus() == FocusTarget::Upgrades {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let Some(state) = engine.world(&world.id) else {
        return;
    };

    let upgrades = engine
        .upgrades(&world.id)
        .map(|registry| registry.upgrades())
        .unwrap_or_default();

    let mut items: Vec<ListItem> = upgrades
        .iter()
        .map(|upgrade| {
            let status = if state.has_upgrade(&upgrade.id) {
                Span::styled("OWNED", Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(economy::format_coins(upgrade.cost, &world.coin_symbol))
            };
            let line = Line::from(vec![
                Span::styled(upgrade.name.clone(), Style::default().fg(Color::Yellow)),
                Span::raw(" | "),
                status,
                Span::raw(format!(" | x{:.1}", upgrade.multiplier)),
            ]);
            let detail = Line::from(vec![Span::raw(upgrade.description.clone())]);
            ListItem::new(vec![line, detail])
        })
        .collect();

    if items.is_empty() {
        items.push(ListItem::new(Line::from("No upgrades in this world.")));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title("Upgrades")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !upgrades.is_empty() {
        list_state.select(Some(app.selected_upgrade.min(upgrades.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
