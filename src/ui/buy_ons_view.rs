use crate::app::{App, FocusTarget};
use crate::sim::economy;
use crate::sim::engine::Engine;
use crate::sim::world::WorldConfig;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

pub fn render(frame: &mut Frame, area: Rect, app: &App, engine: &Engine, world: &WorldConfig) {
    let border_style = if app.focus() == FocusTarget::BuyOns {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let Some(state) = engine.world(&world.id) else {
        return;
    };
    let level = engine.state().player.level;

    let buy_ons = engine
        .upgrades(&world.id)
        .map(|registry| registry.buy_ons())
        .unwrap_or_default();

    let items: Vec<ListItem> = buy_ons
        .iter()
        .map(|buy_on| {
            let owned = state.owned(&buy_on.id);
            let cost = economy::cost_for_next(buy_on, owned);
            let locked = buy_on.level_requirement > level;
            let name_style = if locked {
                Style::default().fg(Color::DarkGray)
            } else if state.coins >= cost {
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut header = vec![
                Span::styled(buy_on.name.clone(), name_style),
                Span::raw(format!("  x{owned}")),
                Span::raw(format!(
                    "  | {}",
                    economy::format_coins(cost, &world.coin_symbol)
                )),
            ];
            if locked {
                header.push(Span::styled(
                    format!("  (level {})", buy_on.level_requirement),
                    Style::default().fg(Color::LightRed),
                ));
            }
            let detail = Line::from(format!(
                "{}  •  {}/s each",
                buy_on.description,
                economy::format_cps(buy_on.base_cps)
            ));
            ListItem::new(vec![Line::from(header), detail])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Buy-ons")
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !buy_ons.is_empty() {
        list_state.select(Some(app.selected_buy_on.min(buy_ons.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}
