use crate::app::App;
use crate::sim::economy;
use crate::sim::engine::Engine;
use crate::sim::player::xp_for_level;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub fn render(frame: &mut Frame, area: Rect, app: &App, engine: &Engine) {
    let sections = Layout::vertical([Constraint::Length(6), Constraint::Min(3)]).split(area);

    let stats_block = Block::default().title("Account").borders(Borders::ALL);
    let stats_area = stats_block.inner(sections[0]);
    frame.render_widget(stats_block, sections[0]);

    let player = &engine.state().player;
    let next_level = xp_for_level(player.level + 1);
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("General coins", Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                ": {}  (lifetime {})",
                economy::format_coins_bare(player.general_coins),
                economy::format_coins_bare(player.lifetime_general_coins)
            )),
        ]),
        Line::from(vec![
            Span::styled("Experience", Style::default().fg(Color::LightGreen)),
            Span::raw(format!(": {} / {} for level {}", player.xp, next_level, player.level + 1)),
        ]),
        Line::from(format!(
            "Clicks: {}    Play time: {:.0}m",
            player.total_clicks,
            player.total_play_seconds / 60.0
        )),
        Line::from("While you idle on this screen, general coins trickle in offline."),
    ];
    frame.render_widget(Paragraph::new(stats_lines).wrap(Wrap { trim: true }), stats_area);

    let items: Vec<ListItem> = engine
        .worlds()
        .iter()
        .map(|world| {
            let Some(state) = engine.world(&world.id) else {
                return ListItem::new(world.name.clone());
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        world.name.clone(),
                        Style::default()
                            .fg(Color::LightCyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(
                        "  {}  •  {}/s",
                        economy::format_coins(state.coins, &world.coin_symbol),
                        economy::format_cps(state.cps)
                    )),
                ]),
                Line::from(format!(
                    "Prestiges: {}  •  multiplier x{:.2}  •  earned {}",
                    state.prestige_count,
                    state.prestige_multiplier,
                    economy::format_coins_bare(state.total_coins_earned)
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("Worlds").borders(Borders::ALL))
        .highlight_symbol("▶ ");
    let mut list_state = ListState::default();
    if !engine.worlds().is_empty() {
        list_state.select(Some(app.world_index.min(engine.worlds().len() - 1)));
    }
    frame.render_stateful_widget(list, sections[1], &mut list_state);
}
