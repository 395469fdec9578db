use crate::app::App;
use crate::sim::economy;
use crate::sim::player::{MAX_LEVEL, xp_for_level, xp_needed_for_next_level};
use crate::sim::engine::Engine;
use crate::sim::state::Screen;
use crate::sim::world::WorldConfig;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

pub mod achievements_view;
pub mod buy_ons_view;
pub mod overview_view;
pub mod upgrades_view;

pub fn current_world<'a>(app: &App, engine: &'a Engine) -> Option<&'a WorldConfig> {
    engine.worlds().iter().nth(app.world_index)
}

pub fn render(frame: &mut Frame, app: &App, engine: &Engine) {
    let size = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(10),
            Constraint::Length(2),
        ])
        .split(size);

    render_header(frame, layout[0], engine);

    match (app.screen, current_world(app, engine)) {
        (Screen::World, Some(world)) => render_world(frame, layout[1], app, engine, world),
        _ => overview_view::render(frame, layout[1], app, engine),
    }

    render_log(frame, layout[2], app);
    render_footer(frame, layout[3], app, engine);

    if app.achievements_open {
        achievements_view::render(frame, engine);
    }
}

fn render_header(frame: &mut Frame, area: Rect, engine: &Engine) {
    let player = &engine.state().player;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Idle Orbit",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  Level "),
            Span::styled(format!("{}", player.level), Style::default().fg(Color::Cyan)),
            Span::raw(level_progress(player.level, player.xp)),
            Span::raw("  •  General: "),
            Span::styled(
                economy::format_coins(player.general_coins, "GC"),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("  •  Achievements: "),
            Span::raw(format!(
                "{}/{}",
                engine.earned().len(),
                engine.achievements().len()
            )),
        ]),
        Line::from(vec![Span::raw(
            "Tab visits the next world, O returns to the overview.",
        )]),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn level_progress(level: u32, xp: u64) -> String {
    if level >= MAX_LEVEL {
        return format!(" ({xp} XP, max)");
    }
    let into_level = xp.saturating_sub(xp_for_level(level));
    format!(" ({into_level}/{} XP)", xp_needed_for_next_level(level))
}

fn render_world(frame: &mut Frame, area: Rect, app: &App, engine: &Engine, world: &WorldConfig) {
    let sections = Layout::vertical([Constraint::Length(5), Constraint::Min(0)]).split(area);
    render_world_summary(frame, sections[0], engine, world);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(sections[1]);
    buy_ons_view::render(frame, columns[0], app, engine, world);
    upgrades_view::render(frame, columns[1], app, engine, world);
}

fn render_world_summary(frame: &mut Frame, area: Rect, engine: &Engine, world: &WorldConfig) {
    let block = Block::default()
        .title(world.name.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let rows = Layout::vertical([Constraint::Length(2), Constraint::Length(1)]).split(inner);

    let Some(state) = engine.world(&world.id) else {
        return;
    };
    let preview = engine.exchange_boost_preview(&world.id);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                economy::format_coins(state.coins, &world.coin_symbol),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  •  {}/s", economy::format_cps(state.cps))),
            Span::raw(format!(
                "  •  click {}",
                economy::format_coins_bare(engine.click_power(&world.id, 1.0))
            )),
            Span::raw(format!("  •  prestige x{:.2}", state.prestige_multiplier)),
        ]),
        Line::from(vec![Span::raw(format!(
            "Exchange: {} for {:.3} GC (rate {:.5})",
            economy::format_coins(preview.world_coins_cost, &world.coin_symbol),
            preview.general_coins_earned,
            state.exchange_rate
        ))]),
    ];
    frame.render_widget(Paragraph::new(lines), rows[0]);

    let (current, target) = engine.prestige_progress(&world.id);
    let ratio = if target > 0.0 {
        (current / target).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let label = if engine.can_prestige(&world.id) {
        "Prestige ready [P]".to_string()
    } else {
        format!(
            "Prestige {} / {}",
            economy::format_coins_bare(current),
            economy::format_coins_bare(target)
        )
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, rows[1]);
}

fn render_log(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title("Event Log").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut items: Vec<ListItem> = app
        .messages()
        .map(|msg| ListItem::new(msg.clone()))
        .collect();
    if items.is_empty() {
        items.push(ListItem::new("Nothing has happened yet."));
    }
    frame.render_widget(List::new(items), inner);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, engine: &Engine) {
    let key = Style::default().fg(Color::Yellow);
    let exchange_key = match current_world(app, engine) {
        Some(world) if app.screen == Screen::World && engine.can_exchange_boost(&world.id) => key,
        _ => Style::default().fg(Color::DarkGray),
    };
    let instructions = Paragraph::new(Line::from(vec![
        Span::raw("Hotkeys: "),
        Span::styled("[Space]", Style::default().fg(Color::Yellow)),
        Span::raw(" click  •  "),
        Span::styled("[↑/↓]", Style::default().fg(Color::Yellow)),
        Span::raw(" select  •  "),
        Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
        Span::raw(" panel  •  "),
        Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
        Span::raw(" buy  •  "),
        Span::styled("[U]", Style::default().fg(Color::Yellow)),
        Span::raw(" upgrade  •  "),
        Span::styled("[P]", Style::default().fg(Color::Yellow)),
        Span::raw(" prestige  •  "),
        Span::styled("[E]", exchange_key),
        Span::raw(" exchange  •  "),
        Span::styled("[A]", Style::default().fg(Color::Yellow)),
        Span::raw(" achievements  •  "),
        Span::styled("[Q]", Style::default().fg(Color::Yellow)),
        Span::raw(" save & quit"),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(instructions, area);
}
