use crate::sim::engine::Engine;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem};

pub fn render(frame: &mut Frame, engine: &Engine) {
    let area = centered_rect(60, 70, frame.size());
    frame.render_widget(Clear, area);

    let earned = engine.earned();
    let registry = engine.achievements();
    let items: Vec<ListItem> = registry
        .iter()
        .map(|achievement| {
            let unlocked = earned.contains(&achievement.id);
            let name = registry
                .display_name(&achievement.id, earned)
                .unwrap_or("???")
                .to_string();
            let (marker, style) = if unlocked {
                ("✔ ", Style::default().fg(Color::LightGreen))
            } else {
                ("  ", Style::default().fg(Color::DarkGray))
            };
            let description = if achievement.hidden && !unlocked {
                "Hidden until earned.".to_string()
            } else {
                format!("{}  (+{} XP)", achievement.description, achievement.xp_grant)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(name, style.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(description),
            ])
        })
        .collect();

    let mut title = format!("Achievements {}/{}", earned.len(), registry.len());
    if !engine.cosmetics().is_empty() {
        title.push_str(&format!("  •  {} cosmetics", engine.cosmetics().len()));
    }
    title.push_str("  •  A to close");
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal[1]
}
