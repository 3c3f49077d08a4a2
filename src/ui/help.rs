use ratatui::{
    layout::Constraint,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::centered;

const BINDINGS: &[(&str, &str)] = &[
    ("j / Down", "Next article"),
    ("k / Up", "Previous article"),
    ("Enter / o", "Open article in browser"),
    ("Tab", "Switch between feed and recommendations"),
    ("/", "Search"),
    ("1-9", "Filter by category"),
    ("0", "All articles"),
    ("[ / ]", "Previous / next category"),
    ("r", "Retry the current filter"),
    ("L", "Log in"),
    ("R", "Register"),
    ("X", "Log out"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];

pub fn render(f: &mut Frame) {
    let overlay = centered(f.area(), 60, BINDINGS.len() as u16 + 4);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let rows = BINDINGS
        .iter()
        .map(|(key, action)| Row::new(vec![format!("  {}", key), action.to_string()]));

    let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(20)])
        .header(
            Row::new(vec!["Key", "Action"])
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? to close) "),
        );
    f.render_widget(table, overlay);
}
