use crate::app::App;
use crate::util::capitalize;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the top bar: brand, category tabs, then auth controls.
///
/// Auth controls come straight from `app.nav`; while the session check is in
/// flight none of them is drawn.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let active = app.feed.active_category();

    let mut spans = vec![Span::styled(
        " Headlines ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    let all_style = if app.feed.filter().is_unfiltered() {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    spans.push(Span::styled(" 0 All ", all_style));

    for (i, name) in app.categories.iter().enumerate() {
        let style = if active == Some(name.as_str()) {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = match i {
            0..=8 => format!(" {} {} ", i + 1, capitalize(name)),
            _ => format!(" {} ", capitalize(name)),
        };
        spans.push(Span::styled(label, style));
    }

    let nav = &app.nav;
    let mut auth = Vec::new();
    if let Some(welcome) = &nav.welcome {
        auth.push(Span::styled(
            format!("  {} ", welcome),
            Style::default().fg(Color::Green),
        ));
    }
    if nav.show_login {
        auth.push(Span::styled("  [L]ogin", Style::default().fg(Color::Yellow)));
    }
    if nav.show_register {
        auth.push(Span::styled("  [R]egister", Style::default().fg(Color::Yellow)));
    }
    if nav.show_logout {
        auth.push(Span::styled("  [X] Logout", Style::default().fg(Color::Yellow)));
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Auth controls are right-aligned and never squeezed out by the tabs
    let auth_width = auth.iter().map(|s| s.width()).sum::<usize>().min(inner.width as usize) as u16;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(auth_width)])
        .split(inner);

    f.render_widget(Paragraph::new(Line::from(spans)), columns[0]);
    f.render_widget(Paragraph::new(Line::from(auth)), columns[1]);
}
