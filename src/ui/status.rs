use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC cancel | ENTER confirm")
    } else if app.auth_form.is_some() {
        Cow::Borrowed("ENTER submit | TAB next field | ESC cancel")
    } else {
        Cow::Borrowed("[/]search [1-9]category [0]all [r]etry [o]pen [Tab]switch [?]help [q]uit")
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
