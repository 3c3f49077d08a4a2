//! Login/register overlay.

use crate::auth::{AuthField, AuthForm};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::render::centered;

pub fn render(f: &mut Frame, form: &AuthForm) {
    let overlay = centered(f.area(), 50, 11);
    if overlay.width < 20 || overlay.height < 7 {
        return;
    }
    f.render_widget(Clear, overlay);

    let field_style = |field: AuthField| {
        if form.field == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let cursor = |field: AuthField| if form.field == field { "_" } else { "" };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Username: ", field_style(AuthField::Username)),
            Span::raw(format!("{}{}", form.username, cursor(AuthField::Username))),
        ]),
        Line::from(vec![
            Span::styled("Password: ", field_style(AuthField::Password)),
            Span::raw(format!("{}{}", form.masked_password(), cursor(AuthField::Password))),
        ]),
        Line::from(""),
    ];

    if form.submitting {
        lines.push(Line::from(Span::styled("Submitting...", Style::default().fg(Color::Gray))));
    } else if let Some(message) = &form.message {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(Enter) Submit  (Tab) Next field  (Esc) Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", form.mode.title())),
    );
    f.render_widget(paragraph, overlay);
}
