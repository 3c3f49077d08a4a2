use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::articles::article_item;

/// Render the recommendations panel. Only called while it has articles.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == Focus::Recommendations {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .recommendations
        .region()
        .articles()
        .iter()
        .map(|article| article_item(article, width))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Recommended for you "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let selected = (app.focus == Focus::Recommendations).then_some(app.selected_recommendation);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
