use crate::api::Article;
use crate::app::{App, Focus};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the feed: the article list on top and the selected article's
/// details underneath. Placeholder messages replace both while loading or
/// after a failure.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Feed;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if app.search_mode {
        format!(" Search: {}_ ", app.search_input)
    } else {
        format!(" {} ", app.feed.filter().describe())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if let Some(message) = app.feed.region().message() {
        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let articles = app.feed.region().articles();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let width = chunks[0].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = articles
        .iter()
        .map(|article| article_item(article, width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(article) = articles.get(app.selected_article) {
        render_detail(f, article, chunks[1]);
    }
}

/// One list row: title, then source and date dimmed.
pub(super) fn article_item(article: &Article, width: usize) -> ListItem<'static> {
    let title = strip_control_chars(&article.title);
    let meta = format!(
        "  {} · {}",
        strip_control_chars(article.source_or_default()),
        article.published_label()
    );
    let title_width = width.saturating_sub(meta.chars().count());

    ListItem::new(Line::from(vec![
        Span::styled(
            truncate_to_width(&title, title_width).into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(meta, Style::default().fg(Color::DarkGray)),
    ]))
}

fn render_detail(f: &mut Frame, article: &Article, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "Source: {}   Published: {}",
                strip_control_chars(article.source_or_default()),
                article.published_label()
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(strip_control_chars(article.description_or_default()).into_owned()),
        Line::from(""),
        Line::from(Span::styled(
            strip_control_chars(&article.url).into_owned(),
            Style::default().fg(Color::Blue),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(paragraph, area);
}
