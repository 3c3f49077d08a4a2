//! Layout and overlay dispatch.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{articles, dialog, help, nav, recommendations, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Width of the recommendations panel when shown, in percent.
const RECOMMENDATIONS_WIDTH: u16 = 32;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    nav::render(f, app, rows[0]);
    render_main_panels(f, app, rows[1]);
    status::render(f, app, rows[2]);

    if let Some(form) = &app.auth_form {
        dialog::render(f, form);
    }
    if app.show_help {
        help::render(f);
    }
}

/// Feed on the left; recommendations on the right only while the panel has
/// articles to show.
fn render_main_panels(f: &mut Frame, app: &App, area: Rect) {
    if app.recommendations.region().is_visible() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - RECOMMENDATIONS_WIDTH),
                Constraint::Percentage(RECOMMENDATIONS_WIDTH),
            ])
            .split(area);
        articles::render(f, app, columns[0]);
        recommendations::render(f, app, columns[1]);
    } else {
        articles::render(f, app, area);
    }
}

/// A rectangle of at most `width` x `height`, centered in `area`.
pub(super) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Article, ArticleId, NewsClient, DEFAULT_TIMEOUT};
    use crate::config::Config;
    use crate::feed::FilterState;
    use crate::session::SessionState;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let client = NewsClient::new("http://127.0.0.1:1", DEFAULT_TIMEOUT).unwrap();
        App::new(client, &Config::default(), FilterState::all())
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn article(id: &str, title: &str) -> Article {
        Article {
            id: ArticleId::new(id),
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{}", id),
            image_url: None,
            source: None,
            published_at: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_boot_screen_shows_placeholder_and_no_auth_controls() {
        let mut app = test_app();
        app.feed.begin(FilterState::all());
        let text = screen(&app, 100, 24);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("[L]ogin"));
        assert!(!text.contains("Recommended"));
    }

    #[tokio::test]
    async fn test_logged_in_screen() {
        let mut app = test_app();
        app.handle_session_resolved(0, SessionState::logged_in("alice"));
        let generation = app.feed.begin(FilterState::all());
        app.handle_feed_loaded(generation, FilterState::all(), Ok(vec![article("1", "Markets rally")]));
        app.handle_recommendations_loaded(0, vec![article("2", "Picked for you")]);

        let text = screen(&app, 120, 30);
        assert!(text.contains("Welcome, alice"));
        assert!(text.contains("Logout"));
        assert!(!text.contains("Login"));
        assert!(text.contains("Markets rally"));
        assert!(text.contains("Recommended"));
        assert!(text.contains("Picked for you"));
    }

    #[tokio::test]
    async fn test_small_terminal_message() {
        let app = test_app();
        assert!(screen(&app, 40, 8).contains("Terminal too small"));
    }
}
