//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events, and a periodic tick.

use crate::app::{App, AppEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Run the TUI until the user quits or a termination signal arrives.
///
/// Boots the first page before entering the loop. A panic hook restores the
/// terminal before the default hook prints, so a crash never leaves the
/// terminal in raw mode.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    app.bootstrap(&event_tx);

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain finished background work before waiting on input again
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event, &event_tx);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.needs_redraw = true;
                        if handle_input(app, key.code, key.modifiers, &event_tx) == Action::Quit {
                            break;
                        }
                    }
                    Some(Ok(Event::Resize(..))) => app.needs_redraw = true,
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event stream error"),
                    None => break,
                    _ => {}
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event, &event_tx);
            }

            _ = tick_interval.tick() => {}
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
