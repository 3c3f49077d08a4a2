//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Layout and overlay dispatch
//! - `nav` - Top bar with category tabs and auth controls
//! - `articles` - Feed list and article detail
//! - `recommendations` - Recommendations side panel
//! - `dialog` - Login/register overlay
//! - `help` - Keybinding overlay
//! - `status` - Status bar

mod articles;
mod dialog;
mod events;
mod help;
mod input;
mod loop_runner;
mod nav;
mod recommendations;
mod render;
mod status;

pub use events::handle_app_event;
pub use input::handle_input;
pub use loop_runner::{run, Action};
