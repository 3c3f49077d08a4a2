//! Small helpers shared by the controllers and the UI.
//!
//! - **Text**: capitalization, control-character stripping and
//!   width-aware truncation for terminal rendering
//! - **Links**: scheme checks before handing an article URL to the OS
//! - **Tasks**: panic capture for spawned background work

mod links;
mod task;
mod text;

pub use links::{validate_url_for_open, LinkError};
pub use task::catch_task_panic;
pub use text::{capitalize, strip_control_chars, truncate_to_width};

/// Longest search query accepted from the search box, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
