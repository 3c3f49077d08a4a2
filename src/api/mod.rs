//! Typed wrapper over the remote news service.
//!
//! Every operation is a single request/response round trip. The client owns
//! no application state beyond the cookie store that carries the session
//! credential between calls.
//!
//! - [`client`] - `NewsClient` and the seven endpoint calls
//! - [`types`] - Wire types (`Article`, `ArticleId`, `SessionStatus`)
//! - [`error`] - `ApiError` taxonomy

mod client;
mod error;
mod types;

pub use client::{NewsClient, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use types::{Article, ArticleId, AuthReply, SessionStatus};
