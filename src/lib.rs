//! Terminal client for a news aggregation API.
//!
//! The crate is split into the remote API wrapper, the session cell that
//! every login-gated component awaits, the controllers that drive the
//! article feed, recommendations and interaction tracking, and the TUI
//! that hosts them.
//!
//! # Module Structure
//!
//! - `api` - Typed client for the remote news service
//! - `session` - Resolve-once session state shared by all controllers
//! - `feed` - Article feed loading with last-request-wins semantics
//! - `recommendations` - Login-gated recommendation panel
//! - `tracker` - Best-effort click-through recording
//! - `nav` - Projection of session state onto navigation controls
//! - `auth` - Login and registration flows
//! - `config` - Optional TOML configuration file
//! - `app` - Central application state and background events
//! - `ui` - Terminal event loop and rendering
//! - `util` - Text, link and task helpers

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod feed;
pub mod nav;
pub mod recommendations;
pub mod session;
pub mod tracker;
pub mod ui;
pub mod util;
