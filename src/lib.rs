//! # Description
//!
//! A browser-side runtime for a server-driven UI protocol: a message schema
//! and structural validator, a path-addressed reactive data model with
//! batched dirty-tracking, a retained-mode component renderer, an SSE-based
//! transport with reconnect and action submission, and a host integration
//! bridge for embedding applications.
//!
//! # Features
//!
//! - A typed message envelope (`SurfaceUpdate`, `DataModelUpdate`,
//!   `BeginRendering`, `DeleteSurface`) with advisory structural validation.
//! - A `DataModel` supporting path subscriptions, coalesced batch
//!   notifications, and template-list expansion.
//! - A headless `Renderer` producing a retained component tree, independent
//!   of any particular widget toolkit.
//! - An async `Transport` that opens one SSE stream per surface, reconnects
//!   with a fixed backoff, and POSTs resolved actions back to the server.
//! - An `A2uiBridge`/`SurfaceHandle` pair for embedding a surface into host
//!   application state.

pub mod a2ui;
pub mod bridge;
pub mod config;
pub mod error;

pub mod prelude {
    pub use crate::a2ui::*;
    pub use crate::bridge::{A2uiBridge, ActionDisposer, SurfaceHandle};
    pub use crate::config::A2uiConfig;
    pub use crate::error::A2uiError;
}
