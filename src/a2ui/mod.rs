//! A runtime for a browser-side, server-driven UI protocol: message schema
//! and validator, a path-addressed reactive data model, a retained-mode
//! component renderer, and an SSE-based transport.

mod message;
mod data_model;
mod registry;
mod renderer;
mod value;
mod validate;
mod transport;

pub use message::*;
pub use data_model::*;
pub use registry::*;
pub use renderer::*;
pub use value::*;
pub use validate::*;
pub use transport::*;
