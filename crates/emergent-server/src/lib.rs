//! Tool registry, dispatcher, stdio/HTTP transports, and the janitor
//! scheduler for the spec-driven-development MCP server (§4.G-§4.K).
//!
//! `emergent-cli` is the only caller of this crate: it builds a
//! [`registry::Registry`] and a [`emergent_client::ClientFactory`] once at
//! startup and hands them to whichever transport the configured
//! [`emergent_config::TransportMode`] selects.

pub mod context;
pub mod dispatcher;
pub mod guard_state;
pub mod janitor;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod scheduler;
pub mod tools;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use registry::Registry;
