//! Core handler infrastructure: the context passed to handlers, the handler
//! trait and the registry that dispatches parsed server messages.

pub mod context;
pub mod registry;

pub use context::{Context, Handler, HandlerError, HandlerResult, Outcome, target_or_trailing};
pub use registry::Registry;
