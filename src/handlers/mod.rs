//! Server-message handlers.
//!
//! This module contains the [`Handler`] trait and the registry that
//! dispatches parsed server messages to the handler for their command.
//! Handlers update the session and roster, queue replies, and report to the
//! host through the [`Context`].

mod channel;
mod connection;
pub mod core;
mod ctcp;
pub mod invite;
mod messaging;
mod numeric;

pub use self::core::{Context, Handler, HandlerError, HandlerResult, Outcome, Registry};
pub use invite::GameInvite;
