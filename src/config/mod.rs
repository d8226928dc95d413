//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: config struct definitions and loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks that report every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{ChatConfig, Config, ConfigError, IdentityConfig, RateLimitConfig, ServerConfig};
pub use validation::{ValidationError, validate};
