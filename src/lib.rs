//! # Audience Agent Library
//!
//! Runs Criteo Marketing Solutions audience operations for a batch of input
//! items: every item gets its own client-credentials token, a request shaped
//! for its operation, and exactly one output item in input order.
//!
//! Modules:
//! - `config` — service configuration, credentials and validation
//! - `sources` — OAuth2 token source and authenticated API client
//! - `audience` — typed audience operations and their JSON:API payloads
//! - `dispatcher` — per-item execution with failure tolerance
//! - `observability` — prometheus metrics

pub mod config;
pub mod sources;
pub mod audience;
pub mod dispatcher;
pub mod observability;
pub mod errors;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::config::service::ServiceConfig;
pub use crate::errors::{AgentError, ItemError};
pub use crate::dispatcher::executor::{Dispatcher, OutputItem};
