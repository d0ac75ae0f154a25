//! # Mock Credit Bureau Library
//!
//! Issues and validates bearer tokens and serves canned report payloads
//! after a randomized delay, occasionally injecting simulated errors.
//!
//! Modules:
//! - `auth`: token codec, store, service and expiry sweeper
//! - `simulation`: random source, error catalog, delay/error engine
//! - `report`: report templates and the service owning them
//! - `config`: service configuration, loading and validation
//! - `server`: axum routes and middleware

pub mod auth;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod report;
pub mod server;
pub mod simulation;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::settings::ServiceConfig;
pub use crate::errors::{DecodeError, ReportError, TokenGenerationError};
