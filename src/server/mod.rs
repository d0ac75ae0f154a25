//! Http surface: routing, handlers and middleware over the core services.

pub mod auth;
pub mod health;
pub mod rate_limit;
pub mod reports;
pub mod request_logger;
pub mod server;
