//! Randomized delay and error injection for report requests.

pub mod catalog;
pub mod engine;
pub mod random;
