//! Bearer token lifecycle: encoding, storage, validation and expiry sweeps.

pub mod codec;
pub mod service;
pub mod store;
pub mod sweeper;
pub mod token;
