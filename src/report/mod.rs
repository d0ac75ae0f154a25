pub mod service;
pub mod template;
