//! Core business logic for streamhub.

pub mod services;

pub use services::*;
