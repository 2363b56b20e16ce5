//! Common utilities and shared types for streamhub.
//!
//! This crate provides foundational components used across all streamhub crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Stream keys via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use streamhub_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let key = id_gen.generate_stream_key();
//!     println!("Listening on port {} with key {}", config.server.port, key);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
