//! Key and token generation utilities.

use uuid::Uuid;

/// Generator for opaque identifiers handed out to clients.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new stream key.
    ///
    /// Stream keys are random UUID v4 strings in hyphenated form; they carry
    /// no time component so they cannot be guessed from a creation time.
    #[must_use]
    pub fn generate_stream_key(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
