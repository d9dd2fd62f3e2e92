//! Error handling module for stackyard
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All recoverable conditions in the engine surface as these variants; nothing
//! in the core aborts the process.

use thiserror::Error;

/// Main error type for stackyard
#[derive(Error, Debug)]
pub enum YardError {
    /// Manual move targeted a slot already at capacity. The live state is
    /// left untouched when this is returned.
    #[error("slot {slot} is full (capacity {capacity})")]
    SlotFull { slot: String, capacity: usize },

    /// An operation referenced a container id absent from the container store
    /// (or, for evict, absent from the named slot's stack).
    #[error("unknown container: {0}")]
    UnknownContainer(String),

    /// An operation referenced a slot id that is not part of the grid.
    #[error("unknown slot: {0}")]
    UnknownSlot(String),

    /// Reorder indices out of bounds for the named slot's stack.
    #[error("invalid reorder indices {from}->{to} for slot {slot} (stack length {len})")]
    InvalidIndex {
        slot: String,
        from: usize,
        to: usize,
        len: usize,
    },

    /// IO errors (persistence, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for stackyard operations
pub type Result<T> = std::result::Result<T, YardError>;

// Convenient error constructors
impl YardError {
    /// Create a slot-full error
    pub fn slot_full(slot: impl Into<String>, capacity: usize) -> Self {
        Self::SlotFull {
            slot: slot.into(),
            capacity,
        }
    }

    /// Create an unknown-container error
    pub fn unknown_container(id: impl Into<String>) -> Self {
        Self::UnknownContainer(id.into())
    }

    /// Create an unknown-slot error
    pub fn unknown_slot(id: impl Into<String>) -> Self {
        Self::UnknownSlot(id.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
