//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// Payload length is below the minimum or not 32-bit aligned.
    #[error("Unsupported payload size: {size}")]
    UnsupportedPayloadSize { size: usize },

    /// Only the oldest record (index 0) may be deleted.
    #[error("Unsupported record index for deletion: {index}")]
    UnsupportedIndex { index: u32 },

    /// The requested record does not exist. A caller bug, not a transient condition.
    #[error("Record index {index} out of range: {count} records stored")]
    IndexOutOfRange { index: u32, count: u32 },

    /// The record cannot fit even after evicting every stored record.
    #[error("Record of {required} bytes can never fit in a {capacity} byte log")]
    InsufficientMemory { required: usize, capacity: usize },

    /// The destination cannot hold the requested bytes. Nothing was copied.
    #[error("Buffer too small: required {required}, provided {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// A byte slice does not parse as a record frame.
    #[error("Malformed record frame: expected {expected} bytes, found {found}")]
    MalformedFrame { expected: usize, found: usize },

    /// The stored chain no longer matches the state descriptor.
    #[error("Corrupted log state: {0}")]
    Corrupted(&'static str),
}

pub type Result<T> = std::result::Result<T, AuditError>;
