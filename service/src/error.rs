use thiserror::Error;
use vigil_log::AuditError;

use crate::response;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Malformed request: expected {expected} bytes, found {found}")]
    MalformedRequest { expected: usize, found: usize },

    #[error("Unknown command: {0}")]
    UnknownCommand(u8),

    #[error("Truncated request: {0}")]
    Truncated(#[from] std::io::Error),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

impl ServiceError {
    /// Wire status byte reported for this failure.
    pub fn status(&self) -> u8 {
        match self {
            ServiceError::Audit(e) => match e {
                AuditError::UnsupportedPayloadSize { .. }
                | AuditError::UnsupportedIndex { .. } => response::STATUS_NOT_SUPPORTED,
                AuditError::IndexOutOfRange { .. } => response::STATUS_OUT_OF_RANGE,
                AuditError::InsufficientMemory { .. } => response::STATUS_INSUFFICIENT_MEMORY,
                AuditError::BufferTooSmall { .. } => response::STATUS_BUFFER_TOO_SMALL,
                AuditError::MalformedFrame { .. } | AuditError::Corrupted(_) => {
                    response::STATUS_CORRUPTED
                }
            },
            ServiceError::MalformedRequest { .. }
            | ServiceError::UnknownCommand(_)
            | ServiceError::Truncated(_) => response::STATUS_MALFORMED_REQUEST,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
