//! Decode errors

use crate::ValueTag;
use plcsql_diagnostics::{ErrorCode, PLC0200, PLC0201, PLC0202, PLC0203, PLC0204, PlcsqlError};
use thiserror::Error;

/// Errors raised while decoding a message from the database core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The buffer ended inside a tag, length word or payload
    #[error("message truncated at offset {offset}: needed {needed} byte(s), {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A payload length word was negative
    #[error("invalid payload length {length} at offset {offset}")]
    InvalidLength { offset: usize, length: i32 },

    /// The value tag is not one this server understands
    #[error("unknown value type {tag} at offset {offset}")]
    UnknownTag { offset: usize, tag: i32 },

    /// The value tag differs from the type the sender declared for it
    #[error("type mismatch at offset {offset}: declared type {expected}, value has type {found}")]
    TypeMismatch {
        offset: usize,
        expected: i32,
        found: i32,
    },

    /// The payload is not a valid encoding for its tag
    #[error("invalid {tag} payload at offset {offset}: {reason}")]
    InvalidPayload {
        offset: usize,
        tag: ValueTag,
        reason: String,
    },
}

impl DecodeError {
    /// Whether the reader is positioned at the start of the next entry
    ///
    /// Framing errors leave the reader somewhere it cannot resume from.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Truncated { .. } | Self::InvalidLength { .. } => false,
            Self::UnknownTag { .. } | Self::TypeMismatch { .. } | Self::InvalidPayload { .. } => {
                true
            }
        }
    }

    /// Byte offset of the value that failed
    pub fn offset(&self) -> usize {
        match self {
            Self::Truncated { offset, .. }
            | Self::InvalidLength { offset, .. }
            | Self::UnknownTag { offset, .. }
            | Self::TypeMismatch { offset, .. }
            | Self::InvalidPayload { offset, .. } => *offset,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Truncated { .. } => PLC0200,
            Self::InvalidLength { .. } => PLC0201,
            Self::UnknownTag { .. } => PLC0202,
            Self::TypeMismatch { .. } => PLC0203,
            Self::InvalidPayload { .. } => PLC0204,
        }
    }
}

impl From<DecodeError> for PlcsqlError {
    fn from(err: DecodeError) -> Self {
        PlcsqlError::protocol(err.code(), err.to_string(), Some(err.offset()))
    }
}

/// Decode result
pub type DecodeResult<T> = Result<T, DecodeError>;
