//! PL/CSQL error codes following a structured numbering system
//!
//! Error code ranges:
//! - PLC0100-PLC0199: Semantic errors (type checking, coercion)
//! - PLC0200-PLC0299: Protocol errors (handshake decoding)
//! - PLC0400-PLC0499: System errors (build integration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a semantic error (0100-0199)
    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a protocol error (0200-0299)
    pub const fn is_protocol_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PLC{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Semantic errors (0100-0199)
    map.insert(110, ErrorInfo::new("Incompatible types")
        .with_help("No implicit conversion exists between these types"));

    // Protocol errors (0200-0299)
    map.insert(200, ErrorInfo::new("Truncated message"));
    map.insert(201, ErrorInfo::new("Invalid payload length"));
    map.insert(202, ErrorInfo::new("Unknown value type"));
    map.insert(203, ErrorInfo::new("Value type mismatch"));
    map.insert(204, ErrorInfo::new("Invalid value payload"));

    // System errors (0400-0499)
    map.insert(410, ErrorInfo::new("Missing conversion routine")
        .with_help("Every coercion matrix entry needs a routine in the support library"));

    map
});

// Semantic errors
pub const PLC0110: ErrorCode = ErrorCode::new(110);

// Protocol errors
pub const PLC0200: ErrorCode = ErrorCode::new(200);
pub const PLC0201: ErrorCode = ErrorCode::new(201);
pub const PLC0202: ErrorCode = ErrorCode::new(202);
pub const PLC0203: ErrorCode = ErrorCode::new(203);
pub const PLC0204: ErrorCode = ErrorCode::new(204);

// System errors
pub const PLC0410: ErrorCode = ErrorCode::new(410);
