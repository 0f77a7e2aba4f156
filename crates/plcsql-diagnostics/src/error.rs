//! PL/CSQL error types

use crate::{ErrorCode, SourceLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An error report with location and help text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic for a terminal
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let mut out = format!("{}[{}]: {}", "error".red().bold(), self.code, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!("\n  {} {}", "-->".cyan(), loc));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main PL/CSQL error type
#[derive(Debug, Clone, Error)]
pub enum PlcsqlError {
    /// Semantic error raised while compiling a procedure (type checking)
    #[error("{code}: {message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        location: Option<SourceLocation>,
    },

    /// Error decoding a message received from the database core
    #[error("{code}: {message}")]
    Protocol {
        code: ErrorCode,
        message: String,
        offset: Option<usize>,
    },

    /// System error (build integration)
    #[error("{code}: {message}")]
    System { code: ErrorCode, message: String },
}

impl PlcsqlError {
    /// Create a semantic error
    pub fn semantic(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Create a semantic error at a source location
    pub fn semantic_at(
        code: ErrorCode,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            location: Some(location),
        }
    }

    /// Create a protocol error at a byte offset of the message
    pub fn protocol(code: ErrorCode, message: impl Into<String>, offset: Option<usize>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            offset,
        }
    }

    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Semantic { code, .. } => *code,
            Self::Protocol { code, .. } => *code,
            Self::System { code, .. } => *code,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Semantic { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Semantic { code, message, location } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(*loc);
                }
                if let Some(help) = code.info().help {
                    diag = diag.with_help(help);
                }
                diag
            }
            Self::Protocol { code, message, offset } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(offset) = offset {
                    diag = diag.with_help(format!("at byte offset {}", offset));
                }
                diag
            }
            Self::System { code, message } => {
                let diag = Diagnostic::error(*code, message.clone());
                match code.info().help {
                    Some(help) => diag.with_help(help),
                    None => diag,
                }
            }
        }
    }
}
