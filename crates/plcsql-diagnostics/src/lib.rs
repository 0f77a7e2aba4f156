//! PL/CSQL diagnostics and error handling
//!
//! Error codes, source locations and diagnostic reporting shared by the
//! compiler-side coercion resolver and the server-side handshake decoder.

mod error;
mod error_code;
mod location;

pub use error::*;
pub use error_code::*;
pub use location::*;

/// Result type for PL/CSQL operations
pub type Result<T> = std::result::Result<T, PlcsqlError>;
