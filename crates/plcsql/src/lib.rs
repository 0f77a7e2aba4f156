//! PL/CSQL type bridge
//!
//! Pieces of the PL/CSQL stored procedure server that sit between the
//! database core and generated procedure code:
//! - Type coercion rules used when compiling procedures
//! - Decoding of the system parameter handshake
//! - The session environment (time zone, charset) derived from it
//!
//! # Example
//!
//! ```
//! use plcsql::types::{SimpleType, TypeCoercer};
//!
//! let coercion = TypeCoercer::new()
//!     .resolve_simple(SimpleType::Int, SimpleType::String)
//!     .unwrap();
//! assert_eq!(coercion.generate("x"), "convIntToString(x)");
//! ```

pub use plcsql_diagnostics as diagnostics;
pub use plcsql_protocol as protocol;
pub use plcsql_server as server;
pub use plcsql_types as types;

// Convenience re-exports
pub use plcsql_diagnostics::{PlcsqlError, Result};
pub use plcsql_server::{ServerConfig, ServerEnvironment, SysParamTable};
pub use plcsql_types::{Coercion, SimpleType, TypeCoercer, TypeSpec};

#[cfg(feature = "cli")]
pub mod cli;
