//! PL/CSQL type system
//!
//! This crate defines the types the PL/CSQL compiler reasons about and the
//! rules for moving values between them:
//! - Simple types and `%TYPE` references
//! - The coercion matrix and coercion resolution
//! - The support library cross-check for conversion routines

pub mod coercion;
pub mod support;
pub mod type_spec;

pub use coercion::*;
pub use support::*;
pub use type_spec::*;
