//! CLI functionality for the plcsql tool
//!
//! Each subcommand lives in its own module with a config struct built by the
//! binary and a function that runs it. Rendering is kept separate from
//! printing so that the output can be checked in tests.

pub mod check_support;
pub mod coerce;
pub mod handshake;
pub mod matrix;
pub mod output;
