//! PL/CSQL server session state
//!
//! Decodes the system parameters the database core sends when a session
//! starts and derives the settings generated code depends on, such as the
//! session time zone and character set.

pub mod config;
pub mod environment;
pub mod sys_param;

pub use config::{SocketType, ServerConfig, TMP_DIR_ENV};
pub use environment::{DEFAULT_CHARSET, ServerCharset, ServerEnvironment, ServerTimeZone};
pub use sys_param::{RejectedParam, SysParam, SysParamId, SysParamTable};
