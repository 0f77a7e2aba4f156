//! Launch configuration of a procedure server process

use crate::environment::{ServerEnvironment, ServerTimeZone};
use crate::sys_param::SysParamTable;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable the launching core sets to the temporary directory
pub const TMP_DIR_ENV: &str = "CUBRID_TMP";

const LOG_DIR: &str = "log";
const TMP_DIR: &str = "tmp";

/// How the database core reaches the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SocketType {
    Tcp,
    Uds,
}

impl SocketType {
    /// A socket info of digits only is a TCP port, anything else a socket path
    pub fn from_socket_info(info: &str) -> Self {
        if !info.is_empty() && info.bytes().all(|b| b.is_ascii_digit()) {
            Self::Tcp
        } else {
            Self::Uds
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Uds => write!(f, "uds"),
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    name: String,
    version: String,
    root_path: PathBuf,
    db_path: PathBuf,
    log_path: PathBuf,
    tmp_path: PathBuf,
    socket_info: String,
    socket_type: SocketType,
    environment: ServerEnvironment,
}

impl ServerConfig {
    /// Build the configuration, taking the temporary directory from
    /// [`TMP_DIR_ENV`] when it is set
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        root_path: impl Into<PathBuf>,
        db_path: impl Into<PathBuf>,
        socket_info: impl Into<String>,
    ) -> Self {
        Self::with_tmp_override(
            name.into(),
            version.into(),
            root_path.into(),
            db_path.into(),
            socket_info.into(),
            std::env::var_os(TMP_DIR_ENV),
        )
    }

    fn with_tmp_override(
        name: String,
        version: String,
        root_path: PathBuf,
        db_path: PathBuf,
        socket_info: String,
        tmp_override: Option<OsString>,
    ) -> Self {
        let log_path = root_path.join(LOG_DIR).join(format!("{}_pl.log", name));
        let tmp_path = match tmp_override {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => root_path.join(TMP_DIR),
        };
        let socket_type = SocketType::from_socket_info(&socket_info);

        Self {
            name,
            version,
            root_path,
            db_path,
            log_path,
            tmp_path,
            socket_info,
            socket_type,
            environment: ServerEnvironment::default(),
        }
    }

    /// Replace the temporary directory
    pub fn with_tmp_path(mut self, tmp_path: impl Into<PathBuf>) -> Self {
        self.tmp_path = tmp_path.into();
        self
    }

    /// Decode a handshake and start a fresh environment from it
    pub fn load_system_parameters(&mut self, buf: &[u8]) -> &ServerEnvironment {
        let params = SysParamTable::unpack(buf);
        log::debug!(
            "server '{}' loaded {} system parameter(s)",
            self.name,
            params.len()
        );
        self.environment = ServerEnvironment::new(params);
        &self.environment
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    pub fn socket_info(&self) -> &str {
        &self.socket_info
    }

    pub fn socket_type(&self) -> SocketType {
        self.socket_type
    }

    pub fn environment(&self) -> &ServerEnvironment {
        &self.environment
    }

    pub fn system_parameters(&self) -> &SysParamTable {
        self.environment.parameters()
    }

    pub fn time_zone(&self) -> &ServerTimeZone {
        self.environment.time_zone()
    }

    pub fn charset_string(&self) -> &str {
        self.environment.charset_string()
    }
}
