//! Session environment derived from the system parameters

use crate::sys_param::{SysParamId, SysParamTable};
use chrono::FixedOffset;
use chrono_tz::Tz;
use encoding_rs::Encoding;
use once_cell::unsync::OnceCell;
use std::fmt;

/// Codeset name reported when the collation names no usable charset
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Codeset names used by the database core that `encoding_rs` does not
/// accept as labels
static HOST_CODESET_ALIASES: &[(&str, &Encoding)] = &[("euckr", encoding_rs::EUC_KR)];

/// Time zone a session runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerTimeZone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ServerTimeZone {
    pub const UTC: ServerTimeZone = ServerTimeZone::Named(Tz::UTC);

    /// Parse an IANA zone name or a fixed offset such as `+09:00`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(tz) = text.parse::<Tz>() {
            return Some(Self::Named(tz));
        }
        text.parse::<FixedOffset>().ok().map(Self::Fixed)
    }
}

impl Default for ServerTimeZone {
    fn default() -> Self {
        Self::UTC
    }
}

impl fmt::Display for ServerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Character set a session decodes strings with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCharset {
    codeset: String,
    encoding: &'static Encoding,
}

impl ServerCharset {
    pub fn utf8() -> Self {
        Self {
            codeset: DEFAULT_CHARSET.to_string(),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Resolve the codeset named by a collation such as `utf8_bin`
    pub fn from_collation(collation: &str) -> Option<Self> {
        let codeset = collation.split('_').next().unwrap_or_default();
        lookup_encoding(codeset).map(|encoding| Self {
            codeset: codeset.to_string(),
            encoding,
        })
    }

    /// Codeset name as the collation spelled it
    pub fn codeset(&self) -> &str {
        &self.codeset
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }
}

impl Default for ServerCharset {
    fn default() -> Self {
        Self::utf8()
    }
}

fn lookup_encoding(codeset: &str) -> Option<&'static Encoding> {
    if codeset.is_empty() {
        return None;
    }
    Encoding::for_label(codeset.as_bytes()).or_else(|| {
        HOST_CODESET_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(codeset))
            .map(|(_, encoding)| *encoding)
    })
}

/// Per-session view over the system parameters
///
/// Derived settings are computed on first use and kept for the lifetime of
/// the environment, even if the parameter table changes afterwards. Build a
/// new environment to pick up new parameters.
#[derive(Debug, Default)]
pub struct ServerEnvironment {
    params: SysParamTable,
    time_zone: OnceCell<ServerTimeZone>,
    charset: OnceCell<ServerCharset>,
}

impl ServerEnvironment {
    pub fn new(params: SysParamTable) -> Self {
        Self {
            params,
            time_zone: OnceCell::new(),
            charset: OnceCell::new(),
        }
    }

    pub fn parameters(&self) -> &SysParamTable {
        &self.params
    }

    /// Mutable access to the parameters; does not reset cached settings
    pub fn parameters_mut(&mut self) -> &mut SysParamTable {
        &mut self.params
    }

    /// Session time zone, UTC when unset or unparsable
    pub fn time_zone(&self) -> &ServerTimeZone {
        self.time_zone.get_or_init(|| {
            let tz = match self.params.value_str(SysParamId::Timezone) {
                Some(text) => ServerTimeZone::parse(text).unwrap_or_else(|| {
                    log::warn!("unrecognized time zone '{}', using UTC", text);
                    ServerTimeZone::UTC
                }),
                None => ServerTimeZone::UTC,
            };
            log::debug!("session time zone is {}", tz);
            tz
        })
    }

    pub fn charset(&self) -> &ServerCharset {
        self.charset.get_or_init(|| {
            let charset = match self.params.value_str(SysParamId::IntlCollation) {
                Some(collation) => ServerCharset::from_collation(collation).unwrap_or_else(|| {
                    log::warn!(
                        "collation '{}' names no known charset, using {}",
                        collation,
                        DEFAULT_CHARSET
                    );
                    ServerCharset::utf8()
                }),
                None => ServerCharset::utf8(),
            };
            log::debug!(
                "session charset is {} ({})",
                charset.codeset(),
                charset.encoding().name()
            );
            charset
        })
    }

    /// Codeset name of the session charset
    pub fn charset_string(&self) -> &str {
        self.charset().codeset()
    }

    /// Active charset handle used to decode database strings
    pub fn encoding(&self) -> &'static Encoding {
        self.charset().encoding()
    }
}
