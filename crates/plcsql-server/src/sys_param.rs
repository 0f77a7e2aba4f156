//! System parameters received from the database core at session start
//!
//! The handshake is a run of entries, each
//! `[type tag][parameter id][value tag][payload length][payload]`, read until
//! the buffer is exhausted. Entries whose value cannot be decoded are dropped
//! one at a time; only a framing error ends decoding early.

use indexmap::IndexMap;
use plcsql_protocol::{DecodeError, DecodeResult, Packable, Packer, Unpackable, Unpacker, WireValue};
use serde::Serialize;
use std::fmt;

/// Parameter ids consumed by the PL/CSQL server
///
/// The numbering is the database core's and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SysParamId {
    OracleStyleEmptyString,
    CompatNumericDivisionScale,
    IntlNumberLang,
    IntlDateLang,
    IntlCollation,
    Timezone,
    OracleCompatNumberBehavior,
}

impl SysParamId {
    pub const ALL: [SysParamId; 7] = [
        Self::OracleStyleEmptyString,
        Self::CompatNumericDivisionScale,
        Self::IntlNumberLang,
        Self::IntlDateLang,
        Self::IntlCollation,
        Self::Timezone,
        Self::OracleCompatNumberBehavior,
    ];

    pub const fn id(&self) -> i32 {
        match self {
            Self::OracleStyleEmptyString => 95,
            Self::CompatNumericDivisionScale => 100,
            Self::IntlNumberLang => 193,
            Self::IntlDateLang => 194,
            Self::IntlCollation => 206,
            Self::Timezone => 249,
            Self::OracleCompatNumberBehavior => 334,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// Parameter name as spelled in the server configuration file
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OracleStyleEmptyString => "oracle_style_empty_string",
            Self::CompatNumericDivisionScale => "compat_numeric_division_scale",
            Self::IntlNumberLang => "intl_number_lang",
            Self::IntlDateLang => "intl_date_lang",
            Self::IntlCollation => "intl_collation",
            Self::Timezone => "timezone",
            Self::OracleCompatNumberBehavior => "oracle_compat_number_behavior",
        }
    }
}

impl fmt::Display for SysParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded system parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SysParam {
    id: i32,
    type_tag: i32,
    value: WireValue,
}

impl SysParam {
    /// Create a parameter whose declared type is the value's own tag
    pub fn new(id: i32, value: WireValue) -> Self {
        Self {
            id,
            type_tag: value.tag().code(),
            value,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Type the sender declared for the value
    pub fn type_tag(&self) -> i32 {
        self.type_tag
    }

    pub fn value(&self) -> &WireValue {
        &self.value
    }

    pub fn known_id(&self) -> Option<SysParamId> {
        SysParamId::from_id(self.id)
    }
}

impl fmt::Display for SysParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known_id() {
            Some(known) => write!(f, "{} ({}) = {}", known, self.id, self.value),
            None => write!(f, "#{} = {}", self.id, self.value),
        }
    }
}

impl Packable for SysParam {
    fn pack(&self, packer: &mut Packer) {
        packer.pack_int(self.type_tag);
        packer.pack_int(self.id);
        packer.pack_value(&self.value);
    }
}

impl Unpackable for SysParam {
    fn unpack(unpacker: &mut Unpacker<'_>) -> DecodeResult<Self> {
        unpack_entry(unpacker).map_err(|rejected| rejected.1)
    }
}

fn unpack_entry(unpacker: &mut Unpacker<'_>) -> Result<SysParam, (Option<i32>, DecodeError)> {
    let type_tag = unpacker.unpack_int().map_err(|e| (None, e))?;
    let id = unpacker.unpack_int().map_err(|e| (None, e))?;
    let value = unpacker.unpack_value_as(type_tag).map_err(|e| (Some(id), e))?;
    Ok(SysParam { id, type_tag, value })
}

/// A handshake entry that did not make it into the table
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedParam {
    /// Position of the entry in the handshake, 0-based
    pub index: usize,
    /// Parameter id, when the entry got far enough to carry one
    pub param_id: Option<i32>,
    pub error: DecodeError,
}

impl fmt::Display for RejectedParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param_id {
            Some(id) => write!(f, "entry {} (parameter {}): {}", self.index, id, self.error),
            None => write!(f, "entry {}: {}", self.index, self.error),
        }
    }
}

/// System parameters of one session, keyed by parameter id
#[derive(Debug, Clone, Default)]
pub struct SysParamTable {
    params: IndexMap<i32, SysParam>,
    rejected: Vec<RejectedParam>,
}

impl SysParamTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a complete handshake message
    ///
    /// Never fails: undecodable entries are logged and recorded in
    /// [`rejected`](Self::rejected) instead.
    pub fn unpack(buf: &[u8]) -> Self {
        let mut table = Self::new();
        let mut unpacker = Unpacker::new(buf);
        let mut index = 0;

        while !unpacker.is_exhausted() {
            match unpack_entry(&mut unpacker) {
                Ok(param) => {
                    log::debug!("system parameter {}", param);
                    table.insert(param);
                }
                Err((param_id, error)) => {
                    let fatal = !error.is_recoverable();
                    let rejected = RejectedParam {
                        index,
                        param_id,
                        error,
                    };
                    if fatal {
                        log::warn!("handshake decoding stopped at {}", rejected);
                    } else {
                        log::warn!("skipping system parameter {}", rejected);
                    }
                    table.rejected.push(rejected);
                    if fatal {
                        break;
                    }
                }
            }
            index += 1;
        }

        log::debug!(
            "decoded {} system parameter(s), rejected {}",
            table.len(),
            table.rejected.len()
        );
        table
    }

    /// Insert a parameter, replacing any earlier value with the same id
    pub fn insert(&mut self, param: SysParam) -> Option<SysParam> {
        let previous = self.params.insert(param.id, param);
        if let Some(prev) = &previous {
            log::debug!("system parameter {} overrides an earlier value", prev.id);
        }
        previous
    }

    pub fn remove(&mut self, id: i32) -> Option<SysParam> {
        self.params.shift_remove(&id)
    }

    pub fn get(&self, id: i32) -> Option<&SysParam> {
        self.params.get(&id)
    }

    pub fn value(&self, param: SysParamId) -> Option<&WireValue> {
        self.get(param.id()).map(SysParam::value)
    }

    /// String value of a parameter, if present and string-typed
    pub fn value_str(&self, param: SysParamId) -> Option<&str> {
        self.value(param).and_then(WireValue::as_str)
    }

    /// Integer flag, true when present and non-zero
    pub fn flag(&self, param: SysParamId) -> bool {
        self.value(param)
            .and_then(WireValue::as_integer)
            .is_some_and(|v| v != 0)
    }

    pub fn oracle_style_empty_string(&self) -> bool {
        self.flag(SysParamId::OracleStyleEmptyString)
    }

    pub fn compat_numeric_division_scale(&self) -> bool {
        self.flag(SysParamId::CompatNumericDivisionScale)
    }

    pub fn oracle_compat_number_behavior(&self) -> bool {
        self.flag(SysParamId::OracleCompatNumberBehavior)
    }

    pub fn number_lang(&self) -> Option<&str> {
        self.value_str(SysParamId::IntlNumberLang)
    }

    pub fn date_lang(&self) -> Option<&str> {
        self.value_str(SysParamId::IntlDateLang)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SysParam> {
        self.params.values()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Entries dropped while decoding the handshake
    pub fn rejected(&self) -> &[RejectedParam] {
        &self.rejected
    }
}

impl Packable for SysParamTable {
    fn pack(&self, packer: &mut Packer) {
        for param in self.iter() {
            packer.pack(param);
        }
    }
}
