//! Typed values carried on the wire

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type tags, numbered as the database core numbers its types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueTag {
    Null,
    Int,
    Float,
    Double,
    String,
    Time,
    Timestamp,
    Date,
    Short,
    Numeric,
    Char,
    Bigint,
    Datetime,
}

impl ValueTag {
    pub const fn code(&self) -> i32 {
        match self {
            Self::Null => 0,
            Self::Int => 1,
            Self::Float => 2,
            Self::Double => 3,
            Self::String => 4,
            Self::Time => 10,
            Self::Timestamp => 11,
            Self::Date => 12,
            Self::Short => 18,
            Self::Numeric => 22,
            Self::Char => 25,
            Self::Bigint => 31,
            Self::Datetime => 32,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        let tag = match code {
            0 => Self::Null,
            1 => Self::Int,
            2 => Self::Float,
            3 => Self::Double,
            4 => Self::String,
            10 => Self::Time,
            11 => Self::Timestamp,
            12 => Self::Date,
            18 => Self::Short,
            22 => Self::Numeric,
            25 => Self::Char,
            31 => Self::Bigint,
            32 => Self::Datetime,
            _ => return None,
        };
        Some(tag)
    }

    /// Payload size for fixed-width tags; `None` for text payloads
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::Null => Some(0),
            Self::Short => Some(2),
            Self::Int | Self::Float => Some(4),
            Self::Bigint | Self::Double => Some(8),
            Self::Date | Self::Time => Some(12),
            Self::Timestamp => Some(24),
            Self::Datetime => Some(28),
            Self::String | Self::Char | Self::Numeric => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Int => "INTEGER",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::Date => "DATE",
            Self::Short => "SHORT",
            Self::Numeric => "NUMERIC",
            Self::Char => "CHAR",
            Self::Bigint => "BIGINT",
            Self::Datetime => "DATETIME",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value decoded from the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WireValue {
    Null,
    Short(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Numeric(Decimal),
    String(String),
    Char(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Datetime(NaiveDateTime),
}

impl WireValue {
    /// Tag this value was decoded from
    pub fn tag(&self) -> ValueTag {
        match self {
            Self::Null => ValueTag::Null,
            Self::Short(_) => ValueTag::Short,
            Self::Int(_) => ValueTag::Int,
            Self::Bigint(_) => ValueTag::Bigint,
            Self::Float(_) => ValueTag::Float,
            Self::Double(_) => ValueTag::Double,
            Self::Numeric(_) => ValueTag::Numeric,
            Self::String(_) => ValueTag::String,
            Self::Char(_) => ValueTag::Char,
            Self::Date(_) => ValueTag::Date,
            Self::Time(_) => ValueTag::Time,
            Self::Timestamp(_) => ValueTag::Timestamp,
            Self::Datetime(_) => ValueTag::Datetime,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content of string-like values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Char(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, widened to `i64`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Bigint(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Bigint(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Numeric(v) => write!(f, "{}", v),
            Self::String(s) | Self::Char(s) => write!(f, "{}", s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Self::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            Self::Datetime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}
