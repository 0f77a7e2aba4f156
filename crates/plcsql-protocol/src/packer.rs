//! Writer producing messages in the same framing the `Unpacker` reads

use crate::{ValueTag, WireValue};
use byteorder::{BigEndian, ByteOrder};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Objects that can be written into a message
pub trait Packable {
    fn pack(&self, packer: &mut Packer);
}

/// Growable message buffer
#[derive(Debug, Clone, Default)]
pub struct Packer {
    buf: Vec<u8>,
}

impl Packer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pack_int(&mut self, value: i32) -> &mut Self {
        let mut word = [0u8; 4];
        BigEndian::write_i32(&mut word, value);
        self.buf.extend_from_slice(&word);
        self
    }

    /// Write a value with its own tag
    pub fn pack_value(&mut self, value: &WireValue) -> &mut Self {
        let payload = encode_payload(value);
        self.pack_raw_value(value.tag().code(), &payload)
    }

    /// Write `[code][length][payload]` verbatim, without checking that the
    /// payload matches the tag
    pub fn pack_raw_value(&mut self, code: i32, payload: &[u8]) -> &mut Self {
        // payloads are bounded by the i32 length word
        let length = i32::try_from(payload.len()).unwrap_or(i32::MAX);
        self.pack_int(code);
        self.pack_int(length);
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn pack<T: Packable + ?Sized>(&mut self, object: &T) -> &mut Self {
        object.pack(self);
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn encode_payload(value: &WireValue) -> Vec<u8> {
    let mut out = vec![0u8; value.tag().fixed_width().unwrap_or(0)];
    match value {
        WireValue::Null => {}
        WireValue::Short(v) => BigEndian::write_i16(&mut out, *v),
        WireValue::Int(v) => BigEndian::write_i32(&mut out, *v),
        WireValue::Bigint(v) => BigEndian::write_i64(&mut out, *v),
        WireValue::Float(v) => BigEndian::write_f32(&mut out, *v),
        WireValue::Double(v) => BigEndian::write_f64(&mut out, *v),
        WireValue::Numeric(d) => out = d.to_string().into_bytes(),
        WireValue::String(s) | WireValue::Char(s) => out = s.as_bytes().to_vec(),
        WireValue::Date(d) => {
            write_fields(&mut out, &[d.year(), d.month() as i32, d.day() as i32]);
        }
        WireValue::Time(t) => {
            write_fields(&mut out, &[t.hour() as i32, t.minute() as i32, t.second() as i32]);
        }
        WireValue::Timestamp(ts) => write_fields(&mut out, &datetime_fields(ts)[..6]),
        WireValue::Datetime(dt) => write_fields(&mut out, &datetime_fields(dt)),
    }
    debug_assert!(matches!(
        value.tag(),
        ValueTag::Numeric | ValueTag::String | ValueTag::Char
    ) || Some(out.len()) == value.tag().fixed_width());
    out
}

fn datetime_fields(dt: &NaiveDateTime) -> [i32; 7] {
    [
        dt.year(),
        dt.month() as i32,
        dt.day() as i32,
        dt.hour() as i32,
        dt.minute() as i32,
        dt.second() as i32,
        (dt.nanosecond() / 1_000_000) as i32,
    ]
}

fn write_fields(out: &mut [u8], fields: &[i32]) {
    BigEndian::write_i32_into(fields, out);
}
