//! Single-pass reader over a fully received message

use crate::{DecodeError, DecodeResult, ValueTag, WireValue};
use byteorder::{BigEndian, ByteOrder};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

const INT_SIZE: usize = 4;

/// Objects that can be read back from a message
pub trait Unpackable: Sized {
    fn unpack(unpacker: &mut Unpacker<'_>) -> DecodeResult<Self>;
}

/// Cursor over a message buffer
///
/// Every byte is consumed exactly once; there is no way to move backwards.
#[derive(Debug)]
pub struct Unpacker<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> DecodeResult<&'a [u8]> {
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    pub fn unpack_int(&mut self) -> DecodeResult<i32> {
        self.take(INT_SIZE).map(BigEndian::read_i32)
    }

    /// Read one `[tag][length][payload]` value
    ///
    /// The payload is consumed before it is interpreted, so an unknown tag
    /// or a malformed payload still leaves the reader at the next value.
    pub fn unpack_value(&mut self) -> DecodeResult<WireValue> {
        let offset = self.pos;
        let code = self.unpack_int()?;
        let length = self.unpack_int()?;
        let length = usize::try_from(length)
            .map_err(|_| DecodeError::InvalidLength { offset, length })?;
        let payload = self.take(length)?;

        let tag = ValueTag::from_code(code).ok_or(DecodeError::UnknownTag { offset, tag: code })?;
        decode_payload(tag, payload, offset)
    }

    /// Read one value whose sender declared its type as `declared`
    pub fn unpack_value_as(&mut self, declared: i32) -> DecodeResult<WireValue> {
        let offset = self.pos;
        let value = self.unpack_value()?;
        let found = value.tag().code();
        if found != declared {
            return Err(DecodeError::TypeMismatch {
                offset,
                expected: declared,
                found,
            });
        }
        Ok(value)
    }

    pub fn unpack<T: Unpackable>(&mut self) -> DecodeResult<T> {
        T::unpack(self)
    }
}

fn decode_payload(tag: ValueTag, payload: &[u8], offset: usize) -> DecodeResult<WireValue> {
    let invalid = |reason: String| DecodeError::InvalidPayload {
        offset,
        tag,
        reason,
    };

    if let Some(width) = tag.fixed_width() {
        if payload.len() != width {
            return Err(invalid(format!(
                "expected {} byte(s), got {}",
                width,
                payload.len()
            )));
        }
    }

    let value = match tag {
        ValueTag::Null => WireValue::Null,
        ValueTag::Short => WireValue::Short(BigEndian::read_i16(payload)),
        ValueTag::Int => WireValue::Int(BigEndian::read_i32(payload)),
        ValueTag::Bigint => WireValue::Bigint(BigEndian::read_i64(payload)),
        ValueTag::Float => WireValue::Float(BigEndian::read_f32(payload)),
        ValueTag::Double => WireValue::Double(BigEndian::read_f64(payload)),
        ValueTag::Numeric => {
            let text = std::str::from_utf8(payload).map_err(|e| invalid(e.to_string()))?;
            let decimal = Decimal::from_str(text.trim()).map_err(|e| invalid(e.to_string()))?;
            WireValue::Numeric(decimal)
        }
        ValueTag::String => WireValue::String(decode_text(payload).map_err(invalid)?),
        ValueTag::Char => WireValue::Char(decode_text(payload).map_err(invalid)?),
        ValueTag::Date => {
            let [year, month, day] = read_fields::<3>(payload);
            WireValue::Date(date(year, month, day).ok_or_else(|| {
                invalid(format!("no such date {:04}-{:02}-{:02}", year, month, day))
            })?)
        }
        ValueTag::Time => {
            let [hour, minute, second] = read_fields::<3>(payload);
            WireValue::Time(time(hour, minute, second, 0).ok_or_else(|| {
                invalid(format!("no such time {:02}:{:02}:{:02}", hour, minute, second))
            })?)
        }
        ValueTag::Timestamp => {
            let [year, month, day, hour, minute, second] = read_fields::<6>(payload);
            let ts = date(year, month, day)
                .zip(time(hour, minute, second, 0))
                .map(|(d, t)| NaiveDateTime::new(d, t))
                .ok_or_else(|| invalid("timestamp out of range".to_string()))?;
            WireValue::Timestamp(ts)
        }
        ValueTag::Datetime => {
            let [year, month, day, hour, minute, second, millis] = read_fields::<7>(payload);
            let dt = date(year, month, day)
                .zip(time(hour, minute, second, millis))
                .map(|(d, t)| NaiveDateTime::new(d, t))
                .ok_or_else(|| invalid("datetime out of range".to_string()))?;
            WireValue::Datetime(dt)
        }
    };
    Ok(value)
}

fn decode_text(payload: &[u8]) -> Result<String, String> {
    String::from_utf8(payload.to_vec()).map_err(|e| e.to_string())
}

fn read_fields<const N: usize>(payload: &[u8]) -> [i32; N] {
    let mut fields = [0i32; N];
    BigEndian::read_i32_into(payload, &mut fields);
    fields
}

fn date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

fn time(hour: i32, minute: i32, second: i32, millis: i32) -> Option<NaiveTime> {
    // chrono reads 1000..2000 as a leap second, which the core never sends
    if !(0..1000).contains(&millis) {
        return None;
    }
    NaiveTime::from_hms_milli_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
        u32::try_from(millis).ok()?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_unpack_int() {
        let buf = words(&[7, -1]);
        let mut unpacker = Unpacker::new(&buf);
        assert_eq!(unpacker.unpack_int(), Ok(7));
        assert_eq!(unpacker.unpack_int(), Ok(-1));
        assert!(unpacker.is_exhausted());
        assert!(matches!(unpacker.unpack_int(), Err(DecodeError::Truncated { offset: 8, .. })));
    }

    #[test]
    fn test_unpack_date() {
        let buf = words(&[12, 12, 2024, 2, 29]);
        let mut unpacker = Unpacker::new(&buf);
        assert_eq!(
            unpacker.unpack_value(),
            Ok(WireValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(unpacker.is_exhausted());
    }

    #[test]
    fn test_invalid_date_is_skipped_cleanly() {
        let mut buf = words(&[12, 12, 2023, 2, 29]);
        buf.extend(words(&[1, 4, 5]));
        let mut unpacker = Unpacker::new(&buf);

        let err = unpacker.unpack_value().unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { tag: ValueTag::Date, .. }));
        assert!(err.is_recoverable());
        assert_eq!(unpacker.unpack_value(), Ok(WireValue::Int(5)));
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let buf = words(&[1, 8, 0, 5]);
        let mut unpacker = Unpacker::new(&buf);
        assert!(matches!(
            unpacker.unpack_value(),
            Err(DecodeError::InvalidPayload { tag: ValueTag::Int, .. })
        ));
        assert!(unpacker.is_exhausted());
    }

    #[test]
    fn test_negative_length_is_fatal() {
        let buf = words(&[4, -3]);
        let err = Unpacker::new(&buf).unpack_value().unwrap_err();
        assert_eq!(err, DecodeError::InvalidLength { offset: 0, length: -3 });
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_declared_type_mismatch() {
        let buf = words(&[1, 4, 42]);
        let mut unpacker = Unpacker::new(&buf);
        let err = unpacker.unpack_value_as(ValueTag::String.code()).unwrap_err();
        assert_eq!(err, DecodeError::TypeMismatch { offset: 0, expected: 4, found: 1 });
        assert!(unpacker.is_exhausted());
    }
}
