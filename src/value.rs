//! Native-value to MySQL binary-protocol mapping: the parameter side of prepared
//! statements (§4.6) plus the temporal value types used by both directions.

use crate::error::Error;
use crate::io::BufMut;
use crate::protocol::TypeId;

/// A calendar date/time as carried by `DATE`, `DATETIME` and `TIMESTAMP` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub microsecond: u32,
}

impl DateTime {
    fn is_all_zero(&self) -> bool {
        *self == DateTime::default()
    }

    fn has_time(&self) -> bool {
        self.hour != 0 || self.minute != 0 || self.second != 0 || self.microsecond != 0
    }

    /// Length-prefixed compressed binary form (§4.6): `[0]`, `[4]date`, `[7]date+time`,
    /// or `[11]date+time+microsecond`.
    pub fn write_binary(&self, buf: &mut Vec<u8>) {
        if self.is_all_zero() {
            buf.put_u8(0);
            return;
        }

        if !self.has_time() {
            buf.put_u8(4);
            self.write_date(buf);
            return;
        }

        if self.microsecond == 0 {
            buf.put_u8(7);
            self.write_date(buf);
            self.write_time_of_day(buf);
            return;
        }

        buf.put_u8(11);
        self.write_date(buf);
        self.write_time_of_day(buf);
        buf.put_u32(self.microsecond);
    }

    fn write_date(&self, buf: &mut Vec<u8>) {
        buf.put_u16(self.year);
        buf.put_u8(self.month);
        buf.put_u8(self.day);
    }

    fn write_time_of_day(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.hour);
        buf.put_u8(self.minute);
        buf.put_u8(self.second);
    }

    /// Parses the same compressed binary form a column returns in a binary result row.
    pub fn read_binary(raw: &[u8]) -> crate::Result<Self> {
        let len = *raw.first().ok_or_else(|| Error::Decode("empty DATETIME value".into()))?;
        if len == 0 {
            return Ok(DateTime::default());
        }

        if raw.len() < 1 + len as usize {
            return Err(Error::Decode("truncated DATETIME value".into()));
        }

        let year = u16::from_le_bytes([raw[1], raw[2]]);
        let month = raw[3];
        let day = raw[4];

        let (hour, minute, second) = if len >= 7 {
            (raw[5], raw[6], raw[7])
        } else {
            (0, 0, 0)
        };

        let microsecond = if len == 11 {
            u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]])
        } else {
            0
        };

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            microsecond,
        })
    }
}

/// A signed time-of-day span as carried by `TIME` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Duration {
    pub is_negative: bool,
    pub days: u32,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub microseconds: u32,
}

impl Duration {
    fn is_all_zero(&self) -> bool {
        !self.is_negative
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.microseconds == 0
    }

    /// Length-prefixed compressed binary form (§4.6): `[0]`, `[8]...`, or `[12]...`.
    pub fn write_binary(&self, buf: &mut Vec<u8>) {
        if self.is_all_zero() {
            buf.put_u8(0);
            return;
        }

        let len = if self.microseconds == 0 { 8 } else { 12 };
        buf.put_u8(len);
        buf.put_u8(self.is_negative as u8);
        buf.put_u32(self.days);
        buf.put_u8(self.hours);
        buf.put_u8(self.minutes);
        buf.put_u8(self.seconds);

        if len == 12 {
            buf.put_u32(self.microseconds);
        }
    }

    pub fn read_binary(raw: &[u8]) -> crate::Result<Self> {
        let len = *raw.first().ok_or_else(|| Error::Decode("empty TIME value".into()))?;
        if len == 0 {
            return Ok(Duration::default());
        }

        if raw.len() < 1 + len as usize {
            return Err(Error::Decode("truncated TIME value".into()));
        }

        let is_negative = raw[1] != 0;
        let days = u32::from_le_bytes([raw[2], raw[3], raw[4], raw[5]]);
        let hours = raw[6];
        let minutes = raw[7];
        let seconds = raw[8];

        let microseconds = if len == 12 {
            u32::from_le_bytes([raw[9], raw[10], raw[11], raw[12]])
        } else {
            0
        };

        Ok(Self {
            is_negative,
            days,
            hours,
            minutes,
            seconds,
            microseconds,
        })
    }
}

/// Resolves a native Rust value to the MySQL field type and binary encoding used for a
/// prepared-statement parameter (§4.6, §9 design notes). Implemented for primitives,
/// strings, byte slices, the temporal types above, and `Option<T>`.
pub trait ToMysqlValue {
    fn type_id(&self) -> TypeId;

    fn is_unsigned(&self) -> bool {
        false
    }

    fn is_null(&self) -> bool {
        false
    }

    fn write_binary(&self, buf: &mut Vec<u8>);
}

macro_rules! impl_to_mysql_value_int {
    ($ty:ty, $type_id:expr, $unsigned:expr, $write:ident) => {
        impl ToMysqlValue for $ty {
            fn type_id(&self) -> TypeId {
                $type_id
            }

            fn is_unsigned(&self) -> bool {
                $unsigned
            }

            fn write_binary(&self, buf: &mut Vec<u8>) {
                buf.$write(*self as _);
            }
        }
    };
}

impl_to_mysql_value_int!(i8, TypeId::TINY, false, put_u8);
impl_to_mysql_value_int!(u8, TypeId::TINY, true, put_u8);
impl_to_mysql_value_int!(i16, TypeId::SHORT, false, put_u16);
impl_to_mysql_value_int!(u16, TypeId::SHORT, true, put_u16);
impl_to_mysql_value_int!(i32, TypeId::LONG, false, put_u32);
impl_to_mysql_value_int!(u32, TypeId::LONG, true, put_u32);
impl_to_mysql_value_int!(i64, TypeId::LONGLONG, false, put_u64);
impl_to_mysql_value_int!(u64, TypeId::LONGLONG, true, put_u64);

impl ToMysqlValue for f32 {
    fn type_id(&self) -> TypeId {
        TypeId::FLOAT
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_u32(self.to_bits());
    }
}

impl ToMysqlValue for f64 {
    fn type_id(&self) -> TypeId {
        TypeId::DOUBLE
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_u64(self.to_bits());
    }
}

impl ToMysqlValue for str {
    fn type_id(&self) -> TypeId {
        TypeId::STRING
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc(self.as_bytes());
    }
}

impl ToMysqlValue for String {
    fn type_id(&self) -> TypeId {
        TypeId::STRING
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc(self.as_bytes());
    }
}

impl ToMysqlValue for [u8] {
    fn type_id(&self) -> TypeId {
        TypeId::STRING
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc(self);
    }
}

impl ToMysqlValue for Vec<u8> {
    fn type_id(&self) -> TypeId {
        TypeId::STRING
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        buf.put_bytes_lenenc(self);
    }
}

impl ToMysqlValue for DateTime {
    fn type_id(&self) -> TypeId {
        TypeId::DATETIME
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        DateTime::write_binary(self, buf)
    }
}

impl ToMysqlValue for Duration {
    fn type_id(&self) -> TypeId {
        TypeId::TIME
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        Duration::write_binary(self, buf)
    }
}

impl<T: ToMysqlValue> ToMysqlValue for Option<T> {
    fn type_id(&self) -> TypeId {
        match self {
            Some(value) => value.type_id(),
            None => TypeId::NULL,
        }
    }

    fn is_unsigned(&self) -> bool {
        match self {
            Some(value) => value.is_unsigned(),
            None => false,
        }
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn write_binary(&self, buf: &mut Vec<u8>) {
        if let Some(value) = self {
            value.write_binary(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_matches_the_spec_execute_example() {
        // SELECT ? executed with [null, 42u32, "hi"]; see com_stmt_execute's own test
        // for the accompanying null bitmap.
        let mut bitmap_input = Vec::new();

        let mut type_block = Vec::new();
        type_block.push(TypeId::NULL.0);
        type_block.push(0u8);
        type_block.push(TypeId::LONG.0);
        type_block.push(0u8);
        type_block.push(TypeId::STRING.0);
        type_block.push(0u8);
        assert_eq!(type_block, vec![6, 0, 3, 0, 254, 0]);

        42u32.write_binary(&mut bitmap_input);
        "hi".write_binary(&mut bitmap_input);
        assert_eq!(bitmap_input, vec![0x2a, 0x00, 0x00, 0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn all_zero_datetime_encodes_as_a_single_length_byte() {
        let mut buf = Vec::new();
        DateTime::default().write_binary(&mut buf);
        assert_eq!(buf, vec![0]);
    }

    #[test]
    fn datetime_with_microseconds_round_trips() {
        let dt = DateTime {
            year: 2010,
            month: 10,
            day: 17,
            hour: 19,
            minute: 27,
            second: 30,
            microsecond: 1,
        };

        let mut buf = Vec::new();
        dt.write_binary(&mut buf);
        assert_eq!(buf, vec![11, 218, 7, 10, 17, 19, 27, 30, 1, 0, 0, 0]);

        assert_eq!(DateTime::read_binary(&buf).unwrap(), dt);
    }

    #[test]
    fn datetime_date_only_omits_time_bytes() {
        let dt = DateTime {
            year: 2010,
            month: 10,
            day: 17,
            ..Default::default()
        };

        let mut buf = Vec::new();
        dt.write_binary(&mut buf);
        assert_eq!(buf, vec![4, 218, 7, 10, 17]);
    }
}
