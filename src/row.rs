//! Positional row access (§4.8): typed getters over the raw column bytes a query or
//! execute call returned, dispatching on the column's declared type and the row's
//! text/binary mode. Mapping onto a user struct is left to the caller.

use std::sync::Arc;

use crate::error::Error;
use crate::protocol::{self, ColumnDefinition, TypeId};
use crate::value::{DateTime, Duration};

/// One row of a result set. Borrows nothing from the connection; owns its column
/// definitions (shared with sibling rows of the same result set) and its decoded byte
/// buffer.
pub struct Row {
    inner: protocol::Row,
    columns: Arc<[ColumnDefinition]>,
}

impl Row {
    pub(crate) fn new(inner: protocol::Row, columns: Arc<[ColumnDefinition]>) -> Self {
        Self { inner, columns }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.inner.is_null(index)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    fn raw(&self, index: usize) -> Option<&[u8]> {
        self.inner.get(index)
    }

    fn type_id(&self, index: usize) -> TypeId {
        self.columns[index].type_id
    }

    fn str_at(&self, index: usize, bytes: &[u8]) -> crate::Result<&str> {
        std::str::from_utf8(bytes).map_err(|_| {
            Error::Decode(format!("column {} is not valid UTF-8", index))
        })
    }

    pub fn get_str(&self, index: usize) -> crate::Result<Option<&str>> {
        match self.raw(index) {
            None => Ok(None),
            Some(bytes) => self.str_at(index, bytes).map(Some),
        }
    }

    pub fn get_bytes(&self, index: usize) -> Option<&[u8]> {
        self.raw(index)
    }

    pub fn get_i64(&self, index: usize) -> crate::Result<Option<i64>> {
        let Some(bytes) = self.raw(index) else {
            return Ok(None);
        };

        if self.inner.is_binary() {
            decode_binary_int(bytes, self.type_id(index)).map(|v| Some(v as i64))
        } else {
            self.str_at(index, bytes)?
                .parse()
                .map(Some)
                .map_err(|_| Error::Decode(format!("column {} is not an integer", index)))
        }
    }

    pub fn get_u64(&self, index: usize) -> crate::Result<Option<u64>> {
        let Some(bytes) = self.raw(index) else {
            return Ok(None);
        };

        if self.inner.is_binary() {
            decode_binary_int(bytes, self.type_id(index))
        } else {
            self.str_at(index, bytes)?
                .parse()
                .map_err(|_| Error::Decode(format!("column {} is not an integer", index)))
        }
        .map(Some)
    }

    pub fn get_f64(&self, index: usize) -> crate::Result<Option<f64>> {
        let Some(bytes) = self.raw(index) else {
            return Ok(None);
        };

        if self.inner.is_binary() {
            let value = match self.type_id(index) {
                TypeId::FLOAT => {
                    let mut b = [0u8; 4];
                    b.copy_from_slice(bytes);
                    f32::from_le_bytes(b) as f64
                }
                TypeId::DOUBLE => {
                    let mut b = [0u8; 8];
                    b.copy_from_slice(bytes);
                    f64::from_le_bytes(b)
                }
                other => decode_binary_int(bytes, other)? as f64,
            };
            Ok(Some(value))
        } else {
            self.str_at(index, bytes)?
                .parse()
                .map(Some)
                .map_err(|_| Error::Decode(format!("column {} is not a float", index)))
        }
    }

    pub fn get_datetime(&self, index: usize) -> crate::Result<Option<DateTime>> {
        let Some(bytes) = self.raw(index) else {
            return Ok(None);
        };

        if self.inner.is_binary() {
            DateTime::read_binary(bytes).map(Some)
        } else {
            parse_text_datetime(self.str_at(index, bytes)?).map(Some)
        }
    }

    pub fn get_duration(&self, index: usize) -> crate::Result<Option<Duration>> {
        let Some(bytes) = self.raw(index) else {
            return Ok(None);
        };

        if self.inner.is_binary() {
            Duration::read_binary(bytes).map(Some)
        } else {
            parse_text_duration(self.str_at(index, bytes)?).map(Some)
        }
    }
}

fn decode_binary_int(bytes: &[u8], type_id: TypeId) -> crate::Result<u64> {
    let value = match type_id {
        TypeId::TINY => u64::from(*bytes.first().ok_or_else(truncated)?),
        TypeId::SHORT | TypeId::YEAR => {
            u64::from(u16::from_le_bytes(bytes[..2].try_into().map_err(|_| truncated())?))
        }
        TypeId::LONG | TypeId::INT24 => {
            u64::from(u32::from_le_bytes(bytes[..4].try_into().map_err(|_| truncated())?))
        }
        TypeId::LONGLONG => u64::from_le_bytes(bytes[..8].try_into().map_err(|_| truncated())?),
        other => {
            return Err(Error::Decode(format!(
                "column type id {} is not a fixed-width integer",
                other.0
            )))
        }
    };
    Ok(value)
}

fn truncated() -> Error {
    Error::Decode("truncated integer column value".into())
}

fn parse_text_datetime(s: &str) -> crate::Result<DateTime> {
    let bad = || Error::Decode(format!("malformed DATETIME text value {:?}", s));

    let (date_part, time_part) = match s.split_once(' ') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };

    let mut date_fields = date_part.splitn(3, '-');
    let year = date_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let month = date_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let day = date_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

    let mut dt = DateTime {
        year,
        month,
        day,
        ..Default::default()
    };

    if let Some(time_part) = time_part {
        let (hms, frac) = match time_part.split_once('.') {
            Some((hms, frac)) => (hms, Some(frac)),
            None => (time_part, None),
        };

        let mut time_fields = hms.splitn(3, ':');
        dt.hour = time_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        dt.minute = time_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        dt.second = time_fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

        if let Some(frac) = frac {
            let padded = format!("{:0<6}", frac);
            dt.microsecond = padded[..6].parse().map_err(|_| bad())?;
        }
    }

    Ok(dt)
}

fn parse_text_duration(s: &str) -> crate::Result<Duration> {
    let bad = || Error::Decode(format!("malformed TIME text value {:?}", s));

    let (is_negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (hms, frac) = match rest.split_once('.') {
        Some((hms, frac)) => (hms, Some(frac)),
        None => (rest, None),
    };

    let mut fields = hms.splitn(3, ':');
    let hours_field: u32 = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let minutes = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let seconds = fields.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;

    let days = hours_field / 24;
    let hours = (hours_field % 24) as u8;

    let microseconds = match frac {
        Some(frac) => {
            let padded = format!("{:0<6}", frac);
            padded[..6].parse().map_err(|_| bad())?
        }
        None => 0,
    };

    Ok(Duration {
        is_negative,
        days,
        hours,
        minutes,
        seconds,
        microseconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FieldFlags;

    fn column(type_id: TypeId) -> ColumnDefinition {
        ColumnDefinition {
            schema: None,
            table_alias: None,
            table: None,
            column_alias: Some("c".into()),
            column: None,
            char_set: 45,
            max_size: 0,
            type_id,
            flags: FieldFlags::empty(),
            decimals: 0,
        }
    }

    #[test]
    fn text_row_reads_integers_and_strings() {
        let buf = [0x02u8, b'4', b'2', 0x02, b'h', b'i'];
        let columns: Arc<[ColumnDefinition]> = vec![column(TypeId::LONG), column(TypeId::STRING)].into();
        let inner = protocol::Row::decode_text(&buf, &[TypeId::LONG, TypeId::STRING]).unwrap();
        let row = Row::new(inner, columns);

        assert_eq!(row.get_i64(0).unwrap(), Some(42));
        assert_eq!(row.get_str(1).unwrap(), Some("hi"));
    }

    #[test]
    fn binary_row_reads_fixed_width_integer() {
        let buf = [0x00u8, 0x00, 0x2A, 0x00, 0x00, 0x00];
        let columns: Arc<[ColumnDefinition]> = vec![column(TypeId::LONG)].into();
        let inner = protocol::Row::decode_binary(&buf, &[TypeId::LONG]).unwrap();
        let row = Row::new(inner, columns);

        assert_eq!(row.get_u64(0).unwrap(), Some(42));
    }

    #[test]
    fn parses_text_datetime_with_fractional_seconds() {
        let dt = parse_text_datetime("2010-10-17 19:27:30.000001").unwrap();
        assert_eq!(
            dt,
            DateTime {
                year: 2010,
                month: 10,
                day: 17,
                hour: 19,
                minute: 27,
                second: 30,
                microsecond: 1,
            }
        );
    }

    #[test]
    fn parses_negative_text_duration_spanning_multiple_days() {
        let d = parse_text_duration("-30:15:00").unwrap();
        assert_eq!(
            d,
            Duration {
                is_negative: true,
                days: 1,
                hours: 6,
                minutes: 15,
                seconds: 0,
                microseconds: 0,
            }
        );
    }
}
