use std::ops::Range;

use crate::error::Error;
use crate::io::Buf;
use crate::protocol::TypeId;

/// A decoded row: a byte buffer plus, for each column, the byte range within it holding
/// that column's value (`None` for SQL NULL).
#[derive(Debug)]
pub struct Row {
    buffer: Box<[u8]>,
    values: Box<[Option<Range<usize>>]>,
    binary: bool,
}

impl Row {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.values[index].is_none()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let range = self.values[index].as_ref()?;
        Some(&self.buffer[range.start..range.end])
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }
}

/// Byte length of a length-encoded value (header + payload) starting at `data[0]`.
/// Used to size text-protocol field slices and binary temporal/string fields without
/// consuming a cursor.
fn lenenc_value_len(data: &[u8]) -> crate::Result<usize> {
    let header = *data.first().ok_or_else(|| {
        Error::Decode("truncated payload: expected length-encoded value header".into())
    })?;

    let (header_len, len) = match header {
        0xFB => return Ok(1),
        0xFC => (
            3,
            u64::from(*data.get(1).ok_or_else(truncated)?) | (u64::from(*data.get(2).ok_or_else(truncated)?) << 8),
        ),
        0xFD => {
            let b1 = *data.get(1).ok_or_else(truncated)?;
            let b2 = *data.get(2).ok_or_else(truncated)?;
            let b3 = *data.get(3).ok_or_else(truncated)?;
            (4, u64::from(b1) | (u64::from(b2) << 8) | (u64::from(b3) << 16))
        }
        0xFE => {
            if data.len() < 9 {
                return Err(truncated());
            }
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[1..9]);
            (9, u64::from_le_bytes(bytes))
        }
        n => return Ok(1 + n as usize),
    };

    Ok(header_len + len as usize)
}

fn truncated() -> Error {
    Error::Decode("truncated payload: expected length-encoded value".into())
}

impl Row {
    /// Decodes a text-protocol row: every field is `0xfb` (NULL) or a length-encoded
    /// string, in column order.
    pub fn decode_text(buf: &[u8], columns: &[TypeId]) -> crate::Result<Self> {
        let buffer: Box<[u8]> = buf.into();
        let mut values = Vec::with_capacity(columns.len());
        let mut index = 0;

        for _ in columns {
            if buffer.get(index).copied() == Some(0xFB) {
                values.push(None);
                index += 1;
                continue;
            }

            let total_len = lenenc_value_len(&buffer[index..])?;
            let payload_len = text_payload_len(&buffer[index..], total_len)?;
            let data_start = index + (total_len - payload_len);

            values.push(Some(data_start..data_start + payload_len));
            index += total_len;
        }

        Ok(Self {
            buffer,
            values: values.into_boxed_slice(),
            binary: false,
        })
    }

    /// Decodes a binary-protocol row: a zero header byte, a server null bitmap with a
    /// 2-bit offset (`bit(column_idx + 2)`), then each non-null value in the column's
    /// declared binary encoding.
    pub fn decode_binary(mut buf: &[u8], columns: &[TypeId]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0 {
            return Err(Error::UnexpectedPacket(format!(
                "expected binary row header (0x00); received {:#04x}",
                header
            )));
        }

        let null_bitmap_len = (columns.len() + 9) / 8;
        let null_bitmap = buf.get_bytes(null_bitmap_len)?;

        let buffer: Box<[u8]> = buf.into();
        let mut values = Vec::with_capacity(columns.len());
        let mut index = 0;

        for (column_idx, type_id) in columns.iter().enumerate() {
            let bit_index = column_idx + 2;
            let is_null = null_bitmap[bit_index / 8] & (1 << (bit_index % 8)) != 0;

            if is_null {
                values.push(None);
                continue;
            }

            let size = binary_field_len(&buffer[index..], *type_id)?;
            values.push(Some(index..index + size));
            index += size;
        }

        Ok(Self {
            buffer,
            values: values.into_boxed_slice(),
            binary: true,
        })
    }
}

/// For a text-protocol lenenc span of total byte length `total`, returns the length of
/// just the payload (excluding the lenenc header) so callers can slice past the header.
fn text_payload_len(data: &[u8], total: usize) -> crate::Result<usize> {
    let header = *data.first().ok_or_else(truncated)?;
    let header_len = match header {
        0xFB => 1,
        0xFC => 3,
        0xFD => 4,
        0xFE => 9,
        _ => 1,
    };
    Ok(total - header_len)
}

fn binary_field_len(data: &[u8], type_id: TypeId) -> crate::Result<usize> {
    let size = match type_id {
        TypeId::TINY => 1,
        TypeId::SHORT | TypeId::YEAR => 2,
        TypeId::LONG | TypeId::INT24 | TypeId::FLOAT => 4,
        TypeId::LONGLONG | TypeId::DOUBLE => 8,

        TypeId::DATE => 1 + *data.first().ok_or_else(truncated)? as usize,
        TypeId::TIME => 1 + *data.first().ok_or_else(truncated)? as usize,
        TypeId::TIMESTAMP | TypeId::DATETIME => 1 + *data.first().ok_or_else(truncated)? as usize,

        TypeId::TINY_BLOB
        | TypeId::MEDIUM_BLOB
        | TypeId::LONG_BLOB
        | TypeId::BLOB
        | TypeId::CHAR
        | TypeId::VAR_CHAR
        | TypeId::VAR_STRING
        | TypeId::STRING
        | TypeId::NEWDECIMAL
        | TypeId::DECIMAL
        | TypeId::ENUM
        | TypeId::SET
        | TypeId::BIT
        | TypeId::GEOMETRY => lenenc_value_len(data)?,

        other => {
            return Err(Error::Decode(format!(
                "unsupported column type id {} in binary row",
                other.0
            )))
        }
    };

    if data.len() < size {
        return Err(truncated());
    }

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_a_text_row_with_a_null_field() {
        // columns: [LONG, STRING]; values: NULL, "hi"
        let buf = [0xFBu8, 0x02, b'h', b'i'];
        let row = Row::decode_text(&buf, &[TypeId::LONG, TypeId::STRING]).unwrap();

        assert!(row.is_null(0));
        assert_eq!(row.get(1), Some(&b"hi"[..]));
    }

    #[test]
    fn it_decodes_a_binary_row_respecting_the_two_bit_offset() {
        // 1 column, non-null; header byte 0x00, null bitmap len = (1+9)/8 = 1 byte.
        // bit_index for column 0 is 2, so an all-zero bitmap byte means "not null".
        let buf = [0x00u8, 0x00, 0x2A, 0x00, 0x00, 0x00];
        let row = Row::decode_binary(&buf, &[TypeId::LONG]).unwrap();

        assert!(!row.is_null(0));
        assert_eq!(row.get(0), Some(&[0x2A, 0x00, 0x00, 0x00][..]));
    }

    #[test]
    fn it_marks_a_binary_column_null_via_the_offset_bit() {
        // column 0 null => bit_index 2 => bit 0x04 set in byte 0
        let buf = [0x00u8, 0b0000_0100];
        let row = Row::decode_binary(&buf, &[TypeId::LONG]).unwrap();

        assert!(row.is_null(0));
    }

    #[test]
    fn it_propagates_an_error_on_truncated_binary_payload_instead_of_stopping_silently() {
        // declares a STRING column but the lenenc length byte says more data follows
        // than is actually present.
        let buf = [0x00u8, 0x00, 0xFC, 0xFF, 0xFF];
        let err = Row::decode_binary(&buf, &[TypeId::STRING]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
