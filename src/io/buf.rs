use std::{io, str};

use byteorder::{ByteOrder, LittleEndian};
use memchr::memchr;

/// A cursor over a borrowed byte slice, advanced as values are read off the front.
///
/// Every multi-byte integer on the wire is little-endian; this trait bakes that in rather
/// than taking a generic `ByteOrder` parameter for every call site.
pub trait Buf<'a> {
    fn advance(&mut self, cnt: usize);

    fn get_u8(&mut self) -> io::Result<u8>;
    fn get_i8(&mut self) -> io::Result<i8>;

    fn get_u16(&mut self) -> io::Result<u16>;
    fn get_i16(&mut self) -> io::Result<i16>;

    fn get_u24(&mut self) -> io::Result<u32>;

    fn get_u32(&mut self) -> io::Result<u32>;
    fn get_i32(&mut self) -> io::Result<i32>;

    fn get_u64(&mut self) -> io::Result<u64>;
    fn get_i64(&mut self) -> io::Result<i64>;

    fn get_f32(&mut self) -> io::Result<f32>;
    fn get_f64(&mut self) -> io::Result<f64>;

    fn get_bytes(&mut self, len: usize) -> io::Result<&'a [u8]>;
    fn get_str(&mut self, len: usize) -> io::Result<&'a str>;

    /// Reads a NUL-terminated string, consuming the terminator but not returning it.
    fn get_str_nul(&mut self) -> io::Result<&'a str>;

    /// Reads a length-encoded integer (`lenc_int`). `0xfb` is reserved for NULL in
    /// column-value context and decodes to `None`.
    fn get_uint_lenenc(&mut self) -> io::Result<Option<u64>>;

    fn get_str_lenenc(&mut self) -> io::Result<Option<&'a str>>;

    fn get_bytes_lenenc(&mut self) -> io::Result<Option<&'a [u8]>>;
}

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of packet payload")
}

impl<'a> Buf<'a> for &'a [u8] {
    fn advance(&mut self, cnt: usize) {
        *self = &self[cnt..];
    }

    fn get_u8(&mut self) -> io::Result<u8> {
        let val = *self.first().ok_or_else(eof)?;
        self.advance(1);
        Ok(val)
    }

    fn get_i8(&mut self) -> io::Result<i8> {
        Ok(self.get_u8()? as i8)
    }

    fn get_u16(&mut self) -> io::Result<u16> {
        if self.len() < 2 {
            return Err(eof());
        }
        let val = LittleEndian::read_u16(self);
        self.advance(2);
        Ok(val)
    }

    fn get_i16(&mut self) -> io::Result<i16> {
        Ok(self.get_u16()? as i16)
    }

    fn get_u24(&mut self) -> io::Result<u32> {
        if self.len() < 3 {
            return Err(eof());
        }
        let val = LittleEndian::read_u24(self);
        self.advance(3);
        Ok(val)
    }

    fn get_u32(&mut self) -> io::Result<u32> {
        if self.len() < 4 {
            return Err(eof());
        }
        let val = LittleEndian::read_u32(self);
        self.advance(4);
        Ok(val)
    }

    fn get_i32(&mut self) -> io::Result<i32> {
        Ok(self.get_u32()? as i32)
    }

    fn get_u64(&mut self) -> io::Result<u64> {
        if self.len() < 8 {
            return Err(eof());
        }
        let val = LittleEndian::read_u64(self);
        self.advance(8);
        Ok(val)
    }

    fn get_i64(&mut self) -> io::Result<i64> {
        Ok(self.get_u64()? as i64)
    }

    fn get_f32(&mut self) -> io::Result<f32> {
        if self.len() < 4 {
            return Err(eof());
        }
        let val = LittleEndian::read_f32(self);
        self.advance(4);
        Ok(val)
    }

    fn get_f64(&mut self) -> io::Result<f64> {
        if self.len() < 8 {
            return Err(eof());
        }
        let val = LittleEndian::read_f64(self);
        self.advance(8);
        Ok(val)
    }

    fn get_bytes(&mut self, len: usize) -> io::Result<&'a [u8]> {
        if self.len() < len {
            return Err(eof());
        }
        let bytes = &self[..len];
        self.advance(len);
        Ok(bytes)
    }

    fn get_str(&mut self, len: usize) -> io::Result<&'a str> {
        str::from_utf8(self.get_bytes(len)?)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    fn get_str_nul(&mut self) -> io::Result<&'a str> {
        let len = memchr(b'\0', self).ok_or_else(eof)?;
        let s = self.get_str(len)?;
        self.advance(1);
        Ok(s)
    }

    fn get_uint_lenenc(&mut self) -> io::Result<Option<u64>> {
        Ok(match self.get_u8()? {
            0xFB => None,
            0xFC => Some(u64::from(self.get_u16()?)),
            0xFD => Some(u64::from(self.get_u24()?)),
            0xFE => Some(self.get_u64()?),
            value => Some(u64::from(value)),
        })
    }

    fn get_str_lenenc(&mut self) -> io::Result<Option<&'a str>> {
        self.get_uint_lenenc()?
            .map(move |len| self.get_str(len as usize))
            .transpose()
    }

    fn get_bytes_lenenc(&mut self) -> io::Result<Option<&'a [u8]>> {
        self.get_uint_lenenc()?
            .map(move |len| self.get_bytes(len as usize))
            .transpose()
    }
}
