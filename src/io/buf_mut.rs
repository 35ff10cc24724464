use byteorder::{ByteOrder, LittleEndian};

/// Append-only little-endian encoder over a growable byte buffer.
pub trait BufMut {
    fn put_u8(&mut self, val: u8);
    fn put_u16(&mut self, val: u16);
    fn put_u24(&mut self, val: u32);
    fn put_u32(&mut self, val: u32);
    fn put_u64(&mut self, val: u64);

    fn put_bytes(&mut self, val: &[u8]);
    fn put_str(&mut self, val: &str);
    fn put_str_nul(&mut self, val: &str);

    /// Pads with `cnt` zero bytes, used for the handshake response's reserved fields.
    fn pad(&mut self, cnt: usize);

    fn put_uint_lenenc(&mut self, val: u64);
    fn put_bytes_lenenc(&mut self, val: &[u8]);
}

impl BufMut for Vec<u8> {
    fn put_u8(&mut self, val: u8) {
        self.push(val);
    }

    fn put_u16(&mut self, val: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_u24(&mut self, val: u32) {
        let mut buf = [0u8; 3];
        LittleEndian::write_u24(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_u32(&mut self, val: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_u64(&mut self, val: u64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, val);
        self.extend_from_slice(&buf);
    }

    fn put_bytes(&mut self, val: &[u8]) {
        self.extend_from_slice(val);
    }

    fn put_str(&mut self, val: &str) {
        self.extend_from_slice(val.as_bytes());
    }

    fn put_str_nul(&mut self, val: &str) {
        self.put_str(val);
        self.push(0);
    }

    fn pad(&mut self, cnt: usize) {
        self.resize(self.len() + cnt, 0);
    }

    fn put_uint_lenenc(&mut self, val: u64) {
        if val < 0xFB {
            self.put_u8(val as u8);
        } else if val <= 0xFFFF {
            self.put_u8(0xFC);
            self.put_u16(val as u16);
        } else if val <= 0xFF_FFFF {
            self.put_u8(0xFD);
            self.put_u24(val as u32);
        } else {
            self.put_u8(0xFE);
            self.put_u64(val);
        }
    }

    fn put_bytes_lenenc(&mut self, val: &[u8]) {
        self.put_uint_lenenc(val.len() as u64);
        self.put_bytes(val);
    }
}
