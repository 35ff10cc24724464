use crate::io::Buf;
use crate::protocol::Decode;

#[derive(Debug)]
pub struct ColumnCount {
    pub columns: u64,
}

impl<'a> Decode<'a> for ColumnCount {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let columns = buf.get_uint_lenenc()?.unwrap_or(0);
        Ok(Self { columns })
    }
}
