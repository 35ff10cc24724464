use crate::error::Error;
use crate::io::Buf;
use crate::protocol::Decode;

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_stmt_prepare.html#sect_protocol_com_stmt_prepare_response_ok
#[derive(Debug)]
pub struct ComStmtPrepareOk {
    pub statement_id: u32,
    /// Number of columns in the returned result set (0 if the statement has none).
    pub columns: u16,
    /// Number of `?` placeholders.
    pub params: u16,
    pub warnings: u16,
}

impl<'a> Decode<'a> for ComStmtPrepareOk {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0x00 {
            return Err(Error::UnexpectedPacket(format!(
                "expected COM_STMT_PREPARE_OK (0x00); received 0x{:x}",
                header
            )));
        }

        let statement_id = buf.get_u32()?;
        let columns = buf.get_u16()?;
        let params = buf.get_u16()?;

        // reserved : string<1>
        buf.advance(1);

        let warnings = buf.get_u16()?;

        Ok(Self {
            statement_id,
            columns,
            params,
            warnings,
        })
    }
}
