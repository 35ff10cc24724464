use crate::io::BufMut;
use crate::protocol::{Capabilities, Encode};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_stmt_close.html
///
/// The server sends no response to this command.
#[derive(Debug)]
pub struct ComStmtClose {
    pub statement_id: u32,
}

impl Encode for ComStmtClose {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x19);
        buf.put_u32(self.statement_id);
    }
}
