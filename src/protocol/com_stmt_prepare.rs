use crate::io::BufMut;
use crate::protocol::{Capabilities, Encode};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_stmt_prepare.html
#[derive(Debug)]
pub struct ComStmtPrepare<'a> {
    pub query: &'a str,
}

impl Encode for ComStmtPrepare<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x16);
        buf.put_str(self.query);
    }
}
