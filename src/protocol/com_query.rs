use crate::io::BufMut;
use crate::protocol::{Capabilities, Encode};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_query.html
#[derive(Debug)]
pub struct ComQuery<'a> {
    pub query: &'a str,
}

impl Encode for ComQuery<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x03);
        buf.put_str(self.query);
    }
}
