use crate::error::Error;
use crate::io::Buf;
use crate::protocol::Decode;

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_basic_err_packet.html
// https://mariadb.com/kb/en/err_packet/
#[derive(Debug)]
pub struct ErrPacket {
    pub error_code: u16,
    pub sql_state: Box<str>,
    pub error_message: Box<str>,
}

impl<'a> Decode<'a> for ErrPacket {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFF {
            return Err(Error::UnexpectedPacket(format!(
                "expected ERR (0xff); received 0x{:x}",
                header
            )));
        }

        let error_code = buf.get_u16()?;

        // sql_state_marker : string<1> (always '#' under CLIENT_PROTOCOL_41)
        buf.advance(1);
        let sql_state = buf.get_str(5)?.into();

        let error_message = buf.get_str(buf.len())?.into();

        Ok(Self {
            error_code,
            sql_state,
            error_message,
        })
    }
}

impl ErrPacket {
    pub fn into_error(self) -> Error {
        Error::Server {
            code: self.error_code,
            sql_state: self.sql_state.into(),
            message: self.error_message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERR_HANDSHAKE_UNKNOWN_DB: &[u8] = b"\xff\x19\x04#42000Unknown database 'unknown'";

    #[test]
    fn it_decodes_err_handshake() {
        let p = ErrPacket::decode(ERR_HANDSHAKE_UNKNOWN_DB).unwrap();

        assert_eq!(p.error_code, 1049);
        assert_eq!(&*p.sql_state, "42000");
        assert_eq!(&*p.error_message, "Unknown database 'unknown'");
    }
}
