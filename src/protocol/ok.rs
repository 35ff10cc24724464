use crate::error::Error;
use crate::io::Buf;
use crate::protocol::{Decode, Status};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_basic_ok_packet.html
// https://mariadb.com/kb/en/ok_packet/
#[derive(Debug)]
pub struct OkPacket {
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status: Status,
    pub warnings: u16,
    pub info: Box<str>,
}

impl<'a> Decode<'a> for OkPacket {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0x00 && header != 0xFE {
            return Err(Error::UnexpectedPacket(format!(
                "expected OK (0x00 or 0xfe); received 0x{:x}",
                header
            )));
        }

        let affected_rows = buf.get_uint_lenenc()?.unwrap_or(0);
        let last_insert_id = buf.get_uint_lenenc()?.unwrap_or(0);
        let status = Status::from_bits_truncate(buf.get_u16()?);
        let warnings = buf.get_u16()?;
        let info = buf.get_str(buf.len())?.into();

        Ok(Self {
            affected_rows,
            last_insert_id,
            status,
            warnings,
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_HANDSHAKE: &[u8] = b"\x00\x00\x00\x02@\x00\x00";

    #[test]
    fn it_decodes_ok_handshake() {
        let p = OkPacket::decode(OK_HANDSHAKE).unwrap();

        assert_eq!(p.affected_rows, 0);
        assert_eq!(p.last_insert_id, 0);
        assert_eq!(p.warnings, 0);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
        assert!(p.status.contains(Status::SERVER_SESSION_STATE_CHANGED));
        assert!(p.info.is_empty());
    }
}
