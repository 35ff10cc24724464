use crate::error::Error;
use crate::io::Buf;
use crate::protocol::{Capabilities, Decode, Status};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_basic_eof_packet.html
// https://mariadb.com/kb/en/eof_packet/
#[derive(Debug)]
pub struct EofPacket {
    pub warnings: u16,
    pub status: Status,
}

impl<'a> Decode<'a> for EofPacket {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFE {
            return Err(Error::UnexpectedPacket(format!(
                "expected EOF (0xfe); received 0x{:x}",
                header
            )));
        }

        let warnings = buf.get_u16()?;
        let status = Status::from_bits_truncate(buf.get_u16()?);

        Ok(Self { warnings, status })
    }
}

/// `0xfe` is ambiguous between EOF and (under `CLIENT_DEPRECATE_EOF`) OK. The legacy
/// EOF packet is always exactly 5 bytes; anything longer under `DEPRECATE_EOF` is OK.
pub fn is_eof_packet(payload: &[u8], capabilities: Capabilities) -> bool {
    payload.first() == Some(&0xFE)
        && (!capabilities.contains(Capabilities::DEPRECATE_EOF) || payload.len() < 9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_decodes_eof() {
        let p = EofPacket::decode(&[0xFE, 0, 0, 0x02, 0]).unwrap();
        assert_eq!(p.warnings, 0);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
    }

    #[test]
    fn it_disambiguates_eof_vs_ok_by_capability_and_length() {
        let legacy_eof = [0xFE, 0, 0, 0x02, 0];
        assert!(is_eof_packet(&legacy_eof, Capabilities::empty()));
        assert!(is_eof_packet(&legacy_eof, Capabilities::DEPRECATE_EOF));

        let long_ok_under_deprecate_eof = [0xFEu8; 9];
        assert!(!is_eof_packet(
            &long_ok_under_deprecate_eof,
            Capabilities::DEPRECATE_EOF
        ));
    }
}
