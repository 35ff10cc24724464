use crate::auth::AuthPlugin;
use crate::error::Error;
use crate::io::Buf;
use crate::protocol::Decode;

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_packets_protocol_auth_switch_request.html
#[derive(Debug)]
pub struct AuthSwitch {
    pub auth_plugin: AuthPlugin,
    pub auth_plugin_data: Box<[u8]>,
}

impl<'a> Decode<'a> for AuthSwitch {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFE {
            return Err(Error::UnexpectedPacket(format!(
                "expected AuthSwitchRequest (0xfe); received 0x{:x}",
                header
            )));
        }

        let auth_plugin = AuthPlugin::from_name(Some(buf.get_str_nul()?))?;
        let auth_plugin_data = buf.get_bytes(buf.len())?.to_vec().into_boxed_slice();

        Ok(Self {
            auth_plugin,
            auth_plugin_data,
        })
    }
}
