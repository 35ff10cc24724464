use crate::auth::AuthPlugin;
use crate::io::BufMut;
use crate::protocol::{Capabilities, Encode};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_connection_phase_packets_protocol_handshake_response.html
// https://mariadb.com/kb/en/connection/#handshake-response-packet
#[derive(Debug)]
pub struct HandshakeResponse<'a> {
    pub max_packet_size: u32,
    pub client_collation: u8,
    pub username: &'a str,
    pub database: Option<&'a str>,
    pub auth_plugin: &'a AuthPlugin,
    pub auth_response: &'a [u8],
}

impl Encode for HandshakeResponse<'_> {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        // client_flag : int<4>
        buf.put_u32(capabilities.bits() as u32);

        // max_packet_size : int<4>
        buf.put_u32(self.max_packet_size);

        // character_set : int<1>
        buf.put_u8(self.client_collation);

        // reserved : string<23>
        buf.pad(23);

        // username : string<NUL>
        buf.put_str_nul(self.username);

        if capabilities.contains(Capabilities::PLUGIN_AUTH_LENENC_DATA) {
            // auth_response : string<lenenc>
            buf.put_bytes_lenenc(self.auth_response);
        } else if capabilities.contains(Capabilities::SECURE_CONNECTION) {
            // auth_response_length : int<1>
            buf.put_u8(self.auth_response.len() as u8);
            buf.put_bytes(self.auth_response);
        } else {
            buf.put_u8(0);
        }

        if capabilities.contains(Capabilities::CONNECT_WITH_DB) {
            if let Some(database) = self.database {
                buf.put_str_nul(database);
            }
        }

        if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            buf.put_str_nul(self.auth_plugin.as_str());
        }
    }
}
