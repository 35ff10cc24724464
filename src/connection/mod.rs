//! The connection state machine (§4.5): dial, handshake/auth, then a sequence of
//! `query`/`prepare`/`execute`/`ping` calls, ending in `close`.

use std::io::{Read, Write};

use crate::error::Result;
use crate::io::PacketStream;
use crate::options::ConnectOptions;
use crate::protocol::{Capabilities, ComPing, ComQuit, Decode, Encode, ErrPacket};

mod establish;
mod execute;
mod query;

/// A connection to a MySQL/MariaDB server over any blocking `Read + Write` transport.
///
/// Single-owner, strictly sequential: every operation blocks until its response is
/// fully received, matching the protocol's half-duplex design (§5).
pub struct Connection<S> {
    pub(crate) stream: PacketStream<S>,
    pub(crate) capabilities: Capabilities,
    server_version: Box<str>,
    #[allow(dead_code)]
    connection_id: u32,
}

impl<S: Read + Write> Connection<S> {
    /// Performs the handshake and authentication over an already-connected transport.
    pub fn establish(transport: S, options: &ConnectOptions) -> Result<Self> {
        establish::establish(transport, options)
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn ping(&mut self) -> Result<()> {
        self.stream.reset_sequence();

        let mut payload = Vec::new();
        ComPing.encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)?;

        let packet = self.stream.recv_packet()?;
        match packet.payload.first() {
            Some(0x00) => Ok(()),
            Some(0xFF) => Err(ErrPacket::decode(&packet.payload)?.into_error()),
            _ => Err(crate::error::Error::UnexpectedPacket(
                "expected OK in response to COM_PING".into(),
            )),
        }
    }

    /// Sends `COM_QUIT` and consumes the connection; the server sends no response.
    pub fn close(mut self) -> Result<()> {
        self.stream.reset_sequence();

        let mut payload = Vec::new();
        ComQuit.encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)
    }
}
