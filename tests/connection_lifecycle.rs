//! Scripted transport covering the spec's "connect → ping → close" scenario (§8):
//! `Disconnected -> Ready -> Ready -> Closed`, each step producing the expected OK.

use std::io::{Cursor, Read, Write};

use mysql_proto_core::{Connection, ConnectOptions};

/// An in-memory duplex standing in for a TCP stream: reads are served from a
/// pre-scripted byte stream, writes are just captured.
struct Scripted {
    to_read: Cursor<Vec<u8>>,
    written: Vec<u8>,
}

impl Read for Scripted {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.to_read.read(buf)
    }
}

impl Write for Scripted {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn frame(seq: u8, payload: &[u8]) -> Vec<u8> {
    let len = payload.len() as u32;
    let mut out = vec![
        (len & 0xff) as u8,
        ((len >> 8) & 0xff) as u8,
        ((len >> 16) & 0xff) as u8,
        seq,
    ];
    out.extend_from_slice(payload);
    out
}

// A MariaDB 10.4.7 HandshakeV10, `mysql_native_password`.
const HANDSHAKE: &[u8] = b"\n5.5.5-10.4.7-MariaDB-1:10.4.7+maria~bionic\x00\x0b\x00\x00\x00t6L\\j\"dS\x00\xfe\xf7\x08\x02\x00\xff\x81\x15\x00\x00\x00\x00\x00\x00\x07\x00\x00\x00U14Oph9\"<H5n\x00mysql_native_password\x00";

// A bare OK packet: affected_rows=0, last_insert_id=0, status=SERVER_STATUS_AUTOCOMMIT, warnings=0.
const OK: &[u8] = b"\x00\x00\x00\x02\x40\x00\x00";

#[test]
fn connect_ping_close_round_trip() {
    let mut script = Vec::new();
    script.extend(frame(0, HANDSHAKE)); // server greeting
    script.extend(frame(2, OK)); // auth result (client's response consumed seq 1)
    script.extend(frame(1, OK)); // ping response

    let transport = Scripted {
        to_read: Cursor::new(script),
        written: Vec::new(),
    };

    let options = ConnectOptions::new().username("root");
    let mut connection = Connection::establish(transport, &options).expect("handshake succeeds");

    assert_eq!(connection.server_version(), "5.5.5-10.4.7-MariaDB-1:10.4.7+maria~bionic");

    connection.ping().expect("ping succeeds");
    connection.close().expect("quit succeeds");
}
