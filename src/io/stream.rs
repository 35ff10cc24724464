use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::io::BufMut;

/// Maximum payload carried by a single wire frame before it must be split into a
/// continuation. `2^24 - 1`.
const MAX_FRAME_LEN: usize = 0xFF_FFFF;

/// A fully reassembled logical packet: one or more frames joined across the
/// `2^24 - 1` boundary, tagged with the sequence id of its first frame.
pub struct Packet {
    pub sequence_id: u8,
    pub payload: Vec<u8>,
}

/// Buffered reader/writer over a blocking transport that understands MySQL's
/// packet framing and sequence-id discipline.
///
/// Writes are staged into an internal buffer — header reserved, payload encoded,
/// header patched in place — so a partially built packet is never visible to the
/// transport; `flush` is what actually performs the write.
pub struct PacketStream<S> {
    transport: S,
    write_buf: Vec<u8>,
    next_seq_no: u8,
}

impl<S> PacketStream<S>
where
    S: Read + Write,
{
    pub fn new(transport: S) -> Self {
        Self {
            transport,
            write_buf: Vec::with_capacity(4096),
            next_seq_no: 0,
        }
    }

    pub fn transport_mut(&mut self) -> &mut S {
        &mut self.transport
    }

    /// Resets the sequence-id counter; called at the start of every client-initiated
    /// command.
    pub fn reset_sequence(&mut self) {
        self.next_seq_no = 0;
    }

    /// Stages `payload` as one or more frames in the write buffer, splitting at
    /// `MAX_FRAME_LEN` and emitting a terminating short (possibly empty) frame when the
    /// payload is an exact multiple of it.
    pub fn stage(&mut self, payload: &[u8]) {
        let mut offset = 0;
        loop {
            let remaining = payload.len() - offset;
            let chunk_len = remaining.min(MAX_FRAME_LEN);

            self.write_buf.put_u24(chunk_len as u32);
            self.write_buf.put_u8(self.next_seq_no);
            self.next_seq_no = self.next_seq_no.wrapping_add(1);
            self.write_buf.put_bytes(&payload[offset..offset + chunk_len]);

            offset += chunk_len;

            if chunk_len < MAX_FRAME_LEN {
                break;
            }

            if offset == payload.len() {
                // Exact multiple of the frame size: a short frame (length 0) terminates.
                self.write_buf.put_u24(0);
                self.write_buf.put_u8(self.next_seq_no);
                self.next_seq_no = self.next_seq_no.wrapping_add(1);
                break;
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.transport.write_all(&self.write_buf)?;
        self.transport.flush()?;
        self.write_buf.clear();
        Ok(())
    }

    /// Stages and immediately sends a single logical packet.
    pub fn send_packet(&mut self, payload: &[u8]) -> Result<()> {
        self.stage(payload);
        self.flush()
    }

    /// Reads one logical packet, reassembling continuation frames, and verifies that
    /// every frame's sequence id matches the connection's expectation.
    pub fn recv_packet(&mut self) -> Result<Packet> {
        let mut payload = Vec::new();
        let mut first_seq_id = None;

        loop {
            let mut header = [0u8; 4];
            self.transport.read_exact(&mut header)?;

            let len = u32::from(header[0])
                | (u32::from(header[1]) << 8)
                | (u32::from(header[2]) << 16);
            let seq_id = header[3];

            if seq_id != self.next_seq_no {
                return Err(Error::UnexpectedSequenceId {
                    expected: self.next_seq_no,
                    received: seq_id,
                });
            }

            if first_seq_id.is_none() {
                first_seq_id = Some(seq_id);
            }

            self.next_seq_no = self.next_seq_no.wrapping_add(1);

            let mut frame = vec![0u8; len as usize];
            self.transport.read_exact(&mut frame)?;
            payload.extend_from_slice(&frame);

            if (len as usize) < MAX_FRAME_LEN {
                break;
            }
        }

        Ok(Packet {
            sequence_id: first_seq_id.unwrap_or(0),
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// An in-memory duplex: writes go to `written`, reads come from `to_read`.
    struct Duplex {
        to_read: Cursor<Vec<u8>>,
        written: Vec<u8>,
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.to_read.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn it_round_trips_a_short_packet() {
        let duplex = Duplex {
            to_read: Cursor::new(Vec::new()),
            written: Vec::new(),
        };
        let mut stream = PacketStream::new(duplex);

        stream.send_packet(b"hello").unwrap();

        let written = &stream.transport_mut().written;
        assert_eq!(&written[..4], &[5, 0, 0, 0]);
        assert_eq!(&written[4..], b"hello");
    }

    #[test]
    fn it_splits_a_max_length_payload_into_two_frames() {
        let duplex = Duplex {
            to_read: Cursor::new(Vec::new()),
            written: Vec::new(),
        };
        let mut stream = PacketStream::new(duplex);

        let payload = vec![0x42u8; MAX_FRAME_LEN];
        stream.send_packet(&payload).unwrap();

        let written = &stream.transport_mut().written;
        // first frame: 0xffffff length, seq 0
        assert_eq!(&written[..4], &[0xff, 0xff, 0xff, 0]);
        // second (terminating) frame: zero length, seq 1
        let second_header_at = 4 + MAX_FRAME_LEN;
        assert_eq!(
            &written[second_header_at..second_header_at + 4],
            &[0, 0, 0, 1]
        );
    }

    #[test]
    fn it_fails_on_unexpected_sequence_id() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[3, 0, 0, 7]); // claims seq id 7, we expect 0
        bytes.extend_from_slice(b"abc");

        let duplex = Duplex {
            to_read: Cursor::new(bytes),
            written: Vec::new(),
        };
        let mut stream = PacketStream::new(duplex);

        let err = stream.recv_packet().unwrap_err();
        assert!(matches!(err, Error::UnexpectedSequenceId { expected: 0, received: 7 }));
    }
}
