//! Typed views over packet payloads, one module per wire message.
//!
//! As with the teacher, modules are named after the message they decode or encode
//! rather than grouped by direction; `Decode`/`Encode` are the seams callers go through.

mod capabilities;
mod field;
mod status;
mod type_id;

pub use capabilities::Capabilities;
pub use field::FieldFlags;
pub use status::Status;
pub use type_id::TypeId;

mod auth_switch;
mod column_count;
mod column_def;
mod com_ping;
mod com_query;
mod com_stmt_close;
mod com_stmt_execute;
mod com_stmt_prepare;
mod com_stmt_prepare_ok;
mod eof;
mod err;
mod handshake;
mod handshake_response;
mod ok;
mod row;

pub use auth_switch::AuthSwitch;
pub use column_count::ColumnCount;
pub use column_def::ColumnDefinition;
pub use com_ping::ComPing;
pub use com_query::ComQuery;
pub use com_stmt_close::ComStmtClose;
pub use com_stmt_execute::{build_null_bitmap, null_bitmap_len, ComStmtExecute, Cursor, ParamType};
pub use com_stmt_prepare::ComStmtPrepare;
pub use com_stmt_prepare_ok::ComStmtPrepareOk;
pub use eof::{is_eof_packet, EofPacket};
pub use err::ErrPacket;
pub use handshake::Handshake;
pub use handshake_response::HandshakeResponse;
pub use ok::OkPacket;
pub use row::Row;

/// Implemented by messages the server sends that this crate needs to parse.
pub trait Decode<'a>: Sized {
    fn decode(buf: &'a [u8]) -> crate::Result<Self>;
}

/// Implemented by messages this crate sends to the server.
pub trait Encode {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities);
}

/// `COM_QUIT` carries no fields beyond its opcode.
#[derive(Debug)]
pub struct ComQuit;

impl Encode for ComQuit {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        use crate::io::BufMut;
        buf.put_u8(0x01);
    }
}
