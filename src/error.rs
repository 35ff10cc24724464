use thiserror::Error;

/// Every way a connection can fail, from a dropped socket up to a typed server error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("packet framing lost sync: expected sequence id {expected}, received {received}")]
    UnexpectedSequenceId { expected: u8, received: u8 },

    #[error("unexpected packet: {0}")]
    UnexpectedPacket(String),

    #[error("server error {code} ({sql_state}): {message}")]
    Server {
        code: u16,
        sql_state: String,
        message: String,
    },

    #[error("server did not negotiate CLIENT_PROTOCOL_41")]
    UnsupportedProtocol,

    #[error("unsupported authentication plugin: {0}")]
    UnsupportedAuthPlugin(String),

    #[error("prepared statement expects {expected} parameters, got {got}")]
    ParamsCountMismatch { expected: usize, got: usize },

    #[error("value cannot be mapped to a MySQL field type: {0}")]
    UnsupportedType(String),

    #[error("malformed payload: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
