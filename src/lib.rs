//! A MySQL/MariaDB client wire protocol implementation: packet framing, the connect
//! handshake and authentication, text queries, and binary prepared-statement
//! execution, over any blocking `Read + Write` transport.

pub mod auth;
pub mod connection;
pub mod error;
pub mod io;
pub(crate) mod logger;
pub mod options;
pub mod protocol;
pub mod resultset;
pub mod row;
pub mod statement;
pub mod value;

pub use connection::Connection;
pub use error::{Error, Result};
pub use options::ConnectOptions;
pub use resultset::{QueryOutcome, QueryResult, ResultSet};
pub use row::Row;
pub use statement::PreparedStatement;
pub use value::{DateTime, Duration, ToMysqlValue};
