//! Streaming result sets (§4.5, §9's "option (a)" design note): a `ResultSet` borrows
//! its connection exclusively for its lifetime, so the borrow checker — not a runtime
//! flag — forbids issuing another command before the current one's rows are drained.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::connection::Connection;
use crate::error::Result;
use crate::logger::StatementLogger;
use crate::protocol::{self, is_eof_packet, ColumnDefinition, ErrPacket, OkPacket, TypeId};
use crate::row::Row;

/// Outcome of a statement that affected rows but returned none (`INSERT`/`UPDATE`/
/// `DELETE`/DDL), or the tail of a row-returning result read via `OkPacket`'s lenenc
/// fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryResult {
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub warnings: u16,
}

impl From<OkPacket> for QueryResult {
    fn from(ok: OkPacket) -> Self {
        Self {
            affected_rows: ok.affected_rows,
            last_insert_id: ok.last_insert_id,
            warnings: ok.warnings,
        }
    }
}

/// The two shapes a `query`/`execute` response can take.
pub enum QueryOutcome<'c, S> {
    Rows(ResultSet<'c, S>),
    Done(QueryResult),
}

impl<'c, S> QueryOutcome<'c, S> {
    pub fn into_rows(self) -> Option<ResultSet<'c, S>> {
        match self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Done(_) => None,
        }
    }

    pub fn into_done(self) -> Option<QueryResult> {
        match self {
            QueryOutcome::Done(result) => Some(result),
            QueryOutcome::Rows(_) => None,
        }
    }
}

pub struct ResultSet<'c, S> {
    connection: &'c mut Connection<S>,
    columns: Arc<[ColumnDefinition]>,
    column_types: Vec<TypeId>,
    binary: bool,
    done: bool,
    logger: StatementLogger,
}

impl<'c, S: Read + Write> ResultSet<'c, S> {
    pub(crate) fn new(
        connection: &'c mut Connection<S>,
        columns: Arc<[ColumnDefinition]>,
        binary: bool,
        logger: StatementLogger,
    ) -> Self {
        let column_types = columns.iter().map(|c| c.type_id).collect();
        Self {
            connection,
            columns,
            column_types,
            binary,
            done: false,
            logger,
        }
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Reads the next row, or `None` once the result set is exhausted.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.done {
            return Ok(None);
        }

        let packet = self.connection.stream.recv_packet()?;

        if is_eof_packet(&packet.payload, self.connection.capabilities) {
            self.done = true;
            return Ok(None);
        }

        if packet.payload.first() == Some(&0xFF) {
            self.done = true;
            return Err(ErrPacket::decode(&packet.payload)?.into_error());
        }

        let row = if self.binary {
            protocol::Row::decode_binary(&packet.payload, &self.column_types)?
        } else {
            protocol::Row::decode_text(&packet.payload, &self.column_types)?
        };

        self.logger.increment_rows_returned();

        Ok(Some(Row::new(row, Arc::clone(&self.columns))))
    }
}

impl<'c, S: Read + Write> Iterator for ResultSet<'c, S> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
