//! The text-protocol query path (§4.5 `query(sql)`, §4.7).

use std::io::{Read, Write};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::logger::StatementLogger;
use crate::protocol::{Capabilities, ColumnCount, ColumnDefinition, ComQuery, Decode, Encode, ErrPacket, OkPacket};
use crate::resultset::{QueryOutcome, ResultSet};

use super::Connection;

impl<S: Read + Write> Connection<S> {
    /// Runs `sql` over the text protocol (`COM_QUERY`). Returns `QueryOutcome::Rows`
    /// for statements with a result set, `QueryOutcome::Done` otherwise.
    pub fn query<'c>(&'c mut self, sql: &str) -> Result<QueryOutcome<'c, S>> {
        let mut logger = StatementLogger::new(sql);

        self.stream.reset_sequence();
        let mut payload = Vec::new();
        ComQuery { query: sql }.encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)?;

        let packet = self.stream.recv_packet()?;
        match packet.payload.first() {
            Some(0x00) => {
                let ok = OkPacket::decode(&packet.payload)?;
                logger.increase_rows_affected(ok.affected_rows);
                Ok(QueryOutcome::Done(ok.into()))
            }
            Some(0xFF) => Err(ErrPacket::decode(&packet.payload)?.into_error()),
            Some(0xFB) => Err(Error::UnexpectedPacket(
                "LOCAL INFILE requests are not supported".into(),
            )),
            _ => {
                let column_count = ColumnCount::decode(&packet.payload)?.columns as usize;
                let columns = self.read_column_definitions(column_count)?;
                Ok(QueryOutcome::Rows(ResultSet::new(self, columns, false, logger)))
            }
        }
    }

    /// Reads `count` `ColumnDefinition41` packets, followed by a legacy EOF packet
    /// unless `CLIENT_DEPRECATE_EOF` was negotiated.
    pub(crate) fn read_column_definitions(&mut self, count: usize) -> Result<Arc<[ColumnDefinition]>> {
        let mut columns = Vec::with_capacity(count);
        for _ in 0..count {
            let packet = self.stream.recv_packet()?;
            columns.push(ColumnDefinition::decode(&packet.payload)?);
        }

        self.maybe_recv_eof()?;

        Ok(columns.into())
    }

    pub(crate) fn maybe_recv_eof(&mut self) -> Result<()> {
        if self.capabilities.contains(Capabilities::DEPRECATE_EOF) {
            return Ok(());
        }

        let packet = self.stream.recv_packet()?;
        if !crate::protocol::is_eof_packet(&packet.payload, self.capabilities) {
            return Err(Error::UnexpectedPacket(
                "expected EOF packet after column definitions".into(),
            ));
        }

        Ok(())
    }
}
