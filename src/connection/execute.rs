//! Prepared-statement lifecycle (§4.5 `prepare`/`execute`/`close_statement`, §4.6).

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::logger::StatementLogger;
use crate::protocol::{
    build_null_bitmap, ColumnCount, ColumnDefinition, ComStmtClose, ComStmtExecute,
    ComStmtPrepare, ComStmtPrepareOk, Cursor, Decode, Encode, ErrPacket, OkPacket, ParamType,
};
use crate::resultset::{QueryOutcome, ResultSet};
use crate::statement::PreparedStatement;
use crate::value::ToMysqlValue;

use super::Connection;

impl<S: Read + Write> Connection<S> {
    /// Sends `COM_STMT_PREPARE` and reads back the parameter/result column metadata.
    pub fn prepare(&mut self, sql: &str) -> Result<PreparedStatement> {
        self.stream.reset_sequence();

        let mut payload = Vec::new();
        ComStmtPrepare { query: sql }.encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)?;

        let packet = self.stream.recv_packet()?;
        if packet.payload.first() == Some(&0xFF) {
            return Err(ErrPacket::decode(&packet.payload)?.into_error());
        }

        let ok = ComStmtPrepareOk::decode(&packet.payload)?;

        let mut params = Vec::with_capacity(ok.params as usize);
        if ok.params > 0 {
            for _ in 0..ok.params {
                let packet = self.stream.recv_packet()?;
                params.push(ColumnDefinition::decode(&packet.payload)?);
            }
            self.maybe_recv_eof()?;
        }

        let mut columns = Vec::with_capacity(ok.columns as usize);
        if ok.columns > 0 {
            for _ in 0..ok.columns {
                let packet = self.stream.recv_packet()?;
                columns.push(ColumnDefinition::decode(&packet.payload)?);
            }
            self.maybe_recv_eof()?;
        }

        Ok(PreparedStatement::new(ok.statement_id, params, columns))
    }

    /// Binds `params` to `stmt` and runs it via `COM_STMT_EXECUTE` (§4.6).
    pub fn execute<'c>(
        &'c mut self,
        stmt: &PreparedStatement,
        params: &[&dyn ToMysqlValue],
    ) -> Result<QueryOutcome<'c, S>> {
        if params.len() != stmt.params().len() {
            return Err(Error::ParamsCountMismatch {
                expected: stmt.params().len(),
                got: params.len(),
            });
        }

        let mut logger = StatementLogger::new(format!("EXECUTE #{}", stmt.statement_id()));

        let is_null: Vec<bool> = params.iter().map(|p| p.is_null()).collect();
        let null_bitmap = build_null_bitmap(&is_null);

        let mut param_types = Vec::with_capacity(params.len());
        let mut values = Vec::new();
        for param in params {
            param_types.push(ParamType {
                type_id: param.type_id(),
                is_unsigned: param.is_unsigned(),
            });

            if !param.is_null() {
                param.write_binary(&mut values);
            }
        }

        self.stream.reset_sequence();
        let mut payload = Vec::new();
        ComStmtExecute {
            statement_id: stmt.statement_id(),
            cursor: Cursor::NO_CURSOR,
            null_bitmap: &null_bitmap,
            param_types: &param_types,
            params: &values,
        }
        .encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)?;

        let packet = self.stream.recv_packet()?;
        match packet.payload.first() {
            Some(0x00) => {
                let ok = OkPacket::decode(&packet.payload)?;
                logger.increase_rows_affected(ok.affected_rows);
                Ok(QueryOutcome::Done(ok.into()))
            }
            Some(0xFF) => Err(ErrPacket::decode(&packet.payload)?.into_error()),
            _ => {
                let column_count = ColumnCount::decode(&packet.payload)?.columns as usize;
                let columns = self.read_column_definitions(column_count)?;
                Ok(QueryOutcome::Rows(ResultSet::new(self, columns, true, logger)))
            }
        }
    }

    /// Sends `COM_STMT_CLOSE`; the server sends no response to this command.
    pub fn close_statement(&mut self, stmt: PreparedStatement) -> Result<()> {
        self.stream.reset_sequence();

        let mut payload = Vec::new();
        ComStmtClose {
            statement_id: stmt.statement_id(),
        }
        .encode(&mut payload, self.capabilities);
        self.stream.send_packet(&payload)
    }
}
