//! Prepared-statement handle: the metadata returned by `COM_STMT_PREPARE` plus the
//! `COM_STMT_CLOSE` cleanup path (§4.6, supplementing the distilled spec which never
//! modeled statement teardown explicitly).

use crate::protocol::ColumnDefinition;

/// A statement prepared on the server. Holds the metadata needed to bind parameters
/// and interpret the result set columns of a later `execute`; owns no I/O itself.
#[derive(Debug)]
pub struct PreparedStatement {
    pub(crate) statement_id: u32,
    pub(crate) params: Vec<ColumnDefinition>,
    pub(crate) columns: Vec<ColumnDefinition>,
}

impl PreparedStatement {
    pub(crate) fn new(
        statement_id: u32,
        params: Vec<ColumnDefinition>,
        columns: Vec<ColumnDefinition>,
    ) -> Self {
        Self {
            statement_id,
            params,
            columns,
        }
    }

    pub fn statement_id(&self) -> u32 {
        self.statement_id
    }

    /// Declared types of the `?` placeholders, in order. MariaDB and older MySQL
    /// servers send these with a generic `VAR_STRING` type rather than the type the
    /// server will eventually bind, so callers should not rely on them for anything
    /// beyond a parameter count.
    pub fn params(&self) -> &[ColumnDefinition] {
        &self.params
    }

    /// Column definitions of the result set this statement produces when executed, or
    /// empty for statements with no result set (e.g. `INSERT`).
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Sends `COM_STMT_CLOSE`, releasing the statement's server-side slot. Dropping a
    /// `PreparedStatement` without calling this leaks that slot (§5) but is not itself
    /// an error.
    pub fn close<S>(self, connection: &mut crate::connection::Connection<S>) -> crate::Result<()>
    where
        S: std::io::Read + std::io::Write,
    {
        connection.close_statement(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FieldFlags, TypeId};

    fn dummy_column(type_id: TypeId) -> ColumnDefinition {
        ColumnDefinition {
            schema: None,
            table_alias: None,
            table: None,
            column_alias: Some("col".into()),
            column: None,
            char_set: 45,
            max_size: 0,
            type_id,
            flags: FieldFlags::empty(),
            decimals: 0,
        }
    }

    #[test]
    fn exposes_param_and_column_metadata() {
        let stmt = PreparedStatement::new(
            7,
            vec![dummy_column(TypeId::LONG)],
            vec![dummy_column(TypeId::STRING), dummy_column(TypeId::LONG)],
        );

        assert_eq!(stmt.statement_id(), 7);
        assert_eq!(stmt.params().len(), 1);
        assert_eq!(stmt.columns().len(), 2);
    }
}
