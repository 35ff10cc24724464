use crate::error::Error;
use crate::io::Buf;
use crate::protocol::{Decode, FieldFlags, TypeId};

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_query_response_text_resultset_column_definition.html
// https://mariadb.com/kb/en/resultset/#column-definition-packet
#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    pub schema: Option<Box<str>>,
    pub table_alias: Option<Box<str>>,
    pub table: Option<Box<str>>,
    pub column_alias: Option<Box<str>>,
    pub column: Option<Box<str>>,
    pub char_set: u16,
    pub max_size: u32,
    pub type_id: TypeId,
    pub flags: FieldFlags,
    pub decimals: u8,
}

impl ColumnDefinition {
    pub fn name(&self) -> Option<&str> {
        self.column_alias.as_deref().or(self.column.as_deref())
    }
}

impl<'a> Decode<'a> for ColumnDefinition {
    fn decode(mut buf: &'a [u8]) -> crate::Result<Self> {
        // catalog : string<lenenc>, always "def"
        let catalog = buf.get_str_lenenc()?;
        if catalog != Some("def") {
            return Err(Error::Decode(format!(
                "expected column definition catalog \"def\"; received {:?}",
                catalog
            )));
        }

        let schema = buf.get_str_lenenc()?.map(Into::into);
        let table_alias = buf.get_str_lenenc()?.map(Into::into);
        let table = buf.get_str_lenenc()?.map(Into::into);
        let column_alias = buf.get_str_lenenc()?.map(Into::into);
        let column = buf.get_str_lenenc()?.map(Into::into);

        let len_fixed_fields = buf.get_uint_lenenc()?.unwrap_or(0);
        if len_fixed_fields != 0x0c {
            return Err(Error::Decode(format!(
                "expected fixed-length fields length 0x0c; received {:#x}",
                len_fixed_fields
            )));
        }

        let char_set = buf.get_u16()?;
        let max_size = buf.get_u32()?;
        let type_id = TypeId(buf.get_u8()?);
        let flags = FieldFlags::from_bits_truncate(buf.get_u16()?);
        let decimals = buf.get_u8()?;

        Ok(Self {
            schema,
            table_alias,
            table,
            column_alias,
            column,
            char_set,
            max_size,
            type_id,
            flags,
            decimals,
        })
    }
}
