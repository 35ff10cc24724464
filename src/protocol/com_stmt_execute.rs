use crate::io::BufMut;
use crate::protocol::{Capabilities, Encode, TypeId};

bitflags::bitflags! {
    // https://dev.mysql.com/doc/dev/mysql-server/latest/mysql__com_8h.html
    // https://mariadb.com/kb/en/library/com_stmt_execute/#flag
    pub struct Cursor: u8 {
        const NO_CURSOR = 0;
        const READ_ONLY = 1;
        const FOR_UPDATE = 2;
        const SCROLLABLE = 4;
    }
}

/// One `?` placeholder's resolved wire type, paired with its unsigned-ness.
#[derive(Debug, Clone, Copy)]
pub struct ParamType {
    pub type_id: TypeId,
    pub is_unsigned: bool,
}

// https://dev.mysql.com/doc/dev/mysql-server/latest/page_protocol_com_stmt_execute.html
#[derive(Debug)]
pub struct ComStmtExecute<'a> {
    pub statement_id: u32,
    pub cursor: Cursor,
    /// Bit `i` set iff parameter `i` is null. Length `⌈params.len/8⌉`.
    pub null_bitmap: &'a [u8],
    pub param_types: &'a [ParamType],
    /// Concatenated binary-encoded values of the non-null parameters, in order.
    pub params: &'a [u8],
}

impl Encode for ComStmtExecute<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x17);
        buf.put_u32(self.statement_id);
        buf.put_u8(self.cursor.bits());

        // iteration_count, always 1
        buf.put_u32(1);

        if !self.param_types.is_empty() {
            buf.put_bytes(self.null_bitmap);

            // new_params_bind_flag
            buf.put_u8(1);

            for ty in self.param_types {
                buf.put_u8(ty.type_id.0);
                buf.put_u8(if ty.is_unsigned { 0x80 } else { 0 });
            }

            buf.put_bytes(self.params);
        }
    }
}

/// Length of the null bitmap for `n` prepared-statement parameters: `⌈n/8⌉` bytes.
pub fn null_bitmap_len(n: usize) -> usize {
    (n + 7) / 8
}

/// Builds the null bitmap for a parameter list, little-endian bit order.
pub fn build_null_bitmap(is_null: &[bool]) -> Vec<u8> {
    let mut bitmap = vec![0u8; null_bitmap_len(is_null.len())];
    for (i, &null) in is_null.iter().enumerate() {
        if null {
            bitmap[i / 8] |= 1 << (i % 8);
        }
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_null_bitmap_matching_the_spec_example() {
        // null, 42u32, "hi" -> bit 0 set, bits 1-2 clear
        let bitmap = build_null_bitmap(&[true, false, false]);
        assert_eq!(bitmap, vec![0b001]);
    }
}
