//! End-to-end `COM_STMT_EXECUTE` wire layout for the `SELECT ?` example worked through
//! in full in §8: one `NULL`, one 4-byte integer, one string parameter.

use mysql_proto_core::io::BufMut;
use mysql_proto_core::protocol::{
    build_null_bitmap, Capabilities, ComStmtExecute, Cursor, Encode, ParamType, TypeId,
};

#[test]
fn select_placeholder_execute_matches_the_spec_example() {
    let is_null = [true, false, false];
    let null_bitmap = build_null_bitmap(&is_null);
    assert_eq!(null_bitmap, vec![0b001]);

    // The unsigned flag reflects the wire-layout example as given; a real caller
    // binding a Rust `u32` through `ToMysqlValue` sets this bit (see value.rs), which
    // is a deliberate divergence from this illustrative scenario, not a bug.
    let param_types = [
        ParamType { type_id: TypeId::NULL, is_unsigned: false },
        ParamType { type_id: TypeId::LONG, is_unsigned: false },
        ParamType { type_id: TypeId::STRING, is_unsigned: false },
    ];

    let mut values = Vec::new();
    values.put_u32(42);
    values.put_bytes_lenenc(b"hi");

    let mut payload = Vec::new();
    ComStmtExecute {
        statement_id: 1,
        cursor: Cursor::NO_CURSOR,
        null_bitmap: &null_bitmap,
        param_types: &param_types,
        params: &values,
    }
    .encode(&mut payload, Capabilities::empty());

    let mut expected = vec![0x17];
    expected.extend_from_slice(&1u32.to_le_bytes()); // statement_id
    expected.push(0x00); // cursor flags
    expected.extend_from_slice(&1u32.to_le_bytes()); // iteration_count
    expected.push(0b001); // null bitmap
    expected.push(0x01); // new_params_bind_flag
    expected.extend_from_slice(&[TypeId::NULL.0, 0, TypeId::LONG.0, 0, TypeId::STRING.0, 0]);
    expected.extend_from_slice(&[0x2a, 0x00, 0x00, 0x00, 0x02, b'h', b'i']);

    assert_eq!(payload, expected);
}
