//! Length-encoded integer round-trip across the protocol's documented boundary values
//! (§8 testable property 2).

use mysql_proto_core::io::{Buf, BufMut};

const BOUNDARY_VALUES: &[u64] = &[
    0,
    0xfa,
    0xfb,
    0xfc,
    0xffff,
    0x1_0000,
    0xff_ffff,
    0x100_0000,
    0xffff_ffff_ffff_ffff,
];

#[test]
fn lenenc_int_round_trips_every_boundary_value() {
    for &value in BOUNDARY_VALUES {
        let mut buf = Vec::new();
        buf.put_uint_lenenc(value);

        let mut slice: &[u8] = &buf;
        let decoded = slice.get_uint_lenenc().unwrap();

        assert_eq!(decoded, Some(value), "round trip failed for {:#x}", value);
        assert!(slice.is_empty(), "leftover bytes decoding {:#x}", value);
    }
}

#[test]
fn lenenc_int_matches_the_spec_encode_examples() {
    let mut buf = Vec::new();
    buf.put_uint_lenenc(252);
    assert_eq!(buf, vec![0xfc, 0xfc, 0x00]);

    let mut buf = Vec::new();
    buf.put_uint_lenenc(0x1_0000);
    assert_eq!(buf, vec![0xfd, 0x00, 0x00, 0x01]);
}
