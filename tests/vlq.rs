mod common;

use common::encode_vlq;
use midi_tracks::reader::{Reader, decode_vlq};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::io::Cursor;

proptest! {
    #[test]
    fn round_trip(value in 0u32..(1 << 28)) {
        let bytes = encode_vlq(value);
        prop_assert_eq!(decode_vlq(&bytes), Ok(Some((value, bytes.len()))));
    }

    #[test]
    fn reader_consumes_exactly_the_encoding(value in 0u32..(1 << 28), trailing in any::<u8>()) {
        let mut bytes = encode_vlq(value);
        let len = bytes.len();
        bytes.push(trailing);

        let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
        prop_assert_eq!(reader.read_vlq().unwrap(), (value, len));
        prop_assert_eq!(reader.position(), len as u64);
    }
}

#[test]
fn encoded_lengths() {
    for (value, len) in [
        (0, 1),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        (2_097_151, 3),
        (2_097_152, 4),
        (0x0FFF_FFFF, 4),
    ] {
        assert_eq!(encode_vlq(value).len(), len, "value {value}");
        assert_eq!(decode_vlq(&encode_vlq(value)), Ok(Some((value, len))));
    }
}
