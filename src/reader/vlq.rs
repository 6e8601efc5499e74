use crate::FormatError;

/// The most bytes a delta-time may occupy. Four 7-bit groups give 28 bits.
pub const MAX_VLQ_LEN: usize = 4;

#[doc = r#"
Accumulates a MIDI variable-length quantity one byte at a time.

Each byte contributes its low seven bits, most significant group first.
A set high bit means another byte follows.

# Example
```rust
# use midi_tracks::reader::Vlq;
let mut vlq = Vlq::default();
assert_eq!(vlq.push(0x81), Ok(None));
assert_eq!(vlq.push(0x00), Ok(Some(128)));
assert_eq!(vlq.len(), 2);
```
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Vlq {
    value: u32,
    len: usize,
}

impl Vlq {
    /// Feed the next byte.
    ///
    /// Returns `Some(value)` once the terminal byte (high bit clear) arrives.
    pub fn push(&mut self, byte: u8) -> Result<Option<u32>, FormatError> {
        if self.len == MAX_VLQ_LEN {
            return Err(FormatError::VlqTooLong);
        }
        self.value = (self.value << 7) | (byte & 0x7F) as u32;
        self.len += 1;
        if byte & 0x80 == 0 {
            Ok(Some(self.value))
        } else {
            Ok(None)
        }
    }

    /// Bytes consumed so far
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if no byte has been pushed yet
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Decode a complete VLQ from the front of `bytes`.
///
/// Returns the value and the number of bytes it used, or `None` if `bytes`
/// ends before the terminal byte.
pub fn decode_vlq(bytes: &[u8]) -> Result<Option<(u32, usize)>, FormatError> {
    let mut vlq = Vlq::default();
    for &byte in bytes {
        if let Some(value) = vlq.push(byte)? {
            return Ok(Some((value, vlq.len())));
        }
    }
    Ok(None)
}

#[test]
fn single_byte_boundaries() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode_vlq(&[0x00]), Ok(Some((0, 1))));
    assert_eq!(decode_vlq(&[0x40]), Ok(Some((0x40, 1))));
    assert_eq!(decode_vlq(&[0x7F]), Ok(Some((127, 1))));
}

#[test]
fn two_byte_boundaries() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode_vlq(&[0x81, 0x00]), Ok(Some((128, 2))));
    assert_eq!(decode_vlq(&[0x83, 0x60]), Ok(Some((480, 2))));
    assert_eq!(decode_vlq(&[0xFF, 0x7F]), Ok(Some((16_383, 2))));
}

#[test]
fn stops_at_first_terminal_byte() {
    use pretty_assertions::assert_eq;
    // trailing bytes belong to the next field
    assert_eq!(decode_vlq(&[0x81, 0x00, 0x90]), Ok(Some((128, 2))));
}

#[test]
fn four_byte_maximum() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        decode_vlq(&[0xFF, 0xFF, 0xFF, 0x7F]),
        Ok(Some((0x0FFF_FFFF, 4)))
    );
    assert_eq!(
        decode_vlq(&[0x80, 0x80, 0x80, 0x80, 0x00]),
        Err(FormatError::VlqTooLong)
    );
}

#[test]
fn incomplete_sequence() {
    use pretty_assertions::assert_eq;
    assert_eq!(decode_vlq(&[0x81, 0x80]), Ok(None));
    assert_eq!(decode_vlq(&[]), Ok(None));
}
