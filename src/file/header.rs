use crate::{
    FormatError,
    file::{Division, FormatType},
    reader::{ReadResult, Reader, ReaderError},
};
use std::io::{Read, Seek};

/// The four bytes every Standard MIDI File starts with.
pub const HEADER_MAGIC: [u8; 4] = *b"MThd";

/// Length of the fixed header: magic, size, format, track count and division.
pub const HEADER_LEN: usize = 14;

/// Bytes of format, track count and division counted by the declared header size.
pub const HEADER_FIXED_FIELDS: u32 = 6;

#[doc = r#"
The `MThd` chunk of a MIDI file.

```text
4D 54 68 64   "MThd"
00 00 00 06   declared size (fields below plus any extension)
00 01         format
00 04         track count
00 60         division
```

The header is decoded as-is: neither the format nor the division changes how
tracks are located or decoded.

# Example
```rust
# use midi_tracks::prelude::*;
let bytes = *b"MThd\x00\x00\x00\x06\x00\x01\x00\x04\x00\x60";
let header = Header::parse(&bytes).unwrap();

assert_eq!(header.format(), 1);
assert_eq!(header.tracks(), 4);
assert_eq!(header.division().ticks_per_quarter_note(), Some(96));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    magic: [u8; 4],
    size: u32,
    format: u16,
    tracks: u16,
    division: Division,
}

impl Header {
    /// Decode the fixed 14 header bytes.
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self, FormatError> {
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != HEADER_MAGIC {
            return Err(FormatError::HeaderMagic(magic));
        }
        let size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if size < HEADER_FIXED_FIELDS {
            return Err(FormatError::HeaderSize(size));
        }

        Ok(Self {
            magic,
            size,
            format: u16::from_be_bytes([bytes[8], bytes[9]]),
            tracks: u16::from_be_bytes([bytes[10], bytes[11]]),
            division: Division::from_be_bytes([bytes[12], bytes[13]]),
        })
    }

    /// Read the header from the reader's current position and skip any
    /// extension bytes beyond the fixed fields.
    ///
    /// Leaves the reader at the start of the first track.
    pub(crate) fn read<R: Read + Seek>(reader: &mut Reader<R>) -> ReadResult<Self> {
        let start = reader.position();
        let mut buf = [0; HEADER_LEN];
        let got = reader.fill(&mut buf)?;
        if got < 4 || buf[..4] != HEADER_MAGIC {
            let magic = [buf[0], buf[1], buf[2], buf[3]];
            return Err(ReaderError::format(start, FormatError::HeaderMagic(magic)));
        }
        if got < HEADER_LEN {
            return Err(ReaderError::format(start, FormatError::HeaderTruncated(got)));
        }

        let header = Self::parse(&buf).map_err(|e| ReaderError::format(start, e))?;
        let extension = header.extension_len();
        if extension > 0 {
            tracing::debug!(extension, "skipping header extension bytes");
        }
        reader.skip(u64::from(extension))?;
        Ok(header)
    }

    /// Always `MThd`.
    pub const fn magic(&self) -> [u8; 4] {
        self.magic
    }

    /// Declared size of the header body.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Bytes following the fixed fields that are skipped unread.
    pub const fn extension_len(&self) -> u32 {
        self.size - HEADER_FIXED_FIELDS
    }

    /// The raw format word (0, 1 or 2 for conforming files).
    pub const fn format(&self) -> u16 {
        self.format
    }

    /// The format, if it is one of the three defined by the standard.
    pub fn format_type(&self) -> Option<FormatType> {
        FormatType::try_from(self.format).ok()
    }

    /// Number of tracks the header declares.
    pub const fn tracks(&self) -> u16 {
        self.tracks
    }

    /// The division word, uninterpreted.
    pub const fn division(&self) -> Division {
        self.division
    }
}

#[test]
fn parse_format_one_header() {
    use pretty_assertions::assert_eq;
    let bytes = *b"MThd\x00\x00\x00\x06\x00\x01\x00\x04\x00\x60";
    let header = Header::parse(&bytes).unwrap();

    assert_eq!(header.magic(), *b"MThd");
    assert_eq!(header.size(), 6);
    assert_eq!(header.format(), 1);
    assert_eq!(header.format_type(), Some(FormatType::Simultaneous));
    assert_eq!(header.tracks(), 4);
    assert_eq!(header.division().raw(), 0x60);
    assert_eq!(header.extension_len(), 0);
}

#[test]
fn parse_bad_magic() {
    use pretty_assertions::assert_eq;
    let bytes = *b"RIFF\x00\x00\x00\x06\x00\x01\x00\x04\x00\x60";
    assert_eq!(
        Header::parse(&bytes),
        Err(FormatError::HeaderMagic(*b"RIFF"))
    );
}

#[test]
fn parse_undersized_header() {
    use pretty_assertions::assert_eq;
    let bytes = *b"MThd\x00\x00\x00\x04\x00\x01\x00\x04\x00\x60";
    assert_eq!(Header::parse(&bytes), Err(FormatError::HeaderSize(4)));
}

#[test]
fn unknown_format_word_passes_through() {
    use pretty_assertions::assert_eq;
    let bytes = *b"MThd\x00\x00\x00\x06\x00\x07\x00\x01\x01\xE0";
    let header = Header::parse(&bytes).unwrap();
    assert_eq!(header.format(), 7);
    assert_eq!(header.format_type(), None);
    assert_eq!(header.division().ticks_per_quarter_note(), Some(480));
}
