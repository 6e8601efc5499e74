use crate::{
    FormatError,
    reader::{ReadResult, Reader, ReaderError},
};
use std::io::{Read, Seek};

/// The four bytes every track chunk starts with.
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";

/// Length of a track chunk header: magic plus body size.
pub const TRACK_HEADER_LEN: u64 = 8;

/// The `MTrk` chunk header preceding every track body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackHeader {
    magic: [u8; 4],
    size: u32,
}

impl TrackHeader {
    /// Build a header for a body of `size` bytes.
    pub const fn new(size: u32) -> Self {
        Self {
            magic: TRACK_MAGIC,
            size,
        }
    }

    /// Read and validate the header of track `index` at the reader's position.
    pub(crate) fn read<R: Read + Seek>(reader: &mut Reader<R>, index: u16) -> ReadResult<Self> {
        let start = reader.position();
        let magic: [u8; 4] = reader.read_exact_size()?;
        if magic != TRACK_MAGIC {
            return Err(ReaderError::format(
                start,
                FormatError::TrackMagic { index, magic },
            ));
        }
        let size = reader.read_u32_be()?;
        Ok(Self { magic, size })
    }

    /// Always `MTrk`.
    pub const fn magic(&self) -> [u8; 4] {
        self.magic
    }

    /// Declared byte length of the track body.
    pub const fn size(&self) -> u32 {
        self.size
    }
}

#[test]
fn reads_track_header() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(std::io::Cursor::new(*b"MTrk\x00\x00\x01\x00")).unwrap();
    let header = TrackHeader::read(&mut reader, 0).unwrap();
    assert_eq!(header, TrackHeader::new(256));
    assert_eq!(reader.position(), TRACK_HEADER_LEN);
}

#[test]
fn rejects_bad_track_magic() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(std::io::Cursor::new(*b"XFIH\x00\x00\x00\x04")).unwrap();
    let err = TrackHeader::read(&mut reader, 2).unwrap_err();
    assert_eq!(err.position(), 0);
    assert!(matches!(
        err.error_kind(),
        crate::reader::ReaderErrorKind::Format(FormatError::TrackMagic { index: 2, .. })
    ));
}

#[test]
fn bad_magic_is_reported_before_a_short_size() {
    // only two of the four size bytes are present
    let mut reader = Reader::new(std::io::Cursor::new(*b"RIFF\x00\x00")).unwrap();
    let err = TrackHeader::read(&mut reader, 1).unwrap_err();
    assert!(!err.is_out_of_bounds());
    assert!(matches!(
        err.error_kind(),
        crate::reader::ReaderErrorKind::Format(FormatError::TrackMagic { index: 1, magic })
            if magic == b"RIFF"
    ));
}
