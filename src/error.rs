use crate::reader::{ReaderError, ReaderErrorKind};
use std::{io, path::PathBuf};
use thiserror::Error;

#[doc = r#"
Ways the bytes of a MIDI file can fail to follow the Standard MIDI File layout.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The file does not begin with `MThd`.
    #[error("bad header magic {0:02X?}, expected \"MThd\"")]
    HeaderMagic([u8; 4]),
    /// Fewer than the 14 fixed header bytes were present.
    #[error("header is {0} bytes, expected at least 14")]
    HeaderTruncated(usize),
    /// The declared header length cannot hold format, track count and division.
    #[error("header declares {0} bytes, smaller than the 6 fixed fields")]
    HeaderSize(u32),
    /// A track chunk does not begin with `MTrk`.
    #[error("track {index} has bad magic {magic:02X?}, expected \"MTrk\"")]
    TrackMagic {
        /// Zero-based track index
        index: u16,
        /// The four bytes found instead
        magic: [u8; 4],
    },
    /// A data byte appeared where a status byte was required, with no running
    /// status to fall back on.
    #[error("invalid command byte {0:#04X}, no running status")]
    NoRunningStatus(u8),
    /// A delta-time ran past four bytes.
    #[error("delta-time longer than 4 bytes")]
    VlqTooLong,
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Opening, reading or seeking the stream failed.
    Io,
    /// The bytes do not form a valid MIDI file.
    Format,
    /// An allocation could not be satisfied.
    OutOfMemory,
    /// A requested track does not exist.
    NotFound,
}

#[doc = r#"
Every error surfaced by the public API of this crate
"#]
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        /// Path handed to [`MidiFile::open`](crate::file::MidiFile::open)
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },
    /// Decoding the stream failed.
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Track index beyond the declared count, or beyond the end of the stream.
    #[error("track {index} does not exist, file has {count}")]
    TrackIndex {
        /// Requested index
        index: u16,
        /// Tracks available
        count: u16,
    },
    /// No track carries the requested name.
    #[error("no track named {0:?}")]
    TrackNotFound(String),
    /// Writing extracted events failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// Destination file
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },
}

impl Error {
    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Open { .. } | Self::Output { .. } => ErrorCategory::Io,
            Self::Read(e) => match e.error_kind() {
                ReaderErrorKind::Io(_) | ReaderErrorKind::OutOfBounds { .. } => ErrorCategory::Io,
                ReaderErrorKind::Format(_) => ErrorCategory::Format,
                ReaderErrorKind::OutOfMemory(_) => ErrorCategory::OutOfMemory,
            },
            Self::TrackIndex { .. } | Self::TrackNotFound(_) => ErrorCategory::NotFound,
        }
    }

    /// The format violation behind this error, if any.
    pub fn format_error(&self) -> Option<FormatError> {
        match self {
            Self::Read(e) => match e.error_kind() {
                ReaderErrorKind::Format(f) => Some(*f),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Result alias over [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[test]
fn categories() {
    use pretty_assertions::assert_eq;
    let format: Error = ReaderError::format(3, FormatError::VlqTooLong).into();
    assert_eq!(format.category(), ErrorCategory::Format);
    assert_eq!(format.format_error(), Some(FormatError::VlqTooLong));

    let oob: Error = ReaderError::oob(0, 10, 4).into();
    assert_eq!(oob.category(), ErrorCategory::Io);

    let oom: Error = ReaderError::new(0, ReaderErrorKind::OutOfMemory(64)).into();
    assert_eq!(oom.category(), ErrorCategory::OutOfMemory);

    let missing = Error::TrackIndex { index: 4, count: 4 };
    assert_eq!(missing.category(), ErrorCategory::NotFound);
    assert_eq!(missing.format_error(), None);
}
