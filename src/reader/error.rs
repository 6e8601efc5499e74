use crate::FormatError;
use std::io;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes out of a MIDI file
"#]
#[derive(Debug, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: u64,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// The underlying stream failed, or ended in the middle of a fixed-size read.
    #[error("I/O {0}")]
    Io(#[from] io::Error),
    /// The bytes read do not form a valid MIDI file.
    #[error("Parsing {0}")]
    Format(#[from] FormatError),
    /// A seek would have moved past the end of the stream.
    #[error("Seek to {target} is out of bounds (stream is {len} bytes)")]
    OutOfBounds {
        /// Requested absolute offset
        target: u64,
        /// Length of the stream
        len: u64,
    },
    /// An allocation for decoded data could not be satisfied.
    #[error("Out of memory allocating {0} bytes")]
    OutOfMemory(usize),
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: u64, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the stream ended early or a seek left its bounds
    pub fn is_out_of_bounds(&self) -> bool {
        match &self.kind {
            ReaderErrorKind::OutOfBounds { .. } => true,
            ReaderErrorKind::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Create a new invalid data error
    pub const fn format(position: u64, error: FormatError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Format(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: u64, target: u64, len: u64) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds { target, len },
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
