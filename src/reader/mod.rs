#![doc = r#"
Contains the byte-level [`Reader`] used by every decoder in this crate.

The reader wraps any `Read + Seek` stream, remembers how long the stream is,
and keeps track of its own position so that errors can report exactly where
decoding went wrong.
"#]

mod error;
pub use error::*;

mod vlq;
pub use vlq::*;

use std::io::{self, Read, Seek, SeekFrom};

/// A seekable cursor over the bytes of a MIDI file.
#[derive(Debug)]
pub struct Reader<R> {
    inner: R,
    position: u64,
    len: u64,
}

impl<R: Read + Seek> Reader<R> {
    /// Wrap a stream. The stream is rewound to its start.
    pub fn new(mut inner: R) -> ReadResult<Self> {
        let len = inner
            .seek(SeekFrom::End(0))
            .map_err(|e| ReaderError::new(0, e.into()))?;
        inner
            .seek(SeekFrom::Start(0))
            .map_err(|e| ReaderError::new(0, e.into()))?;
        Ok(Self {
            inner,
            position: 0,
            len,
        })
    }

    /// The absolute offset of the next byte to be read.
    #[inline]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Total length of the underlying stream in bytes.
    #[inline]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// True if the underlying stream holds no bytes at all.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once every byte of the stream has been consumed.
    #[inline]
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.len
    }

    /// Build an error located at the current position.
    pub(crate) fn error(&self, kind: impl Into<ReaderErrorKind>) -> ReaderError {
        ReaderError::new(self.position, kind.into())
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> ReadResult<u8> {
        let [byte] = self.read_exact_size::<1>()?;
        Ok(byte)
    }

    /// Reads exactly `N` bytes, failing with `UnexpectedEof` if fewer remain.
    pub fn read_exact_size<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let mut buf = [0; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Fills `buf` completely, failing with `UnexpectedEof` if the stream runs dry.
    pub fn read_into(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        let got = self.fill(buf)?;
        if got < buf.len() {
            return Err(self.error(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("wanted {} bytes, stream had {got}", buf.len()),
            )));
        }
        Ok(())
    }

    /// Reads as many bytes as are available, up to `buf.len()`.
    ///
    /// Returns the count actually read. Only a short stream yields a short count.
    pub fn fill(&mut self, buf: &mut [u8]) -> ReadResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.error(e)),
            }
        }
        Ok(filled)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Reads a MIDI variable-length quantity.
    ///
    /// Returns the decoded value along with the number of bytes it occupied.
    pub fn read_vlq(&mut self) -> ReadResult<(u32, usize)> {
        let start = self.position;
        let mut vlq = Vlq::default();
        loop {
            let byte = self.read_byte()?;
            match vlq.push(byte) {
                Ok(Some(value)) => return Ok((value, vlq.len())),
                Ok(None) => {}
                Err(e) => return Err(ReaderError::format(start, e)),
            }
        }
    }

    /// Seeks to an absolute offset. Offsets past the end of the stream are rejected.
    pub fn seek_to(&mut self, offset: u64) -> ReadResult<()> {
        if offset > self.len {
            return Err(ReaderError::oob(self.position, offset, self.len));
        }
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|e| self.error(e))?;
        self.position = offset;
        Ok(())
    }

    /// Seeks forward by `count` bytes from the current position.
    pub fn skip(&mut self, count: u64) -> ReadResult<()> {
        let target = self
            .position
            .checked_add(count)
            .ok_or_else(|| ReaderError::oob(self.position, u64::MAX, self.len))?;
        self.seek_to(target)
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[test]
fn reads_big_endian_primitives() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(io::Cursor::new([0x00, 0x00, 0x00, 0x06, 0x01, 0xE0])).unwrap();
    assert_eq!(reader.read_u32_be().unwrap(), 6);
    assert_eq!(reader.read_u16_be().unwrap(), 480);
    assert_eq!(reader.position(), 6);
    assert!(reader.is_at_end());
}

#[test]
fn short_read_is_unexpected_eof() {
    let mut reader = Reader::new(io::Cursor::new([0x00, 0x01])).unwrap();
    let err = reader.read_u32_be().unwrap_err();
    assert!(err.is_out_of_bounds());
    assert!(matches!(err.error_kind(), ReaderErrorKind::Io(_)));
}

#[test]
fn seeking_past_end_is_rejected() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(io::Cursor::new([0u8; 4])).unwrap();
    reader.skip(4).unwrap();
    assert_eq!(reader.position(), 4);
    let err = reader.skip(1).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::OutOfBounds { target: 5, len: 4 }
    ));
    assert_eq!(reader.position(), 4);
}

#[test]
fn vlq_reports_bytes_consumed() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(io::Cursor::new([0x81, 0x00, 0x7F])).unwrap();
    assert_eq!(reader.read_vlq().unwrap(), (128, 2));
    assert_eq!(reader.read_vlq().unwrap(), (127, 1));
}

#[test]
fn vlq_truncated_mid_sequence() {
    let mut reader = Reader::new(io::Cursor::new([0x81, 0x80])).unwrap();
    let err = reader.read_vlq().unwrap_err();
    assert!(err.is_out_of_bounds());
}
