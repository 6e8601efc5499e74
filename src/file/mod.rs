#![doc = r#"
Random access to the tracks of a Standard MIDI File

# Overview

A MIDI file is a header chunk followed by track chunks:

```text
[Header Chunk: "MThd"]
[Track Chunk 0: "MTrk" <size> <events...>]
[Track Chunk 1: "MTrk" <size> <events...>]
...
```

[`MidiFile`] decodes the header once when opened and remembers where the
first track begins. Asking for track `N` seeks there, skips the bodies of the
`N` tracks before it by reading only their chunk headers, and decodes track
`N` alone. Tracks can be requested in any order and as often as needed.
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track_header;
pub use track_header::*;

use crate::{
    Error, Result,
    reader::Reader,
    track::{Track, materialize, peek_name},
};
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

/// An open MIDI file.
///
/// Owns the underlying stream exclusively. Every operation moves the stream
/// cursor, so one handle serves one caller at a time.
#[derive(Debug)]
pub struct MidiFile<R> {
    reader: Reader<R>,
    header: Header,
    first_track_offset: u64,
}

impl MidiFile<BufReader<File>> {
    /// Open the file at `path` and decode its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened midi file");
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> MidiFile<R> {
    /// Decode the header of a MIDI file held in any seekable stream.
    ///
    /// The stream is read from its start.
    pub fn from_reader(inner: R) -> Result<Self> {
        let mut reader = Reader::new(inner)?;
        let header = Header::read(&mut reader)?;
        let first_track_offset = reader.position();
        tracing::debug!(
            format = header.format(),
            tracks = header.tracks(),
            division = header.division().raw(),
            first_track_offset,
            "decoded midi header"
        );
        Ok(Self {
            reader,
            header,
            first_track_offset,
        })
    }

    /// The decoded file header
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Byte offset at which the first track chunk begins.
    pub const fn first_track_offset(&self) -> u64 {
        self.first_track_offset
    }

    /// Number of tracks the header declares.
    pub const fn track_count(&self) -> u16 {
        self.header.tracks()
    }

    /// Decode track `index`.
    ///
    /// Earlier tracks are skipped over, not decoded.
    pub fn track(&mut self, index: u16) -> Result<Track> {
        self.locate(index)?;
        tracing::debug!(track = index, offset = self.reader.position(), "located track");
        Ok(materialize(&mut self.reader, index)?)
    }

    /// The name of track `index`, as [`Track::name`] would report it.
    ///
    /// Only the first event of the track is decoded, so the rest of its body
    /// may be malformed.
    pub fn track_name(&mut self, index: u16) -> Result<Option<Vec<u8>>> {
        self.locate(index)?;
        Ok(peek_name(&mut self.reader, index)?)
    }

    /// Leave the reader at the chunk header of track `index`.
    fn locate(&mut self, index: u16) -> Result<()> {
        let count = self.header.tracks();
        if index >= count {
            return Err(Error::TrackIndex { index, count });
        }

        self.reader.seek_to(self.first_track_offset)?;
        for skipped in 0..index {
            if self.reader.is_at_end() {
                return Err(Error::TrackIndex {
                    index,
                    count: skipped,
                });
            }
            let header = TrackHeader::read(&mut self.reader, skipped)?;
            self.reader.skip(u64::from(header.size()))?;
        }
        if self.reader.is_at_end() {
            return Err(Error::TrackIndex { index, count: index });
        }
        Ok(())
    }

    /// Decode every declared track in file order.
    ///
    /// Tracks are read back to back without re-locating each one. The
    /// iterator stops after the first error.
    pub fn tracks(&mut self) -> Tracks<'_, R> {
        Tracks {
            file: self,
            next: 0,
            started: false,
            failed: false,
        }
    }

    /// The name of every track, in order. Unnamed tracks yield `None`.
    ///
    /// Only the first event of each track is decoded. Names that are not
    /// valid UTF-8 are converted lossily. Fails if any track cannot be
    /// located or its first event cannot be decoded.
    pub fn track_names(&mut self) -> Result<Vec<Option<String>>> {
        (0..self.track_count())
            .map(|index| {
                let name = self.track_name(index)?;
                Ok(name.map(|n| String::from_utf8_lossy(&n).into_owned()))
            })
            .collect()
    }

    /// Decode the first track named `name`.
    ///
    /// See [`Track::name`] for what counts as a track's name. Only the first
    /// event of the other tracks is read; a track whose name cannot be read
    /// is logged and passed over, so only the matching track has to decode
    /// cleanly.
    pub fn find_track(&mut self, name: &str) -> Result<Track> {
        for index in 0..self.track_count() {
            match self.track_name(index) {
                Ok(Some(found)) if found == name.as_bytes() => return self.track(index),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(track = index, %error, "skipping track with unreadable name");
                }
            }
        }
        Err(Error::TrackNotFound(name.to_owned()))
    }

    /// Close the file, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    /// Close the file, releasing the underlying stream.
    pub fn close(self) {}
}

/// An iterator returned from [`MidiFile::tracks`]
pub struct Tracks<'f, R> {
    file: &'f mut MidiFile<R>,
    next: u16,
    started: bool,
    failed: bool,
}

impl<R: Read + Seek> Iterator for Tracks<'_, R> {
    type Item = Result<Track>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.file.header.tracks() {
            return None;
        }
        let result = self.advance();
        self.failed = result.is_err();
        self.next += 1;
        Some(result)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = usize::from(self.file.header.tracks() - self.next);
        (0, Some(remaining))
    }
}

impl<R: Read + Seek> Tracks<'_, R> {
    fn advance(&mut self) -> Result<Track> {
        let reader = &mut self.file.reader;
        if !self.started {
            reader.seek_to(self.file.first_track_offset)?;
            self.started = true;
        }
        if reader.is_at_end() {
            return Err(Error::TrackIndex {
                index: self.next,
                count: self.next,
            });
        }
        Ok(materialize(reader, self.next)?)
    }
}
