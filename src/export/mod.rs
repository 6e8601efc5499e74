#![doc = r#"
Writing the notes of named tracks to text files

Each Note On and Note Off event becomes one line of
`absolute tick,key,velocity`, with ticks accumulated over every event of the
track, meta events included.

Tracks are matched by name after decoding only their first event. Only the
matched tracks are decoded in full, so a malformed track that no target names
does not stop the others from being written.
"#]

mod targets;
pub use targets::*;

use crate::{Error, Result, event::ChannelCommand, file::MidiFile, track::Track};
use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Read, Seek, Write},
    path::{Path, PathBuf},
};

/// One output line: a note event at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteRow {
    /// Absolute position in ticks
    pub tick: u64,
    /// First data byte, the key
    pub key: u8,
    /// Second data byte, the velocity
    pub velocity: u8,
}

impl fmt::Display for NoteRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.tick, self.key, self.velocity)
    }
}

/// The Note On and Note Off events of a track, in order.
pub fn note_rows(track: &Track) -> impl Iterator<Item = NoteRow> + '_ {
    track.ticked().filter_map(|ticked| {
        let channel = ticked.event().as_channel()?;
        match (channel.known_command()?, channel.data()) {
            (ChannelCommand::NoteOn | ChannelCommand::NoteOff, &[key, velocity]) => Some(NoteRow {
                tick: ticked.accumulated_ticks(),
                key,
                velocity,
            }),
            _ => None,
        }
    })
}

/// Write every note row of `track` as a line of `out`. Returns the row count.
pub fn write_note_rows<W: Write>(track: &Track, mut out: W) -> io::Result<usize> {
    let mut rows = 0;
    for row in note_rows(track) {
        writeln!(out, "{row}")?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

/// A track written out by [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// The matched track name
    pub name: String,
    /// Index of the track in the file
    pub track: u16,
    /// File the rows were written to
    pub path: PathBuf,
    /// Rows written
    pub rows: usize,
}

/// Write the notes of every track named in `targets` into `out_dir`.
///
/// Tracks are matched by [`Track::name`], read with
/// [`MidiFile::track_name`]. A track whose name cannot be read is logged and
/// skipped. A matched track is then decoded in full, and any failure to
/// decode or write it is returned. Targets with no matching track are
/// skipped; if none match at all, [`Error::TrackNotFound`] is returned.
pub fn extract<R: Read + Seek>(
    file: &mut MidiFile<R>,
    targets: &TargetMap,
    out_dir: &Path,
) -> Result<Vec<Extracted>> {
    let mut extracted = Vec::new();

    for index in 0..file.track_count() {
        let name = match file.track_name(index) {
            Ok(Some(name)) => String::from_utf8_lossy(&name).into_owned(),
            Ok(None) => continue,
            Err(error) => {
                tracing::warn!(track = index, %error, "skipping track with unreadable name");
                continue;
            }
        };
        let Some(target) = targets.get(&name) else {
            tracing::debug!(track = index, %name, "no target for track");
            continue;
        };

        let track = file.track(index)?;
        let path = out_dir.join(target);
        let rows = write_track(&track, &path)?;
        tracing::info!(track = index, %name, rows, path = %path.display(), "extracted track");
        extracted.push(Extracted {
            name,
            track: index,
            path,
            rows,
        });
    }

    for target in targets.iter() {
        if !extracted.iter().any(|e| e.name == target.name) {
            tracing::warn!(name = %target.name, "no track with this name");
        }
    }
    if extracted.is_empty() && !targets.is_empty() {
        let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
        return Err(Error::TrackNotFound(names.join(", ")));
    }
    Ok(extracted)
}

/// Write the note rows of a single track to `path`, creating or truncating it.
pub fn write_track(track: &Track, path: &Path) -> Result<usize> {
    let output = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(output)?;
    write_note_rows(track, BufWriter::new(file)).map_err(output)
}

#[cfg(test)]
fn beat_track() -> Track {
    use crate::{event::*, file::TrackHeader};
    let channel = |delta, command, key, velocity| {
        Event::new(
            delta,
            EventKind::Channel(ChannelEvent::new(command, 9, &[key, velocity])),
        )
    };
    Track::new(
        1,
        TrackHeader::new(0),
        vec![
            Event::new(0, EventKind::Meta(MetaEvent::new(0x03, b"BEAT".to_vec()))),
            channel(0, 0x9, 12, 100),
            channel(120, 0x8, 12, 0),
            Event::new(360, EventKind::Meta(MetaEvent::new(0x01, b"bar".to_vec()))),
            channel(0, 0x9, 13, 90),
            channel(120, 0x8, 13, 0),
            channel(0, 0xB, 64, 127),
            channel(0, 0xC, 5, 0),
        ],
    )
}

#[test]
fn rows_include_meta_deltas() {
    use pretty_assertions::assert_eq;
    let rows: Vec<NoteRow> = note_rows(&beat_track()).collect();
    assert_eq!(
        rows,
        vec![
            NoteRow {
                tick: 0,
                key: 12,
                velocity: 100
            },
            NoteRow {
                tick: 120,
                key: 12,
                velocity: 0
            },
            NoteRow {
                tick: 480,
                key: 13,
                velocity: 90
            },
            NoteRow {
                tick: 600,
                key: 13,
                velocity: 0
            },
        ]
    );
}

#[test]
fn rows_as_lines() {
    use pretty_assertions::assert_eq;
    let mut out = Vec::new();
    let rows = write_note_rows(&beat_track(), &mut out).unwrap();
    assert_eq!(rows, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0,12,100\n120,12,0\n480,13,90\n600,13,0\n"
    );
}
