mod common;

use midi_tracks::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn open_and_read_from_disk() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&common::beat_file()).unwrap();
    tmp.flush().unwrap();

    let mut file = MidiFile::open(tmp.path()).unwrap();
    assert_eq!(file.track_count(), 3);
    assert_eq!(file.header().format_type(), Some(FormatType::Simultaneous));
    assert_eq!(file.header().division().ticks_per_quarter_note(), Some(480));

    let conductor = file.track(0).unwrap();
    let tempo = conductor.events()[0].as_meta().unwrap();
    assert_eq!(tempo.kind(), MetaKind::Tempo);
    assert_eq!(tempo.tempo(), Some(500_000));

    assert!(file.track(2).unwrap().is_named("BEAT"));
    file.close();
}

#[test]
fn open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.mid");
    let err = MidiFile::open(&path).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
    assert!(matches!(&err, Error::Open { path: p, .. } if p == &path));
}

#[test]
fn open_non_midi_file() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(b"not a midi file at all").unwrap();
    tmp.flush().unwrap();

    let err = MidiFile::open(tmp.path()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
}
