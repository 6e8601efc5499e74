mod common;

use common::{TrackBytes, smf};
use midi_tracks::{export, prelude::*};
use pretty_assertions::assert_eq;
use std::io::Cursor;

#[test]
fn lookup_matches_only_the_leading_name() {
    let bytes = smf(&[
        TrackBytes::new().name("PART BASS").end(),
        // name arrives after a nonzero delta: never a match
        TrackBytes::new().meta(10, 0x03, b"PART GUITAR").end(),
        TrackBytes::new().name("PART GUITAR").note_on(0, 60, 100).end(),
        // first event is not the name
        TrackBytes::new().note_on(0, 60, 100).name("PART GUITAR").end(),
    ]);
    let mut file = MidiFile::from_reader(Cursor::new(bytes)).unwrap();

    let track = file.find_track("PART GUITAR").unwrap();
    assert_eq!(track.index(), 2);
    assert_eq!(track.name(), Some(&b"PART GUITAR"[..]));

    let names = file.track_names().unwrap();
    assert_eq!(
        names,
        vec![
            Some("PART BASS".to_owned()),
            None,
            Some("PART GUITAR".to_owned()),
            None
        ]
    );
}

#[test]
fn missing_name_is_not_found() {
    let mut file = MidiFile::from_reader(Cursor::new(common::beat_file())).unwrap();
    let err = file.find_track("PART VOCALS").unwrap_err();
    assert!(matches!(&err, Error::TrackNotFound(name) if name == "PART VOCALS"));
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn beat_track_rows() {
    let bytes = smf(&[
        TrackBytes::new().meta(0, 0x51, &[0x07, 0xA1, 0x20]).end(),
        TrackBytes::new()
            .name("BEAT")
            .note_on(0, 36, 100)
            .note_off(480, 36)
            .end(),
    ]);
    let mut file = MidiFile::from_reader(Cursor::new(bytes)).unwrap();
    let track = file.find_track("BEAT").unwrap();

    let rows: Vec<NoteRow> = export::note_rows(&track).collect();
    assert_eq!(
        rows,
        vec![
            NoteRow {
                tick: 0,
                key: 36,
                velocity: 100
            },
            NoteRow {
                tick: 480,
                key: 36,
                velocity: 0
            },
        ]
    );
}

#[test]
fn cursor_traversal_accumulates_ticks() {
    let mut file = MidiFile::from_reader(Cursor::new(common::beat_file())).unwrap();
    let mut track = file.track(2).unwrap();

    for _ in 0..2 {
        let mut absolute = 0u64;
        let mut lines = Vec::new();
        track.iter_start();
        while track.has_next() {
            let event = track.next_event().unwrap();
            absolute += u64::from(event.delta_ticks());
            if event.event_type() == EventType::Channel && matches!(event.command(), 0x8 | 0x9) {
                lines.push(format!("{},{},{}", absolute, event.data()[0], event.data()[1]));
            }
        }
        assert_eq!(lines, ["0,12,100", "120,12,0", "480,13,90", "600,13,0"]);
    }
}

#[test]
fn extract_writes_named_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = MidiFile::from_reader(Cursor::new(common::beat_file())).unwrap();

    let extracted = export::extract(&mut file, &TargetMap::default(), dir.path()).unwrap();
    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0].name, "BEAT");
    assert_eq!(extracted[0].track, 2);
    assert_eq!(extracted[0].rows, 4);

    let written = std::fs::read_to_string(dir.path().join("beat.txt")).unwrap();
    assert_eq!(written, "0,12,100\n120,12,0\n480,13,90\n600,13,0\n");
}

#[test]
fn extract_with_no_matching_target() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = MidiFile::from_reader(Cursor::new(common::beat_file())).unwrap();

    let mut targets = TargetMap::empty();
    targets.insert("PART KEYS", "keys.txt");
    let err = export::extract(&mut file, &targets, dir.path()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(!dir.path().join("keys.txt").exists());
}

#[test]
fn extract_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = MidiFile::from_reader(Cursor::new(common::beat_file())).unwrap();

    let err = export::extract(&mut file, &TargetMap::default(), &dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
    assert_eq!(err.category(), ErrorCategory::Io);
}

/// Track 0 holds a data byte with no running status; track 1 is a valid "BEAT".
fn corrupt_then_beat() -> Vec<u8> {
    smf(&[
        TrackBytes::new().raw(0, &[0x3C, 0x20]).end(),
        TrackBytes::new()
            .name("BEAT")
            .note_on(0, 36, 100)
            .note_off(480, 36)
            .end(),
    ])
}

#[test]
fn lookup_passes_over_a_corrupt_track() {
    let mut file = MidiFile::from_reader(Cursor::new(corrupt_then_beat())).unwrap();
    assert_eq!(
        file.track(0).unwrap_err().format_error(),
        Some(FormatError::NoRunningStatus(0x3C))
    );

    assert_eq!(file.track_name(1).unwrap(), Some(b"BEAT".to_vec()));
    let track = file.find_track("BEAT").unwrap();
    assert_eq!(track.index(), 1);
    assert_eq!(track.len(), 4);

    // listing every name still needs every first event
    assert!(file.track_names().is_err());
}

#[test]
fn extract_skips_a_corrupt_untargeted_track() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = MidiFile::from_reader(Cursor::new(corrupt_then_beat())).unwrap();

    let extracted = export::extract(&mut file, &TargetMap::default(), dir.path()).unwrap();
    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0].track, 1);
    assert_eq!(extracted[0].rows, 2);

    let written = std::fs::read_to_string(dir.path().join("beat.txt")).unwrap();
    assert_eq!(written, "0,36,100\n480,36,0\n");
}

#[test]
fn extract_fails_on_a_corrupt_targeted_track() {
    let dir = tempfile::tempdir().unwrap();
    // named "BEAT", but the body breaks after the name
    let bytes = smf(&[TrackBytes::new().name("BEAT").raw(0, &[0x3C, 0x20])]);
    let mut file = MidiFile::from_reader(Cursor::new(bytes)).unwrap();

    let err = export::extract(&mut file, &TargetMap::default(), dir.path()).unwrap_err();
    assert_eq!(err.format_error(), Some(FormatError::NoRunningStatus(0x3C)));
    assert!(!dir.path().join("beat.txt").exists());
}
