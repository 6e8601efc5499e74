mod common;

use common::{TrackBytes, header, smf};
use midi_tracks::{prelude::*, reader::ReaderErrorKind};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn open(bytes: Vec<u8>) -> Result<MidiFile<Cursor<Vec<u8>>>> {
    MidiFile::from_reader(Cursor::new(bytes))
}

#[test]
fn header_fields_and_first_track_offset() {
    let file = open(header(1, 4, 0x60)).unwrap();
    let header = file.header();
    assert_eq!(header.format(), 1);
    assert_eq!(header.tracks(), 4);
    assert_eq!(header.division().raw(), 96);
    // declared size 6: nothing to skip
    assert_eq!(file.first_track_offset(), 14);
}

#[test]
fn header_extension_is_skipped() {
    let mut bytes = b"MThd\x00\x00\x00\x0A\x00\x00\x00\x01\x00\x60".to_vec();
    bytes.extend([0xDE, 0xAD, 0xBE, 0xEF]);
    bytes.extend(TrackBytes::new().note_on(0, 60, 1).end().chunk());

    let mut file = open(bytes).unwrap();
    assert_eq!(file.header().extension_len(), 4);
    assert_eq!(file.first_track_offset(), 18);
    assert_eq!(file.track(0).unwrap().len(), 2);
}

#[test]
fn header_extension_past_end_of_file() {
    let bytes = b"MThd\x00\x00\x00\x10\x00\x00\x00\x01\x00\x60".to_vec();
    let err = open(bytes).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
}

#[test]
fn bad_magic_gives_no_handle() {
    let mut bytes = header(1, 1, 96);
    bytes[..4].copy_from_slice(b"RIFF");
    let err = open(bytes).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
    assert_eq!(err.format_error(), Some(FormatError::HeaderMagic(*b"RIFF")));
}

#[test]
fn short_header_is_a_format_error() {
    let err = open(b"MThd\x00\x00\x00\x06\x00".to_vec()).unwrap_err();
    assert_eq!(err.format_error(), Some(FormatError::HeaderTruncated(9)));

    let err = open(Vec::new()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Format);
}

#[test]
fn tracks_in_any_order_and_repeatedly() {
    let mut file = open(smf(&[
        TrackBytes::new().name("zero").end(),
        TrackBytes::new().name("one").note_on(0, 60, 100).end(),
        TrackBytes::new().name("two").note_on(0, 60, 100).note_off(10, 60).end(),
    ]))
    .unwrap();

    for index in [2, 0, 1, 2, 2, 0] {
        let track = file.track(index).unwrap();
        assert_eq!(track.index(), index);
        assert_eq!(track.len(), usize::from(index) + 2);
    }
}

#[test]
fn index_beyond_declared_count() {
    let mut file = open(smf(&[TrackBytes::new().end()])).unwrap();
    let err = file.track(1).unwrap_err();
    assert!(matches!(err, Error::TrackIndex { index: 1, count: 1 }));
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn stream_ends_before_declared_tracks() {
    // header promises three tracks, only one is present
    let mut bytes = header(1, 3, 96);
    bytes.extend(TrackBytes::new().end().chunk());
    let mut file = open(bytes).unwrap();

    assert!(file.track(0).is_ok());
    let err = file.track(2).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    let err = file.track(1).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn bad_magic_on_skipped_track() {
    let mut bytes = smf(&[TrackBytes::new().end(), TrackBytes::new().end()]);
    bytes[14..18].copy_from_slice(b"XTrk");
    let mut file = open(bytes).unwrap();

    let err = file.track(1).unwrap_err();
    assert_eq!(
        err.format_error(),
        Some(FormatError::TrackMagic {
            index: 0,
            magic: *b"XTrk"
        })
    );
}

#[test]
fn running_status_across_a_track() {
    let body = TrackBytes::new()
        .raw(0, &[0x90, 0x40, 0x7F])
        .raw(0, &[0x3C, 0x20])
        .raw(0, &[0x3E, 0x00]);
    let mut file = open(smf(&[body])).unwrap();
    let track = file.track(0).unwrap();

    let events = track.events();
    assert_eq!(events.len(), 3);
    for event in events {
        assert_eq!(event.command(), 0x9);
    }
    assert_eq!(events[1].data(), &[0x3C, 0x20]);
    assert_eq!(events[2].data(), &[0x3E, 0x00]);
}

#[test]
fn running_status_resets_for_each_track() {
    let mut file = open(smf(&[
        TrackBytes::new().note_on(0, 60, 100),
        TrackBytes::new().raw(0, &[0x3C, 0x20]),
    ]))
    .unwrap();
    file.track(0).unwrap();
    let err = file.track(1).unwrap_err();
    assert_eq!(err.format_error(), Some(FormatError::NoRunningStatus(0x3C)));
}

#[test]
fn program_change_has_one_data_byte() {
    let body = TrackBytes::new()
        .raw(0, &[0xC3, 0x19])
        .raw(0, &[0x1A])
        .note_on(0, 60, 100);
    let mut file = open(smf(&[body])).unwrap();
    let track = file.track(0).unwrap();

    let events = track.events();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].command(), 0xC);
    assert_eq!(events[0].channel(), 3);
    assert_eq!(events[0].data(), &[0x19]);
    assert_eq!(events[1].data(), &[0x1A]);
    assert_eq!(events[2].data(), &[60, 100]);
}

#[test]
fn track_length_is_the_only_terminator() {
    // no end-of-track event; decoding stops at exactly the declared length
    let track = TrackBytes::new().note_on(0, 60, 100).note_off(100, 60);
    let mut bytes = smf(&[track]);
    // trailing garbage that would fail to decode
    bytes.extend([0x00, 0x3C]);

    let mut file = open(bytes).unwrap();
    let track = file.track(0).unwrap();
    assert_eq!(track.len(), 2);
    assert_eq!(track.header().size(), 8);
}

#[test]
fn truncated_track_body() {
    let mut bytes = header(0, 1, 96);
    bytes.extend(b"MTrk\x00\x00\x00\x10");
    bytes.extend([0x00, 0x90, 0x3C]);
    let mut file = open(bytes).unwrap();

    let err = file.track(0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
    let Error::Read(read) = &err else {
        panic!("expected a read error, got {err:?}");
    };
    assert!(matches!(read.error_kind(), ReaderErrorKind::Io(_)));
}

#[test]
fn sequential_tracks_survive_overrun() {
    // track 0 declares 2 bytes, so its Note On takes its data bytes from
    // the magic of the next chunk
    let mut bytes = header(1, 2, 96);
    bytes.extend(b"MTrk\x00\x00\x00\x02");
    bytes.extend([0x00, 0x90]);
    bytes.extend(TrackBytes::new().name("next").end().chunk());
    let mut file = open(bytes).unwrap();

    let mut tracks = file.tracks();
    let first = tracks.next().unwrap().unwrap();
    assert_eq!(first.events()[0].data(), b"MT");
    let second = tracks.next().unwrap().unwrap();
    assert!(second.is_named("next"));
    assert!(tracks.next().is_none());
}

#[test]
fn sequential_iteration_matches_random_access() {
    let mut file = open(common::beat_file()).unwrap();
    let all: Vec<Track> = file.tracks().collect::<Result<_>>().unwrap();
    assert_eq!(all.len(), 3);
    for track in &all {
        assert_eq!(&file.track(track.index()).unwrap(), track);
    }
}
