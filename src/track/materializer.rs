use super::Track;
use crate::{
    event::{Decoded, Event, EventDecoder, EventKind, MetaKind},
    file::TrackHeader,
    reader::{ReadResult, Reader, ReaderErrorKind},
};
use std::io::{Read, Seek};

/// Read the track chunk at the reader's position and decode its whole body.
///
/// Decoding stops once the consumed byte count reaches the declared body
/// size. The reader is then placed at the declared end of the body, so the
/// next chunk is found even if the last event ran past it.
pub(crate) fn materialize<R: Read + Seek>(reader: &mut Reader<R>, index: u16) -> ReadResult<Track> {
    let header = TrackHeader::read(reader, index)?;
    let body_start = reader.position();
    let size = u64::from(header.size());

    let mut decoder = EventDecoder::new();
    let mut events: Vec<Event> = Vec::new();
    let mut consumed = 0u64;

    while consumed < size {
        events
            .try_reserve(1)
            .map_err(|_| reader.error(ReaderErrorKind::OutOfMemory(size_of::<Event>())))?;
        let Decoded { event, consumed: n } = decoder.decode(reader)?;
        consumed += n as u64;
        events.push(event);
    }

    if consumed != size {
        tracing::warn!(
            track = index,
            declared = size,
            consumed,
            "track body overran its declared size, resynchronizing"
        );
    }
    reader.seek_to(body_start + size)?;

    tracing::debug!(track = index, events = events.len(), bytes = size, "materialized track");
    Ok(Track::new(index, header, events))
}

/// Read the track chunk at the reader's position and decode only its first
/// event, returning the track name it carries.
///
/// The name follows the rules of [`Track::name`]. The rest of the body is
/// never decoded; the reader is left at the declared end of the body.
pub(crate) fn peek_name<R: Read + Seek>(
    reader: &mut Reader<R>,
    index: u16,
) -> ReadResult<Option<Vec<u8>>> {
    let header = TrackHeader::read(reader, index)?;
    let body_end = reader.position() + u64::from(header.size());
    if header.size() == 0 {
        return Ok(None);
    }

    let Decoded { event, .. } = EventDecoder::new().decode(reader)?;
    reader.seek_to(body_end)?;
    if event.delta_ticks() != 0 {
        return Ok(None);
    }
    Ok(match event.into_kind() {
        EventKind::Meta(meta) if meta.kind() == MetaKind::TrackName => Some(meta.into_data()),
        _ => None,
    })
}

#[cfg(test)]
fn chunk(body: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

#[test]
fn stops_at_declared_size() {
    use pretty_assertions::assert_eq;
    let body = [
        0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut bytes = chunk(&body);
    // garbage after the body must never be read as an event
    bytes.extend_from_slice(&[0x3C, 0x3C]);
    let mut reader = Reader::new(std::io::Cursor::new(bytes)).unwrap();

    let track = materialize(&mut reader, 0).unwrap();
    assert_eq!(track.len(), 3);
    assert_eq!(track.header().size(), 12);
    assert_eq!(reader.position(), 20);
}

#[test]
fn empty_body_has_no_events() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(std::io::Cursor::new(chunk(&[]))).unwrap();
    let track = materialize(&mut reader, 0).unwrap();
    assert!(track.is_empty());
    assert_eq!(reader.position(), 8);
}

#[test]
fn overrun_is_resynchronized() {
    use pretty_assertions::assert_eq;
    // declares 2 bytes, but the Note On inside needs 4
    let mut bytes = b"MTrk\x00\x00\x00\x02".to_vec();
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64]);
    let mut reader = Reader::new(std::io::Cursor::new(bytes)).unwrap();

    let track = materialize(&mut reader, 0).unwrap();
    assert_eq!(track.len(), 1);
    assert_eq!(reader.position(), 10);
}

#[test]
fn truncated_body_fails() {
    let mut bytes = b"MTrk\x00\x00\x00\x08".to_vec();
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x64, 0x00]);
    let mut reader = Reader::new(std::io::Cursor::new(bytes)).unwrap();
    let err = materialize(&mut reader, 0).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn running_status_does_not_leak_between_tracks() {
    let mut bytes = chunk(&[0x00, 0x90, 0x3C, 0x64]);
    bytes.extend(chunk(&[0x00, 0x3C, 0x00]));
    let mut reader = Reader::new(std::io::Cursor::new(bytes)).unwrap();

    materialize(&mut reader, 0).unwrap();
    let err = materialize(&mut reader, 1).unwrap_err();
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Format(crate::FormatError::NoRunningStatus(0x3C))
    ));
}

#[test]
fn peek_reads_only_the_leading_name() {
    use pretty_assertions::assert_eq;
    // the body breaks after the name: no running status for 0x3C
    let mut bytes = chunk(&[0x00, 0xFF, 0x03, 0x04, b'B', b'E', b'A', b'T', 0x00, 0x3C, 0x20]);
    bytes.extend(chunk(&[0x05, 0xFF, 0x03, 0x01, b'x']));
    bytes.extend(chunk(&[]));
    let mut reader = Reader::new(std::io::Cursor::new(bytes)).unwrap();

    assert_eq!(peek_name(&mut reader, 0).unwrap(), Some(b"BEAT".to_vec()));
    assert_eq!(reader.position(), 19);
    assert_eq!(peek_name(&mut reader, 1).unwrap(), None);
    assert_eq!(peek_name(&mut reader, 2).unwrap(), None);
    assert!(reader.is_at_end());
}
