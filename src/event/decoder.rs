use super::{ChannelEvent, Event, EventKind, MetaEvent, data_len};
use crate::{
    FormatError,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
};
use std::io::{Read, Seek};

/// Status byte introducing a meta event.
pub const META_STATUS: u8 = 0xFF;

/// An [`Event`] along with the number of bytes it occupied on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The decoded event
    pub event: Event,
    /// Delta-time, status and data bytes consumed
    pub consumed: usize,
}

#[doc = r#"
Decodes track events one at a time, carrying running status between them.

A channel event may omit its status byte when it repeats the previous
channel event's command. The decoder remembers the last command nibble it saw
so such events can be completed. Running status never crosses a track
boundary: create one decoder per track, or call [`EventDecoder::reset`].

# Example
```rust
# use midi_tracks::{event::EventDecoder, reader::Reader};
# use std::io::Cursor;
// Note On, then a second Note On relying on running status
let bytes = [0x00, 0x90, 0x40, 0x7F, 0x10, 0x3C, 0x20];
let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
let mut decoder = EventDecoder::new();

let first = decoder.decode(&mut reader).unwrap();
assert_eq!(first.consumed, 4);

let second = decoder.decode(&mut reader).unwrap();
assert_eq!(second.event.command(), 0x9);
assert_eq!(second.event.data(), &[0x3C, 0x20]);
assert_eq!(second.consumed, 3);
```
"#]
#[derive(Debug, Default, Clone)]
pub struct EventDecoder {
    running_status: Option<u8>,
}

impl EventDecoder {
    /// A decoder with no running status.
    pub const fn new() -> Self {
        Self {
            running_status: None,
        }
    }

    /// The command nibble that a status-less channel event would reuse.
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// Forget the running status.
    pub fn reset(&mut self) {
        self.running_status = None;
    }

    /// Decode the event starting at the reader's position.
    pub fn decode<R: Read + Seek>(&mut self, reader: &mut Reader<R>) -> ReadResult<Decoded> {
        let (delta_ticks, vlq_len) = reader.read_vlq()?;
        let status_at = reader.position();
        let status = reader.read_byte()?;

        let (kind, body_len) = if status == META_STATUS {
            Self::decode_meta(reader)?
        } else {
            self.decode_channel(reader, status, status_at)?
        };

        let decoded = Decoded {
            event: Event::new(delta_ticks, kind),
            consumed: vlq_len + 1 + body_len,
        };
        tracing::trace!(
            at = status_at,
            delta_ticks,
            command = decoded.event.command(),
            consumed = decoded.consumed,
            "decoded event"
        );
        Ok(decoded)
    }

    fn decode_meta<R: Read + Seek>(reader: &mut Reader<R>) -> ReadResult<(EventKind, usize)> {
        let command = reader.read_byte()?;
        let len = usize::from(reader.read_byte()?);

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| reader.error(ReaderErrorKind::OutOfMemory(len)))?;
        data.resize(len, 0);
        reader.read_into(&mut data)?;

        Ok((EventKind::Meta(MetaEvent::new(command, data)), 2 + len))
    }

    fn decode_channel<R: Read + Seek>(
        &mut self,
        reader: &mut Reader<R>,
        status: u8,
        status_at: u64,
    ) -> ReadResult<(EventKind, usize)> {
        let mut args = [0u8; 2];
        let mut argc = 0;

        let command = if status & 0x80 != 0 {
            let command = status >> 4;
            self.running_status = Some(command);
            command
        } else {
            // no status byte on the wire: this is already the first argument
            let Some(command) = self.running_status else {
                return Err(ReaderError::format(
                    status_at,
                    FormatError::NoRunningStatus(status),
                ));
            };
            args[0] = status;
            argc = 1;
            command
        };
        // taken from the byte read, even under running status
        let channel = status & 0x0F;

        let argn = data_len(command);
        let mut read = 0;
        while argc < argn {
            args[argc] = reader.read_byte()?;
            argc += 1;
            read += 1;
        }

        Ok((
            EventKind::Channel(ChannelEvent::new(command, channel, &args[..argn])),
            read,
        ))
    }
}

#[cfg(test)]
fn decoder_over(bytes: &[u8]) -> (EventDecoder, Reader<std::io::Cursor<Vec<u8>>>) {
    let reader = Reader::new(std::io::Cursor::new(bytes.to_vec())).unwrap();
    (EventDecoder::new(), reader)
}

#[test]
fn note_on_then_running_status() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0x90, 0x40, 0x7F, 0x00, 0x3C, 0x20]);

    let first = decoder.decode(&mut reader).unwrap();
    assert_eq!(first.consumed, 4);
    assert_eq!(first.event.command(), 0x9);
    assert_eq!(first.event.channel(), 0);
    assert_eq!(first.event.data(), &[0x40, 0x7F]);
    assert_eq!(decoder.running_status(), Some(0x9));

    let second = decoder.decode(&mut reader).unwrap();
    // one delta-time byte plus the two data bytes
    assert_eq!(second.consumed, 3);
    assert_eq!(second.event.command(), 0x9);
    assert_eq!(second.event.data(), &[0x3C, 0x20]);
    assert!(reader.is_at_end());
}

#[test]
fn program_change_takes_one_argument() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0xC5, 0x19, 0x00, 0x90, 0x3C, 0x40]);

    let program = decoder.decode(&mut reader).unwrap();
    assert_eq!(program.consumed, 3);
    assert_eq!(program.event.command(), 0xC);
    assert_eq!(program.event.channel(), 5);
    assert_eq!(program.event.data(), &[0x19]);

    // the next event starts right after the single argument
    let note = decoder.decode(&mut reader).unwrap();
    assert_eq!(note.event.command(), 0x9);
    assert_eq!(note.event.data(), &[0x3C, 0x40]);
}

#[test]
fn channel_pressure_under_running_status() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0xD0, 0x30, 0x05, 0x40]);
    decoder.decode(&mut reader).unwrap();

    let second = decoder.decode(&mut reader).unwrap();
    assert_eq!(second.consumed, 2);
    assert_eq!(second.event.command(), 0xD);
    assert_eq!(second.event.data(), &[0x40]);
}

#[test]
fn meta_event_payload() {
    use pretty_assertions::assert_eq;
    let mut bytes = vec![0x00, 0xFF, 0x03, 0x0B];
    bytes.extend_from_slice(b"PART GUITAR");
    let (mut decoder, mut reader) = decoder_over(&bytes);

    let decoded = decoder.decode(&mut reader).unwrap();
    assert_eq!(decoded.consumed, 15);
    assert_eq!(decoded.event.command(), 0x03);
    assert_eq!(decoded.event.channel(), 0);
    assert_eq!(decoded.event.data(), b"PART GUITAR");
    assert_eq!(decoder.running_status(), None);
}

#[test]
fn unknown_meta_passes_through() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x83, 0x60, 0xFF, 0x6A, 0x02, 0xAB, 0xCD]);
    let decoded = decoder.decode(&mut reader).unwrap();
    assert_eq!(decoded.event.delta_ticks(), 480);
    assert_eq!(decoded.event.command(), 0x6A);
    assert_eq!(decoded.event.data(), &[0xAB, 0xCD]);
    assert_eq!(decoded.consumed, 7);
}

#[test]
fn meta_event_keeps_running_status() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) =
        decoder_over(&[0x00, 0x80, 0x40, 0x00, 0x00, 0xFF, 0x2F, 0x00, 0x00, 0x41, 0x00]);
    decoder.decode(&mut reader).unwrap();
    decoder.decode(&mut reader).unwrap();
    let after = decoder.decode(&mut reader).unwrap();
    assert_eq!(after.event.command(), 0x8);
    assert_eq!(after.event.data(), &[0x41, 0x00]);
}

#[test]
fn data_byte_without_running_status() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0x3C, 0x20]);
    let err = decoder.decode(&mut reader).unwrap_err();
    assert_eq!(err.position(), 1);
    assert!(matches!(
        err.error_kind(),
        ReaderErrorKind::Format(FormatError::NoRunningStatus(0x3C))
    ));
}

#[test]
fn reset_clears_running_status() {
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0x90, 0x40, 0x7F, 0x00, 0x3C, 0x20]);
    decoder.decode(&mut reader).unwrap();
    decoder.reset();
    assert!(decoder.decode(&mut reader).is_err());
}

#[test]
fn unnamed_status_nibble_is_accepted() {
    use pretty_assertions::assert_eq;
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0xF1, 0x01, 0x02]);
    let decoded = decoder.decode(&mut reader).unwrap();
    assert_eq!(decoded.event.command(), 0xF);
    assert_eq!(decoded.event.channel(), 1);
    assert_eq!(decoded.event.as_channel().unwrap().known_command(), None);
}

#[test]
fn truncated_event_is_an_error() {
    let (mut decoder, mut reader) = decoder_over(&[0x00, 0x90, 0x40]);
    let err = decoder.decode(&mut reader).unwrap_err();
    assert!(err.is_out_of_bounds());

    let (mut decoder, mut reader) = decoder_over(&[0x00, 0xFF, 0x01, 0x05, b'a']);
    let err = decoder.decode(&mut reader).unwrap_err();
    assert!(err.is_out_of_bounds());
}
