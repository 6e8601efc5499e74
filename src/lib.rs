#![warn(missing_docs)]
#![doc = r#"
Random-access track extraction for Standard MIDI Files

# Overview

`midi-tracks` opens a MIDI file, decodes its header, and hands back any
single track as an in-memory list of time-stamped events without decoding
the tracks before it.

```text
MidiFile::open ─► Header (once)
      │
      └─ track(n) ─► skip n chunk headers ─► decode track n ─► Track
                                                                 │
                                             iter_start / has_next / next_event
```

# Example
```rust
# use midi_tracks::prelude::*;
# use std::io::Cursor;
let bytes: Vec<u8> = [
    &b"MThd\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60"[..],
    &b"MTrk\x00\x00\x00\x0C"[..],
    &[0x00, 0x90, 0x3C, 0x64, 0x60, 0x80, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00][..],
]
.concat();

let mut file = MidiFile::from_reader(Cursor::new(bytes)).unwrap();
let mut track = file.track(0).unwrap();

let mut notes = 0;
track.iter_start();
while track.has_next() {
    let event = track.next_event().unwrap();
    if event.command() == 0x9 || event.command() == 0x8 {
        notes += 1;
    }
}
assert_eq!(notes, 2);
```

# Standard documentation:

- [`midi.org`]
- [`somascape.org`]

[`midi.org`]: https://www.midi.org/specifications/item/table-1-summary-of-midi-message
[`somascape.org`]: http://www.somascape.org/midi/tech/mfile.html
"#]

mod error;
pub use error::*;

pub mod event;
pub mod export;
pub mod file;
pub mod reader;
pub mod track;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Error, ErrorCategory, FormatError, Result,
        event::{ChannelCommand, ChannelEvent, Event, EventKind, EventType, MetaEvent, MetaKind},
        export::{NoteRow, TargetMap},
        file::{Division, FormatType, Header, MidiFile, Timing, TrackHeader},
        track::{Ticked, Track},
    };
}
