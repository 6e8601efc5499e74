#![doc = r#"
Decoded track events

# Overview

Every event in a track body starts with a delta-time, followed by either a
channel message or a meta event:

```text
<delta-time> 8n..En <1 or 2 data bytes>        channel event
<delta-time> <data byte> [data byte]            channel event, running status
<delta-time> FF <type> <len> <len bytes>         meta event
```

[`EventDecoder`] turns these bytes into [`Event`]s, one at a time.
"#]

mod command;
pub use command::*;

mod decoder;
pub use decoder::*;

use std::borrow::Cow;

/// Which of the two event shapes an [`Event`] has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventType {
    /// A channel message
    Channel,
    /// A meta event
    Meta,
}

#[doc = r#"
One decoded track event together with its delta-time.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    delta_ticks: u32,
    kind: EventKind,
}

/// The body of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A channel message
    Channel(ChannelEvent),
    /// A meta event
    Meta(MetaEvent),
}

impl Event {
    /// Create a new event
    pub const fn new(delta_ticks: u32, kind: EventKind) -> Self {
        Self { delta_ticks, kind }
    }

    /// Ticks since the previous event of the same track.
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// The event body
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Consume the event, returning its body
    pub fn into_kind(self) -> EventKind {
        self.kind
    }

    /// Channel or meta
    pub const fn event_type(&self) -> EventType {
        match self.kind {
            EventKind::Channel(_) => EventType::Channel,
            EventKind::Meta(_) => EventType::Meta,
        }
    }

    /// The command nibble of a channel event, or the type byte of a meta event.
    pub const fn command(&self) -> u8 {
        match &self.kind {
            EventKind::Channel(c) => c.command(),
            EventKind::Meta(m) => m.command(),
        }
    }

    /// The channel of a channel event. Meta events report 0.
    pub const fn channel(&self) -> u8 {
        match &self.kind {
            EventKind::Channel(c) => c.channel(),
            EventKind::Meta(_) => 0,
        }
    }

    /// The data bytes of the event.
    pub fn data(&self) -> &[u8] {
        match &self.kind {
            EventKind::Channel(c) => c.data(),
            EventKind::Meta(m) => m.data(),
        }
    }

    /// Number of data bytes.
    pub fn size(&self) -> usize {
        self.data().len()
    }

    /// Returns the channel event, if this is one.
    pub const fn as_channel(&self) -> Option<&ChannelEvent> {
        match &self.kind {
            EventKind::Channel(c) => Some(c),
            EventKind::Meta(_) => None,
        }
    }

    /// Returns the meta event, if this is one.
    pub const fn as_meta(&self) -> Option<&MetaEvent> {
        match &self.kind {
            EventKind::Meta(m) => Some(m),
            EventKind::Channel(_) => None,
        }
    }
}

#[doc = r#"
A channel message: a command nibble, a channel nibble and one or two data bytes.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    command: u8,
    channel: u8,
    data: [u8; 2],
    len: u8,
}

impl ChannelEvent {
    /// Create a new channel event.
    ///
    /// `data` holds one or two bytes; any extra bytes are ignored.
    pub fn new(command: u8, channel: u8, data: &[u8]) -> Self {
        let len = data.len().min(2);
        let mut buf = [0; 2];
        buf[..len].copy_from_slice(&data[..len]);
        Self {
            command: command & 0x0F,
            channel: channel & 0x0F,
            data: buf,
            len: len as u8,
        }
    }

    /// The command nibble (`0x8..=0xF`).
    pub const fn command(&self) -> u8 {
        self.command
    }

    /// The command, if it names a standard channel message.
    pub fn known_command(&self) -> Option<ChannelCommand> {
        ChannelCommand::try_from(self.command).ok()
    }

    /// The channel nibble (`0..=15`).
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The data bytes carried by the message.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// True for Note On and Note Off.
    pub fn is_note(&self) -> bool {
        matches!(
            self.known_command(),
            Some(ChannelCommand::NoteOn | ChannelCommand::NoteOff)
        )
    }
}

#[doc = r#"
A meta event: a type byte and an opaque payload.

The type is never validated; unknown types decode like any other.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaEvent {
    command: u8,
    data: Vec<u8>,
}

impl MetaEvent {
    /// Create a new meta event
    pub const fn new(command: u8, data: Vec<u8>) -> Self {
        Self { command, data }
    }

    /// The type byte following `0xFF`.
    pub const fn command(&self) -> u8 {
        self.command
    }

    /// The type, named where the standard defines it.
    pub fn kind(&self) -> MetaKind {
        MetaKind::from(self.command)
    }

    /// The payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the event, returning its payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The payload as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Microseconds per quarter note, for a well-formed tempo event.
    pub fn tempo(&self) -> Option<u32> {
        match (self.kind(), self.data.as_slice()) {
            (MetaKind::Tempo, &[a, b, c]) => Some(u32::from_be_bytes([0, a, b, c])),
            _ => None,
        }
    }
}

#[test]
fn channel_event_accessors() {
    use pretty_assertions::assert_eq;
    let event = Event::new(96, EventKind::Channel(ChannelEvent::new(0x9, 3, &[60, 100])));
    assert_eq!(event.delta_ticks(), 96);
    assert_eq!(event.event_type(), EventType::Channel);
    assert_eq!(event.command(), 0x9);
    assert_eq!(event.channel(), 3);
    assert_eq!(event.data(), &[60, 100]);
    assert_eq!(event.size(), 2);
    assert!(event.as_channel().unwrap().is_note());
    assert!(event.as_meta().is_none());
}

#[test]
fn meta_event_accessors() {
    use pretty_assertions::assert_eq;
    let event = Event::new(
        0,
        EventKind::Meta(MetaEvent::new(0x03, b"PART GUITAR".to_vec())),
    );
    assert_eq!(event.event_type(), EventType::Meta);
    assert_eq!(event.channel(), 0);
    assert_eq!(event.size(), 11);

    let meta = event.as_meta().unwrap();
    assert_eq!(meta.kind(), MetaKind::TrackName);
    assert_eq!(meta.text(), "PART GUITAR");
}

#[test]
fn tempo_payload() {
    use pretty_assertions::assert_eq;
    let tempo = MetaEvent::new(0x51, vec![0x07, 0xA1, 0x20]);
    assert_eq!(tempo.tempo(), Some(500_000));
    assert_eq!(MetaEvent::new(0x51, vec![0x07]).tempo(), None);
    assert_eq!(MetaEvent::new(0x01, vec![0x07, 0xA1, 0x20]).tempo(), None);
}
