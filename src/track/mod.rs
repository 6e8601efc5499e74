#![doc = r#"
Materialized tracks

A [`Track`] owns every event of one track chunk, decoded in file order.
It carries a cursor for step-by-step traversal and can be walked again after
[`Track::iter_start`]. Dropping the track releases all of its events.
"#]

mod materializer;
pub(crate) use materializer::*;

use crate::{
    event::{Event, MetaKind},
    file::TrackHeader,
};

/// The decoded events of one track chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    index: u16,
    header: TrackHeader,
    events: Vec<Event>,
    cursor: usize,
}

impl Track {
    /// Build a track from events already decoded.
    pub fn new(index: u16, header: TrackHeader, events: Vec<Event>) -> Self {
        Self {
            index,
            header,
            events,
            cursor: 0,
        }
    }

    /// Zero-based position of the track in its file.
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// The chunk header this track was read from.
    pub const fn header(&self) -> &TrackHeader {
        &self.header
    }

    /// Number of events in the track
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in file order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Move the cursor back to the first event.
    pub fn iter_start(&mut self) {
        self.cursor = 0;
    }

    /// True while the cursor points at an event.
    pub fn has_next(&self) -> bool {
        self.cursor < self.events.len()
    }

    /// Returns the event under the cursor and advances past it.
    pub fn next_event(&mut self) -> Option<&Event> {
        let event = self.events.get(self.cursor)?;
        self.cursor += 1;
        Some(event)
    }

    /// Iterate the events with their absolute tick positions.
    ///
    /// Independent of the cursor.
    pub fn ticked(&self) -> TickedIter<'_> {
        TickedIter {
            accumulated_ticks: 0,
            events: self.events.iter(),
        }
    }

    /// The track name, if the first event is a delta-0 track name meta event.
    ///
    /// A name appearing later, or after any nonzero delta-time, does not count.
    pub fn name(&self) -> Option<&[u8]> {
        let first = self.events.first()?;
        if first.delta_ticks() != 0 {
            return None;
        }
        let meta = first.as_meta()?;
        (meta.kind() == MetaKind::TrackName).then(|| meta.data())
    }

    /// True if [`Track::name`] equals `name` exactly.
    pub fn is_named(&self, name: &str) -> bool {
        self.name() == Some(name.as_bytes())
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Event;
    type IntoIter = core::slice::Iter<'a, Event>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// An event paired with its absolute position in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticked<'a> {
    accumulated_ticks: u64,
    event: &'a Event,
}

impl<'a> Ticked<'a> {
    /// Sum of every delta-time up to and including this event.
    pub const fn accumulated_ticks(&self) -> u64 {
        self.accumulated_ticks
    }

    /// The event
    pub const fn event(&self) -> &'a Event {
        self.event
    }
}

/// An iterator returned from [`Track::ticked`]
pub struct TickedIter<'a> {
    accumulated_ticks: u64,
    events: core::slice::Iter<'a, Event>,
}

impl<'a> Iterator for TickedIter<'a> {
    type Item = Ticked<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        self.accumulated_ticks += u64::from(event.delta_ticks());
        Some(Ticked {
            accumulated_ticks: self.accumulated_ticks,
            event,
        })
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

impl ExactSizeIterator for TickedIter<'_> {}

#[cfg(test)]
fn note(delta: u32, command: u8, key: u8, velocity: u8) -> Event {
    use crate::event::{ChannelEvent, EventKind};
    Event::new(delta, EventKind::Channel(ChannelEvent::new(command, 0, &[key, velocity])))
}

#[cfg(test)]
fn meta(delta: u32, command: u8, data: &[u8]) -> Event {
    use crate::event::{EventKind, MetaEvent};
    Event::new(delta, EventKind::Meta(MetaEvent::new(command, data.to_vec())))
}

#[test]
fn cursor_walks_and_restarts() {
    use pretty_assertions::assert_eq;
    let mut track = Track::new(
        0,
        TrackHeader::new(12),
        vec![note(0, 0x9, 60, 100), note(480, 0x8, 60, 0), meta(0, 0x2F, &[])],
    );

    for _ in 0..2 {
        track.iter_start();
        let mut seen = Vec::new();
        while track.has_next() {
            seen.push(track.next_event().unwrap().command());
        }
        assert_eq!(seen, vec![0x9, 0x8, 0x2F]);
        assert_eq!(track.next_event(), None);
    }
}

#[test]
fn ticked_accumulates_all_deltas() {
    use pretty_assertions::assert_eq;
    let track = Track::new(
        0,
        TrackHeader::new(0),
        vec![
            meta(10, 0x01, b"hi"),
            note(0, 0x9, 60, 100),
            note(480, 0x8, 60, 0),
            note(20, 0x9, 62, 90),
        ],
    );
    let ticks: Vec<u64> = track.ticked().map(|t| t.accumulated_ticks()).collect();
    assert_eq!(ticks, vec![10, 10, 490, 510]);
}

#[test]
fn name_must_lead_at_delta_zero() {
    use pretty_assertions::assert_eq;
    let named = Track::new(0, TrackHeader::new(0), vec![meta(0, 0x03, b"PART GUITAR")]);
    assert_eq!(named.name(), Some(&b"PART GUITAR"[..]));
    assert!(named.is_named("PART GUITAR"));
    assert!(!named.is_named("PART GUITAR "));
    assert!(!named.is_named("PART BASS"));

    let late = Track::new(1, TrackHeader::new(0), vec![meta(1, 0x03, b"PART GUITAR")]);
    assert_eq!(late.name(), None);

    let second = Track::new(
        2,
        TrackHeader::new(0),
        vec![meta(0, 0x01, b"text"), meta(0, 0x03, b"PART GUITAR")],
    );
    assert!(!second.is_named("PART GUITAR"));
}
