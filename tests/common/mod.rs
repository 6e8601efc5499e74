#![allow(dead_code)]

/// Canonical (shortest) MIDI variable-length encoding of `value`.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    groups.reverse();
    groups
}

/// Builds track bodies event by event.
#[derive(Default)]
pub struct TrackBytes {
    body: Vec<u8>,
}

impl TrackBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(mut self, delta: u32, command: u8, data: &[u8]) -> Self {
        self.body.extend(encode_vlq(delta));
        self.body.extend([0xFF, command, data.len() as u8]);
        self.body.extend_from_slice(data);
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.meta(0, 0x03, name.as_bytes())
    }

    /// A channel event written verbatim: status byte (if any) and data bytes.
    pub fn raw(mut self, delta: u32, bytes: &[u8]) -> Self {
        self.body.extend(encode_vlq(delta));
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn note_on(self, delta: u32, key: u8, velocity: u8) -> Self {
        self.raw(delta, &[0x90, key, velocity])
    }

    pub fn note_off(self, delta: u32, key: u8) -> Self {
        self.raw(delta, &[0x80, key, 0])
    }

    pub fn end(self) -> Self {
        self.meta(0, 0x2F, &[])
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn chunk(&self) -> Vec<u8> {
        let mut bytes = b"MTrk".to_vec();
        bytes.extend((self.body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

pub fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = b"MThd\x00\x00\x00\x06".to_vec();
    bytes.extend(format.to_be_bytes());
    bytes.extend(tracks.to_be_bytes());
    bytes.extend(division.to_be_bytes());
    bytes
}

/// A complete format 1 file holding `tracks`.
pub fn smf(tracks: &[TrackBytes]) -> Vec<u8> {
    let mut bytes = header(1, tracks.len() as u16, 480);
    for track in tracks {
        bytes.extend(track.chunk());
    }
    bytes
}

/// A conductor track, an unnamed track, and a "BEAT" track with two
/// Note On/Off pairs at ticks 0 and 480.
pub fn beat_file() -> Vec<u8> {
    smf(&[
        TrackBytes::new()
            .meta(0, 0x51, &[0x07, 0xA1, 0x20])
            .meta(0, 0x58, &[4, 2, 24, 8])
            .end(),
        TrackBytes::new().note_on(0, 60, 100).note_off(960, 60).end(),
        TrackBytes::new()
            .name("BEAT")
            .note_on(0, 12, 100)
            .note_off(120, 12)
            .note_on(360, 13, 90)
            .note_off(120, 13)
            .end(),
    ])
}
