use num_enum::{FromPrimitive, IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The channel voice commands, keyed by the high nibble of a status byte.

The decoder accepts any nibble from `0x8` upward; this enum only names the
ones the MIDI standard defines for channel messages.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelCommand {
    /// `8n kk vv`
    NoteOff = 0x8,
    /// `9n kk vv`
    NoteOn = 0x9,
    /// `An kk pp`, polyphonic key pressure
    KeyAfterTouch = 0xA,
    /// `Bn cc vv`
    ControlChange = 0xB,
    /// `Cn pp`
    ProgramChange = 0xC,
    /// `Dn pp`, channel pressure
    ChannelAfterTouch = 0xD,
    /// `En ll mm`
    PitchWheelChange = 0xE,
}

impl ChannelCommand {
    /// Number of data bytes following the status byte.
    pub const fn data_len(self) -> usize {
        data_len(self as u8)
    }

    /// A short human-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoteOff => "NoteOff",
            Self::NoteOn => "NoteOn",
            Self::KeyAfterTouch => "KeyAfterTouch",
            Self::ControlChange => "ControlChange",
            Self::ProgramChange => "ProgramChange",
            Self::ChannelAfterTouch => "ChanAfterTouch",
            Self::PitchWheelChange => "PitchWheelChange",
        }
    }
}

/// Data bytes carried by a channel event with the given command nibble.
///
/// Program Change and Channel Pressure carry one; everything else two.
pub const fn data_len(command: u8) -> usize {
    match command {
        0xC | 0xD => 1,
        _ => 2,
    }
}

/// Name of a command nibble, or `"???"` if it is not a channel command.
pub fn command_name(command: u8) -> &'static str {
    ChannelCommand::try_from(command)
        .map(ChannelCommand::name)
        .unwrap_or("???")
}

#[doc = r#"
Meta event types, keyed by the byte following `0xFF`.

Unknown types pass through as [`MetaKind::Unknown`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// `FF 00 02 ssss`
    SequenceNumber = 0x00,
    /// `FF 01 len text`
    Text = 0x01,
    /// `FF 02 len text`
    Copyright = 0x02,
    /// `FF 03 len text`, sequence or track name
    TrackName = 0x03,
    /// `FF 04 len text`
    InstrumentName = 0x04,
    /// `FF 05 len text`
    Lyric = 0x05,
    /// `FF 06 len text`
    Marker = 0x06,
    /// `FF 07 len text`
    CuePoint = 0x07,
    /// `FF 20 01 cc`
    ChannelPrefix = 0x20,
    /// `FF 2F 00`
    EndOfTrack = 0x2F,
    /// `FF 51 03 tttttt`, microseconds per quarter note
    Tempo = 0x51,
    /// `FF 54 05 hr mn se fr ff`
    SmpteOffset = 0x54,
    /// `FF 58 04 nn dd cc bb`
    TimeSignature = 0x58,
    /// `FF 59 02 sf mi`
    KeySignature = 0x59,
    /// `FF 7F len data`
    SequencerSpecific = 0x7F,
    /// Anything else
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl MetaKind {
    /// True for the meta types whose payload is text.
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Copyright
                | Self::TrackName
                | Self::InstrumentName
                | Self::Lyric
                | Self::Marker
                | Self::CuePoint
        )
    }
}

#[test]
fn argument_counts() {
    use pretty_assertions::assert_eq;
    assert_eq!(ChannelCommand::ProgramChange.data_len(), 1);
    assert_eq!(ChannelCommand::ChannelAfterTouch.data_len(), 1);
    assert_eq!(ChannelCommand::NoteOn.data_len(), 2);
    assert_eq!(ChannelCommand::PitchWheelChange.data_len(), 2);
    // unnamed nibbles take two arguments
    assert_eq!(data_len(0xF), 2);
}

#[test]
fn names() {
    use pretty_assertions::assert_eq;
    assert_eq!(command_name(0x9), "NoteOn");
    assert_eq!(command_name(0xD), "ChanAfterTouch");
    assert_eq!(command_name(0xF), "???");
    assert_eq!(command_name(0x3), "???");
}

#[test]
fn meta_kinds() {
    use pretty_assertions::assert_eq;
    assert_eq!(MetaKind::from(0x03), MetaKind::TrackName);
    assert_eq!(MetaKind::from(0x51), MetaKind::Tempo);
    assert_eq!(MetaKind::from(0x21), MetaKind::Unknown(0x21));
    assert!(MetaKind::TrackName.is_text());
    assert!(!MetaKind::EndOfTrack.is_text());
}
