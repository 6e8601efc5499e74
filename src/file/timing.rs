#[doc = r#"
The raw division word of a MIDI file header.

The decoder never interprets it; it is handed through so callers can turn
delta-times into musical or wall-clock time. When the top bit is clear it
holds ticks per quarter note, otherwise it holds a negative SMPTE frame rate
in its high byte and ticks per frame in its low byte.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Division {
    pub(crate) inner: [u8; 2],
}

impl Division {
    /// Wrap the two division bytes as they appear in the file.
    pub const fn from_be_bytes(inner: [u8; 2]) -> Self {
        Self { inner }
    }

    /// The division as an unsigned word.
    pub const fn raw(&self) -> u16 {
        u16::from_be_bytes(self.inner)
    }

    /// The division as a signed word. SMPTE divisions are negative.
    pub const fn as_i16(&self) -> i16 {
        i16::from_be_bytes(self.inner)
    }

    /// True if the top bit marks this as an SMPTE division.
    pub const fn is_smpte(&self) -> bool {
        self.inner[0] & 0x80 != 0
    }

    /// Returns Some if the division is defined as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self.timing() {
            Timing::TicksPerQuarterNote(tpqn) => Some(tpqn),
            Timing::Smpte { .. } => None,
        }
    }

    /// Split the division into its two possible meanings.
    pub const fn timing(&self) -> Timing {
        if self.is_smpte() {
            Timing::Smpte {
                frames_per_second: self.inner[0] as i8,
                ticks_per_frame: self.inner[1],
            }
        } else {
            Timing::TicksPerQuarterNote(self.raw() & 0x7FFF)
        }
    }
}

/// The header timing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The midi file's delta times are defined using SMPTE time code.
    ///
    /// `frames_per_second` is stored negated (-24, -25, -29 or -30 in conforming files).
    Smpte {
        /// Negative frame rate from the high byte
        frames_per_second: i8,
        /// Subdivisions of a frame
        ticks_per_frame: u8,
    },
}

#[test]
fn ticks_per_quarter_note() {
    use pretty_assertions::assert_eq;
    let division = Division::from_be_bytes([0x01, 0xE0]);
    assert!(!division.is_smpte());
    assert_eq!(division.ticks_per_quarter_note(), Some(480));
    assert_eq!(division.timing(), Timing::TicksPerQuarterNote(480));
}

#[test]
fn smpte_division() {
    use pretty_assertions::assert_eq;
    // 25 fps, 40 ticks per frame
    let division = Division::from_be_bytes([0xE7, 0x28]);
    assert!(division.is_smpte());
    assert!(division.as_i16() < 0);
    assert_eq!(division.ticks_per_quarter_note(), None);
    assert_eq!(
        division.timing(),
        Timing::Smpte {
            frames_per_second: -25,
            ticks_per_frame: 40
        }
    );
}
