use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The three file formats named by the header's format word.

Track location and decoding behave identically for all three; the format is
reported for callers that care how tracks relate to each other.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track holding every channel
    SingleMultiChannel = 0,
    /// Format 1: tracks played together
    Simultaneous = 1,
    /// Format 2: independent single-track patterns
    SequentiallyIndependent = 2,
}

#[test]
fn from_format_word() {
    use pretty_assertions::assert_eq;
    assert_eq!(FormatType::try_from(0u16).ok(), Some(FormatType::SingleMultiChannel));
    assert_eq!(FormatType::try_from(2u16).ok(), Some(FormatType::SequentiallyIndependent));
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(u16::from(FormatType::Simultaneous), 1);
}
