use crate::HeaderError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The file format stored in the header chunk

Format 0 holds a single multi-channel track. Format 1 holds one or more tracks meant to
be played together. Format 2 holds independent single-track patterns.
"#]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[num_enum(error_type(name = HeaderError, constructor = HeaderError::InvalidFormat))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    #[default]
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

#[test]
fn format_codes() {
    assert_eq!(FormatType::try_from(2), Ok(FormatType::SequentiallyIndependent));
    assert_eq!(FormatType::try_from(3), Err(HeaderError::InvalidFormat(3)));
    assert_eq!(u16::from(FormatType::SingleMultiChannel), 0);
}
