#![doc = r#"
Contains all Meta Event types

Meta events only exist inside MIDI files. Each one is framed as

```text
FF <type> <length: vlq> <content>
```

The content is decoded through a reader bounded to the declared length. Bytes left
over after a fixed layout are skipped, a frame shorter than the layout is an
[`EventError::ContentTooShort`]. Parameters with a restricted range are resolved by
the [`InvalidMetaValuePolicy`] of the active [`ReadingSettings`].
"#]

mod key_signature;
pub use key_signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod time_signature;
pub use time_signature::*;

use crate::{
    EventError, InvalidParameterValue,
    num::{u4, u7, u24},
    reader::{InvalidMetaValuePolicy, ReadResult, Reader, ReaderError, ReadingSettings},
    writer::{Sink, WriteCounter},
};
use alloc::{borrow::Cow, string::String, vec::Vec};

#[doc = r#"
A meta event, without its delta-time
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// `FF 00`, either empty or a 16-bit number
    SequenceNumber(Option<u16>),
    /// `FF 01`
    Text(Vec<u8>),
    /// `FF 02`
    CopyrightNotice(Vec<u8>),
    /// `FF 03`
    SequenceTrackName(Vec<u8>),
    /// `FF 04`
    InstrumentName(Vec<u8>),
    /// `FF 05`
    Lyric(Vec<u8>),
    /// `FF 06`
    Marker(Vec<u8>),
    /// `FF 07`
    CuePoint(Vec<u8>),
    /// `FF 08`
    ProgramName(Vec<u8>),
    /// `FF 09`
    DeviceName(Vec<u8>),
    /// `FF 20`, the channel following meta and sysex events refer to
    ChannelPrefix(u4),
    /// `FF 21`, the output port of the track
    PortPrefix(u7),
    /// `FF 2F`
    EndOfTrack,
    /// `FF 51`, microseconds per quarter note
    SetTempo(u24),
    /// `FF 54`
    SmpteOffset(SmpteOffset),
    /// `FF 58`
    TimeSignature(TimeSignature),
    /// `FF 59`
    KeySignature(KeySignature),
    /// `FF 7F`
    SequencerSpecific(Vec<u8>),
    /// Any other type byte, content kept as it is
    Unknown {
        /// The type byte
        status: u8,
        /// Raw content
        data: Vec<u8>,
    },
}

impl MetaEvent {
    /// The type byte following `FF`.
    pub const fn status(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => 0x00,
            Self::Text(_) => 0x01,
            Self::CopyrightNotice(_) => 0x02,
            Self::SequenceTrackName(_) => 0x03,
            Self::InstrumentName(_) => 0x04,
            Self::Lyric(_) => 0x05,
            Self::Marker(_) => 0x06,
            Self::CuePoint(_) => 0x07,
            Self::ProgramName(_) => 0x08,
            Self::DeviceName(_) => 0x09,
            Self::ChannelPrefix(_) => 0x20,
            Self::PortPrefix(_) => 0x21,
            Self::EndOfTrack => 0x2F,
            Self::SetTempo(_) => 0x51,
            Self::SmpteOffset(_) => 0x54,
            Self::TimeSignature(_) => 0x58,
            Self::KeySignature(_) => 0x59,
            Self::SequencerSpecific(_) => 0x7F,
            Self::Unknown { status, .. } => *status,
        }
    }

    /// Name used in error reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SequenceNumber(_) => "SequenceNumber",
            Self::Text(_) => "Text",
            Self::CopyrightNotice(_) => "CopyrightNotice",
            Self::SequenceTrackName(_) => "SequenceTrackName",
            Self::InstrumentName(_) => "InstrumentName",
            Self::Lyric(_) => "Lyric",
            Self::Marker(_) => "Marker",
            Self::CuePoint(_) => "CuePoint",
            Self::ProgramName(_) => "ProgramName",
            Self::DeviceName(_) => "DeviceName",
            Self::ChannelPrefix(_) => "ChannelPrefix",
            Self::PortPrefix(_) => "PortPrefix",
            Self::EndOfTrack => "EndOfTrack",
            Self::SetTempo(_) => "SetTempo",
            Self::SmpteOffset(_) => "SmpteOffset",
            Self::TimeSignature(_) => "TimeSignature",
            Self::KeySignature(_) => "KeySignature",
            Self::SequencerSpecific(_) => "SequencerSpecific",
            Self::Unknown { .. } => "UnknownMeta",
        }
    }

    /// The raw bytes of a text-family event.
    pub fn text_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(t)
            | Self::CopyrightNotice(t)
            | Self::SequenceTrackName(t)
            | Self::InstrumentName(t)
            | Self::Lyric(t)
            | Self::Marker(t)
            | Self::CuePoint(t)
            | Self::ProgramName(t)
            | Self::DeviceName(t) => Some(t.as_slice()),
            _ => None,
        }
    }

    /// The text of a text-family event, with invalid UTF-8 replaced.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.text_bytes().map(String::from_utf8_lossy)
    }

    /// Number of content bytes, not counting the type byte and the length.
    pub fn content_len(&self) -> usize {
        let mut counter = WriteCounter::default();
        self.write_content(&mut counter);
        counter.0
    }

    /// Decodes the content of a meta event of type `status`.
    ///
    /// `content` spans exactly the declared length.
    pub(crate) fn read(
        status: u8,
        mut content: Reader<'_>,
        settings: &ReadingSettings,
    ) -> ReadResult<Self> {
        let mut check = ParamCheck {
            start: content.position(),
            reader: &mut content,
            settings,
            event: "",
        };
        let text = |check: &mut ParamCheck<'_, '_>| check.reader.take_rest().to_vec();

        let event = match status {
            0x00 => {
                check.event = "SequenceNumber";
                if check.reader.is_empty() {
                    Self::SequenceNumber(None)
                } else {
                    Self::SequenceNumber(Some(u16::from_be_bytes(check.fixed::<2>()?)))
                }
            }
            0x01 => Self::Text(text(&mut check)),
            0x02 => Self::CopyrightNotice(text(&mut check)),
            0x03 => Self::SequenceTrackName(text(&mut check)),
            0x04 => Self::InstrumentName(text(&mut check)),
            0x05 => Self::Lyric(text(&mut check)),
            0x06 => Self::Marker(text(&mut check)),
            0x07 => Self::CuePoint(text(&mut check)),
            0x08 => Self::ProgramName(text(&mut check)),
            0x09 => Self::DeviceName(text(&mut check)),
            0x20 => {
                check.event = "ChannelPrefix";
                let [raw] = check.fixed::<1>()?;
                Self::ChannelPrefix(u4::new(check.clamp(raw, 0, 15, "Channel")?))
            }
            0x21 => {
                check.event = "PortPrefix";
                let [raw] = check.fixed::<1>()?;
                Self::PortPrefix(u7::new(check.clamp(raw, 0, 127, "Port")?))
            }
            0x2F => Self::EndOfTrack,
            0x51 => {
                check.event = "SetTempo";
                let [a, b, c] = check.fixed::<3>()?;
                Self::SetTempo(u24::new(u32::from_be_bytes([0, a, b, c])))
            }
            0x54 => {
                check.event = "SmpteOffset";
                Self::SmpteOffset(SmpteOffset::read(&mut check)?)
            }
            0x58 => {
                check.event = "TimeSignature";
                Self::TimeSignature(TimeSignature::read(&mut check)?)
            }
            0x59 => {
                check.event = "KeySignature";
                Self::KeySignature(KeySignature::read(&mut check)?)
            }
            0x7F => Self::SequencerSpecific(text(&mut check)),
            status => Self::Unknown {
                status,
                data: text(&mut check),
            },
        };

        if !content.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "{} event has {} surplus content bytes, skipping",
                event.name(),
                content.remaining()
            );
            content.take_rest();
        }
        Ok(event)
    }

    /// Writes the content only.
    pub(crate) fn write_content<S: Sink>(&self, out: &mut S) {
        match self {
            Self::SequenceNumber(None) | Self::EndOfTrack => {}
            Self::SequenceNumber(Some(n)) => out.put(&n.to_be_bytes()),
            Self::Text(data)
            | Self::CopyrightNotice(data)
            | Self::SequenceTrackName(data)
            | Self::InstrumentName(data)
            | Self::Lyric(data)
            | Self::Marker(data)
            | Self::CuePoint(data)
            | Self::ProgramName(data)
            | Self::DeviceName(data)
            | Self::SequencerSpecific(data)
            | Self::Unknown { data, .. } => out.put(data),
            Self::ChannelPrefix(channel) => out.put_u8(channel.as_int()),
            Self::PortPrefix(port) => out.put_u8(port.as_int()),
            Self::SetTempo(tempo) => out.put(&tempo.as_int().to_be_bytes()[1..]),
            Self::SmpteOffset(offset) => offset.write(out),
            Self::TimeSignature(signature) => signature.write(out),
            Self::KeySignature(signature) => signature.write(out),
        }
    }
}

/// Range checking for the content of one meta event.
pub(crate) struct ParamCheck<'r, 'a> {
    start: usize,
    reader: &'r mut Reader<'a>,
    settings: &'r ReadingSettings,
    event: &'static str,
}

impl ParamCheck<'_, '_> {
    /// Reads the fixed part of the layout.
    fn fixed<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let found = self.reader.remaining();
        if found < N {
            return Err(ReaderError::parse_error(
                self.start,
                EventError::ContentTooShort {
                    event: self.event,
                    expected: N,
                    found,
                }
                .into(),
            ));
        }
        self.reader.read_array::<N>()
    }

    /// Resolves a value outside of `min..=max` per the active policy.
    fn clamp<T>(&self, value: T, min: T, max: T, field: &'static str) -> ReadResult<T>
    where
        T: Copy + PartialOrd + Into<i32>,
    {
        if value >= min && value <= max {
            return Ok(value);
        }
        let raw: i32 = value.into();
        match self.settings.invalid_meta_value {
            InvalidMetaValuePolicy::Abort => Err(ReaderError::parse_error(
                self.start,
                InvalidParameterValue {
                    event: self.event,
                    field,
                    value: raw,
                }
                .into(),
            )),
            InvalidMetaValuePolicy::SnapToLimits => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "{} {field} of {raw} snapped to the nearest limit",
                    self.event
                );
                Ok(if value < min { min } else { max })
            }
        }
    }
}

#[cfg(test)]
fn decode(status: u8, content: &[u8], settings: &ReadingSettings) -> ReadResult<MetaEvent> {
    MetaEvent::read(status, Reader::from_byte_slice(content), settings)
}

#[test]
fn key_signature_out_of_range() {
    use crate::ParseError;
    use pretty_assertions::assert_eq;

    let err = decode(0x59, &[9, 0], &ReadingSettings::default()).unwrap_err();
    let Some(ParseError::InvalidParameterValue(invalid)) = err.parse_error_kind() else {
        panic!("expected an invalid parameter, got {err}");
    };
    assert_eq!(invalid.field, "Key");
    assert_eq!(invalid.value, 9);

    let snap =
        ReadingSettings::default().with_invalid_meta_value(InvalidMetaValuePolicy::SnapToLimits);
    let MetaEvent::KeySignature(signature) = decode(0x59, &[9, 0], &snap).unwrap() else {
        panic!("expected a key signature");
    };
    assert_eq!(signature.key(), 7);
    assert_eq!(signature.scale(), Scale::Major);

    // 0xF7 is -9 flats
    let MetaEvent::KeySignature(signature) = decode(0x59, &[0xF7, 3], &snap).unwrap() else {
        panic!("expected a key signature");
    };
    assert_eq!(signature.key(), -7);
    assert_eq!(signature.scale(), Scale::Minor);
}

#[test]
fn short_and_long_frames() {
    use crate::ParseError;
    use pretty_assertions::assert_eq;
    let settings = ReadingSettings::default();

    let err = decode(0x51, &[0x07, 0xA1], &settings).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Event(EventError::ContentTooShort {
            event: "SetTempo",
            expected: 3,
            found: 2
        }))
    );

    assert_eq!(
        decode(0x51, &[0x07, 0xA1, 0x20, 0xFF], &settings).unwrap(),
        MetaEvent::SetTempo(u24::new(500_000))
    );
    assert_eq!(
        decode(0x00, &[], &settings).unwrap(),
        MetaEvent::SequenceNumber(None)
    );
}

#[test]
fn smpte_offset_policies() {
    use pretty_assertions::assert_eq;
    // 30 fps, 31 hours, 60 minutes
    let content = [0x7F, 60, 0, 30, 100];
    assert!(decode(0x54, &content, &ReadingSettings::default()).is_err());

    let snap =
        ReadingSettings::default().with_invalid_meta_value(InvalidMetaValuePolicy::SnapToLimits);
    assert_eq!(
        decode(0x54, &content, &snap).unwrap(),
        MetaEvent::SmpteOffset(SmpteOffset {
            fps: crate::file::SmpteFps::Thirty,
            hour: 23,
            minute: 59,
            second: 0,
            frame: 29,
            subframe: 99,
        })
    );
}

#[test]
fn content_round_trip() {
    use pretty_assertions::assert_eq;
    let settings = ReadingSettings::default();
    let events = [
        MetaEvent::SequenceNumber(Some(7)),
        MetaEvent::SequenceNumber(None),
        MetaEvent::Marker(b"verse".to_vec()),
        MetaEvent::ChannelPrefix(u4::new(9)),
        MetaEvent::PortPrefix(u7::new(1)),
        MetaEvent::EndOfTrack,
        MetaEvent::SetTempo(u24::new(0x07A120)),
        MetaEvent::TimeSignature(TimeSignature::default()),
        MetaEvent::KeySignature(KeySignature::try_new(-3, Scale::Minor).unwrap()),
        MetaEvent::SequencerSpecific(alloc::vec![0x00, 0x00, 0x41]),
        MetaEvent::Unknown {
            status: 0x60,
            data: alloc::vec![1, 2, 3],
        },
    ];
    for event in events {
        let mut content = Vec::new();
        event.write_content(&mut content);
        assert_eq!(content.len(), event.content_len());
        assert_eq!(decode(event.status(), &content, &settings).unwrap(), event);
    }
}
