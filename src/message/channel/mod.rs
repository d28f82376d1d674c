#![doc = r#"
Contains all Channel Message types

# Layout

```text
|--------------|-------------|-------------|
| status byte  | data byte 1 | data byte 2 |
| kind|channel | 0xxxxxxx    | 0xxxxxxx    |
|--------------|-------------|-------------|
```

The high nibble of the status selects the [`ChannelMessageKind`], the low nibble the
channel. Program change and channel pressure carry a single data byte, every other
kind carries two. Inside a track chunk the status byte may be omitted when it repeats
the previous channel status ("running status").
"#]

use crate::{
    InvalidParameterValue,
    num::{combine_nibbles, combine_u7, head_nibble, split_u14, tail_nibble, u4, u7, u14},
    reader::{InvalidChannelValuePolicy, ReadResult, Reader, ReaderError, ReadingSettings},
    writer::{Sink, WritingSettings},
};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The kind of a channel message, as stored in the high nibble of its status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelMessageKind {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`
    PolyphonicKeyPressure = 0xA,
    /// `0xBn`
    ControlChange = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelPressure = 0xD,
    /// `0xEn`
    PitchBend = 0xE,
}

impl ChannelMessageKind {
    /// Number of data bytes following the status.
    pub const fn data_len(self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }

    /// Name used in error reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoteOff => "NoteOff",
            Self::NoteOn => "NoteOn",
            Self::PolyphonicKeyPressure => "PolyphonicKeyPressure",
            Self::ControlChange => "ControlChange",
            Self::ProgramChange => "ProgramChange",
            Self::ChannelPressure => "ChannelPressure",
            Self::PitchBend => "PitchBend",
        }
    }
}

#[doc = r#"
The content of a channel event
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMessage {
    /// Stop a note
    NoteOff {
        /// Key number
        note: u7,
        /// Release velocity
        velocity: u7,
    },
    /// Start a note. A velocity of zero is conventionally a note off.
    NoteOn {
        /// Key number
        note: u7,
        /// Attack velocity
        velocity: u7,
    },
    /// Aftertouch on a single key
    PolyphonicKeyPressure {
        /// Key number
        note: u7,
        /// Pressure amount
        pressure: u7,
    },
    /// Controller value change
    ControlChange {
        /// Controller number
        controller: u7,
        /// New value
        value: u7,
    },
    /// Select a patch
    ProgramChange {
        /// Program number
        program: u7,
    },
    /// Aftertouch on the whole channel
    ChannelPressure {
        /// Pressure amount
        pressure: u7,
    },
    /// Pitch wheel position, `0x2000` is centered.
    PitchBend {
        /// 14-bit wheel position
        value: u14,
    },
}

impl ChannelMessage {
    /// The kind of this message.
    pub const fn kind(&self) -> ChannelMessageKind {
        match self {
            Self::NoteOff { .. } => ChannelMessageKind::NoteOff,
            Self::NoteOn { .. } => ChannelMessageKind::NoteOn,
            Self::PolyphonicKeyPressure { .. } => ChannelMessageKind::PolyphonicKeyPressure,
            Self::ControlChange { .. } => ChannelMessageKind::ControlChange,
            Self::ProgramChange { .. } => ChannelMessageKind::ProgramChange,
            Self::ChannelPressure { .. } => ChannelMessageKind::ChannelPressure,
            Self::PitchBend { .. } => ChannelMessageKind::PitchBend,
        }
    }
}

/// A channel message addressed to one of the 16 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    /// Channel number, `0..=15`
    pub channel: u4,
    /// The message
    pub message: ChannelMessage,
}

impl ChannelEvent {
    /// Create a channel event
    pub const fn new(channel: u4, message: ChannelMessage) -> Self {
        Self { channel, message }
    }

    /// Create a note on event
    pub const fn note_on(channel: u4, note: u7, velocity: u7) -> Self {
        Self::new(channel, ChannelMessage::NoteOn { note, velocity })
    }

    /// Create a note off event
    pub const fn note_off(channel: u4, note: u7, velocity: u7) -> Self {
        Self::new(channel, ChannelMessage::NoteOff { note, velocity })
    }

    /// The status byte of the event as it is written without transformations.
    pub fn status(&self) -> u8 {
        combine_nibbles(u4::new(self.message.kind().into()), self.channel)
    }

    /// Decodes the data bytes following `status`.
    ///
    /// `status` must be a channel status, `0x80..=0xEF`.
    pub(crate) fn read(
        status: u8,
        reader: &mut Reader<'_>,
        settings: &ReadingSettings,
    ) -> ReadResult<Self> {
        let kind = ChannelMessageKind::try_from(head_nibble(status).as_int()).map_err(|_| {
            ReaderError::parse_error(
                reader.position(),
                crate::EventError::UnsupportedStatus(status).into(),
            )
        })?;
        let channel = tail_nibble(status);
        let mut data = |field| read_data_byte(reader, kind, field, settings);

        use ChannelMessage as M;
        let message = match kind {
            ChannelMessageKind::NoteOff => M::NoteOff {
                note: data("Note")?,
                velocity: data("Velocity")?,
            },
            ChannelMessageKind::NoteOn => M::NoteOn {
                note: data("Note")?,
                velocity: data("Velocity")?,
            },
            ChannelMessageKind::PolyphonicKeyPressure => M::PolyphonicKeyPressure {
                note: data("Note")?,
                pressure: data("Pressure")?,
            },
            ChannelMessageKind::ControlChange => M::ControlChange {
                controller: data("Controller")?,
                value: data("Value")?,
            },
            ChannelMessageKind::ProgramChange => M::ProgramChange {
                program: data("Program")?,
            },
            ChannelMessageKind::ChannelPressure => M::ChannelPressure {
                pressure: data("Pressure")?,
            },
            ChannelMessageKind::PitchBend => {
                let lsb = data("Value")?;
                let msb = data("Value")?;
                M::PitchBend {
                    value: combine_u7(msb, lsb),
                }
            }
        };
        Ok(Self { channel, message })
    }

    /// Writes the event, leaving out the status byte when it equals `running_status`
    /// and running status is enabled.
    pub(crate) fn write<S: Sink>(
        &self,
        out: &mut S,
        running_status: &mut Option<u8>,
        settings: &WritingSettings,
    ) {
        use ChannelMessage as M;
        let (status, data): (u8, [u7; 2]) = match self.message {
            M::NoteOff { note, .. } if settings.note_off_as_silent_note_on => (
                combine_nibbles(u4::new(ChannelMessageKind::NoteOn.into()), self.channel),
                [note, u7::ZERO],
            ),
            M::NoteOff { note, velocity } | M::NoteOn { note, velocity } => {
                (self.status(), [note, velocity])
            }
            M::PolyphonicKeyPressure { note, pressure } => (self.status(), [note, pressure]),
            M::ControlChange { controller, value } => (self.status(), [controller, value]),
            M::ProgramChange { program } => (self.status(), [program, u7::ZERO]),
            M::ChannelPressure { pressure } => (self.status(), [pressure, u7::ZERO]),
            M::PitchBend { value } => {
                let (msb, lsb) = split_u14(value);
                (self.status(), [lsb, msb])
            }
        };

        if !(settings.use_running_status && *running_status == Some(status)) {
            out.put_u8(status);
        }
        *running_status = Some(status);

        let len = self.message.kind().data_len();
        for byte in &data[..len] {
            out.put_u8(byte.as_int());
        }
    }
}

fn read_data_byte(
    reader: &mut Reader<'_>,
    kind: ChannelMessageKind,
    field: &'static str,
    settings: &ReadingSettings,
) -> ReadResult<u7> {
    let position = reader.position();
    let raw = reader.read_u8()?;
    if let Ok(value) = u7::try_new(raw) {
        return Ok(value);
    }
    match settings.invalid_channel_value {
        InvalidChannelValuePolicy::Abort => Err(ReaderError::parse_error(
            position,
            InvalidParameterValue {
                event: kind.name(),
                field,
                value: i32::from(raw),
            }
            .into(),
        )),
        InvalidChannelValuePolicy::SnapToLimits => {
            #[cfg(feature = "tracing")]
            tracing::warn!("{} {field} of {raw} snapped to 127", kind.name());
            Ok(u7::MAX)
        }
        InvalidChannelValuePolicy::ReadValid => {
            #[cfg(feature = "tracing")]
            tracing::warn!("{} {field} of {raw} masked to 7 bits", kind.name());
            Ok(u7::from_int_lossy(raw))
        }
    }
}

#[cfg(test)]
fn decode(bytes: &[u8], settings: &ReadingSettings) -> ReadResult<ChannelEvent> {
    let mut reader = Reader::from_byte_slice(bytes);
    let status = reader.read_u8()?;
    ChannelEvent::read(status, &mut reader, settings)
}

#[test]
fn data_lengths() {
    use pretty_assertions::assert_eq;
    let settings = ReadingSettings::default();
    assert_eq!(
        decode(&[0xC3, 0x05], &settings).unwrap(),
        ChannelEvent::new(
            u4::new(3),
            ChannelMessage::ProgramChange {
                program: u7::new(5)
            }
        )
    );
    assert_eq!(
        decode(&[0x91, 0x3C, 0x40], &settings).unwrap(),
        ChannelEvent::note_on(u4::new(1), u7::new(60), u7::new(64))
    );
    assert!(decode(&[0x91, 0x3C], &settings).unwrap_err().is_out_of_bounds());
}

#[test]
fn pitch_bend_is_lsb_first() {
    let event = decode(&[0xE0, 0x01, 0x40], &ReadingSettings::default()).unwrap();
    assert_eq!(
        event.message,
        ChannelMessage::PitchBend {
            value: u14::new(0x2001)
        }
    );

    let mut out = alloc::vec::Vec::new();
    event.write(&mut out, &mut None, &WritingSettings::default());
    assert_eq!(out, [0xE0, 0x01, 0x40]);
}

#[test]
fn invalid_data_byte_policies() {
    use crate::ParseError;
    let bytes = [0x90, 0x3C, 0x90];

    let err = decode(&bytes, &ReadingSettings::default()).unwrap_err();
    assert_eq!(err.position(), 2);
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::InvalidParameterValue(InvalidParameterValue {
            event: "NoteOn",
            field: "Velocity",
            value: 0x90,
        }))
    );

    let snap = ReadingSettings::default()
        .with_invalid_channel_value(InvalidChannelValuePolicy::SnapToLimits);
    assert_eq!(
        decode(&bytes, &snap).unwrap(),
        ChannelEvent::note_on(u4::new(0), u7::new(0x3C), u7::MAX)
    );

    let valid =
        ReadingSettings::default().with_invalid_channel_value(InvalidChannelValuePolicy::ReadValid);
    assert_eq!(
        decode(&bytes, &valid).unwrap(),
        ChannelEvent::note_on(u4::new(0), u7::new(0x3C), u7::new(0x10))
    );
}

#[test]
fn running_status_and_silent_note_on() {
    let off = ChannelEvent::note_off(u4::new(2), u7::new(60), u7::new(30));
    let on = ChannelEvent::note_on(u4::new(2), u7::new(62), u7::new(90));
    let settings = WritingSettings::default()
        .with_running_status(true)
        .with_note_off_as_silent_note_on(true);

    let mut out = alloc::vec::Vec::new();
    let mut running = None;
    off.write(&mut out, &mut running, &settings);
    on.write(&mut out, &mut running, &settings);
    assert_eq!(out, [0x92, 60, 0, 62, 90]);
    assert_eq!(running, Some(0x92));
}
