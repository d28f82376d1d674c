#![doc = r#"
Contains the events stored in a track chunk

# Hierarchy
```text
              |-----------|
              | MidiEvent |  delta-time + body
              |-----------|
                    |
              |-----------|
              | EventBody |
              |-----------|
             /      |      \
|--------------| |-----------| |------------|
| ChannelEvent | | MetaEvent | | SysExEvent |
|--------------| |-----------| |------------|
```

Events own all of their data, so a clone shares nothing with its source.
"#]

pub mod channel;
pub use channel::*;

pub mod meta;
pub use meta::*;

mod sysex;
pub use sysex::*;

use crate::{
    EventError, VlqError,
    reader::{ReadResult, Reader, ReaderError, ReadingSettings, inv_data},
    vlq::write_vlq,
    writer::{Sink, WriteCounter, WritingSettings},
};
use alloc::vec::Vec;

/// What an event does.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventBody {
    /// `0x80..=0xEF`
    Channel(ChannelEvent),
    /// `0xFF`
    Meta(MetaEvent),
    /// `0xF0` or `0xF7`
    SysEx(SysExEvent),
}

impl EventBody {
    /// Number of content bytes: data bytes for a channel event, the payload for a
    /// meta or system exclusive event.
    pub fn content_len(&self) -> usize {
        match self {
            Self::Channel(channel) => channel.message.kind().data_len(),
            Self::Meta(meta) => meta.content_len(),
            Self::SysEx(sysex) => sysex.content_len(),
        }
    }
}

impl From<ChannelEvent> for EventBody {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for EventBody {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysExEvent> for EventBody {
    fn from(value: SysExEvent) -> Self {
        Self::SysEx(value)
    }
}

#[doc = r#"
An event of a track chunk

`delta_time` is the number of ticks since the previous event of the same track.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiEvent {
    /// Ticks since the previous event
    pub delta_time: u32,
    /// The event itself
    pub body: EventBody,
}

impl MidiEvent {
    /// Create an event
    pub fn new(delta_time: u32, body: impl Into<EventBody>) -> Self {
        Self {
            delta_time,
            body: body.into(),
        }
    }

    /// True if this is an end-of-track meta event.
    pub fn is_end_of_track(&self) -> bool {
        matches!(self.body, EventBody::Meta(MetaEvent::EndOfTrack))
    }

    /// Decodes a single event from the start of `bytes`, without running status.
    ///
    /// Returns the event with the number of bytes it took.
    pub fn decode(bytes: &[u8], settings: &ReadingSettings) -> ReadResult<(Self, usize)> {
        let mut reader = Reader::from_byte_slice(bytes);
        let event = Self::read(&mut reader, &mut None, settings)?;
        Ok((event, reader.position()))
    }

    /// Encodes the event on its own, status byte included.
    pub fn encode(&self) -> Result<Vec<u8>, VlqError> {
        let mut out = Vec::new();
        self.write(&mut out, &mut None, &WritingSettings::default())?;
        Ok(out)
    }

    /// Number of bytes [`MidiEvent::encode`] produces.
    pub fn encoded_len(&self) -> Result<usize, VlqError> {
        let mut counter = WriteCounter::default();
        self.write(&mut counter, &mut None, &WritingSettings::default())?;
        Ok(counter.0)
    }

    /// Reads a delta-time and an event.
    ///
    /// Channel events update `running_status`, meta and system exclusive events clear it.
    pub(crate) fn read(
        reader: &mut Reader<'_>,
        running_status: &mut Option<u8>,
        settings: &ReadingSettings,
    ) -> ReadResult<Self> {
        let (delta_time, _) = reader.read_vlq()?;

        let status = match reader.peek_u8() {
            None => return Err(ReaderError::oob(reader.position())),
            Some(byte) if byte & 0x80 != 0 => {
                reader.read_u8()?;
                byte
            }
            Some(_) => running_status
                .ok_or_else(|| inv_data(reader, EventError::MissingRunningStatus))?,
        };

        let body = match status {
            0x80..=0xEF => {
                *running_status = Some(status);
                EventBody::Channel(ChannelEvent::read(status, reader, settings)?)
            }
            0xFF => {
                *running_status = None;
                let kind = reader.read_u8()?;
                let (len, _) = reader.read_vlq()?;
                let content = reader.sub_reader(len as usize)?;
                EventBody::Meta(MetaEvent::read(kind, content, settings)?)
            }
            0xF0 | 0xF7 => {
                *running_status = None;
                let (len, _) = reader.read_vlq()?;
                let data = reader.read_slice(len as usize)?;
                let kind = if status == 0xF0 {
                    SysExKind::Normal
                } else {
                    SysExKind::Escape
                };
                EventBody::SysEx(SysExEvent::new(kind, data))
            }
            _ => return Err(inv_data(reader, EventError::UnsupportedStatus(status))),
        };

        Ok(Self { delta_time, body })
    }

    /// Writes the delta-time and the event.
    pub(crate) fn write<S: Sink>(
        &self,
        out: &mut S,
        running_status: &mut Option<u8>,
        settings: &WritingSettings,
    ) -> Result<(), VlqError> {
        write_vlq(self.delta_time, out)?;
        self.write_body(out, running_status, settings)
    }

    /// Writes the event without its delta-time.
    pub(crate) fn write_body<S: Sink>(
        &self,
        out: &mut S,
        running_status: &mut Option<u8>,
        settings: &WritingSettings,
    ) -> Result<(), VlqError> {
        match &self.body {
            EventBody::Channel(channel) => channel.write(out, running_status, settings),
            EventBody::Meta(meta) => {
                *running_status = None;
                out.put(&[0xFF, meta.status()]);
                write_len(meta.content_len(), out)?;
                meta.write_content(out);
            }
            EventBody::SysEx(sysex) => {
                *running_status = None;
                out.put_u8(sysex.kind.status());
                write_len(sysex.content_len(), out)?;
                sysex.write_content(out);
            }
        }
        Ok(())
    }
}

fn write_len<S: Sink>(len: usize, out: &mut S) -> Result<(), VlqError> {
    let len = u32::try_from(len).map_err(|_| VlqError::TooLarge(u32::MAX))?;
    write_vlq(len, out)?;
    Ok(())
}
