use crate::{
    ChunkError, VlqError,
    message::{EventBody, MetaEvent, MidiEvent},
    reader::{
        MissingEndOfTrackPolicy, ReadResult, Reader, ReaderError, ReaderErrorKind,
        ReadingSettings,
    },
    vlq::write_vlq,
    writer::{Sink, WritingSettings},
};
use alloc::vec::Vec;

#[doc = r#"
The events of an `MTrk` chunk

The end-of-track event is not part of [`TrackChunk::events`]. Reading stops at it,
and writing always appends one after the last event, so the events can be reordered
freely without ever moving the end of the track in front of them.
"#]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackChunk {
    events: Vec<MidiEvent>,
}

impl TrackChunk {
    /// Create a track from its events
    pub fn new(events: Vec<MidiEvent>) -> Self {
        Self { events }
    }
    /// The events in stored order
    pub fn events(&self) -> &[MidiEvent] {
        &self.events
    }
    /// The events, for editing
    pub fn events_mut(&mut self) -> &mut Vec<MidiEvent> {
        &mut self.events
    }
    /// Take the events out of the track
    pub fn into_events(self) -> Vec<MidiEvent> {
        self.events
    }
    /// Append an event
    pub fn push(&mut self, event: MidiEvent) {
        self.events.push(event);
    }
    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }
    /// True if the track has no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
    /// Sum of all delta-times, in ticks.
    pub fn duration(&self) -> u64 {
        self.events.iter().map(|e| u64::from(e.delta_time)).sum()
    }

    /// Decodes events until the end-of-track event or the end of `content`.
    ///
    /// Bytes after the end-of-track event are left in `content`. When `truncated` is
    /// set, the chunk was cut short by the end of the file and an event running past
    /// the end of `content` is dropped instead of failing the read.
    pub(crate) fn read(
        content: &mut Reader<'_>,
        settings: &ReadingSettings,
        truncated: bool,
    ) -> ReadResult<Self> {
        let mut events = Vec::new();
        let mut running_status = None;
        let mut ended = false;

        while !content.is_empty() {
            let event = match MidiEvent::read(content, &mut running_status, settings) {
                Ok(event) => event,
                Err(e) if truncated && e.is_out_of_bounds() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "dropping event #{} cut off by the end of the file",
                        events.len()
                    );
                    break;
                }
                Err(e) => return Err(e.at_event(events.len())),
            };
            if event.is_end_of_track() {
                ended = true;
                break;
            }
            events.push(event);
        }

        if !ended {
            match settings.missing_end_of_track {
                MissingEndOfTrackPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("track chunk has no end-of-track event");
                }
                MissingEndOfTrackPolicy::Abort => {
                    return Err(ReaderError::new(
                        content.position(),
                        ReaderErrorKind::chunk(ChunkError::MissingEndOfTrack),
                    ));
                }
            }
        }
        Ok(Self { events })
    }

    /// Writes the events followed by an end-of-track event.
    ///
    /// End-of-track events inside the list are left out and their delta-time is added
    /// to the next event. Fails with the index of the event that cannot be encoded.
    pub(crate) fn write_content<S: Sink>(
        &self,
        out: &mut S,
        settings: &WritingSettings,
    ) -> Result<(), (usize, VlqError)> {
        let mut running_status = None;
        let mut carry: u64 = 0;
        for (index, event) in self.events.iter().enumerate() {
            let delta = carry + u64::from(event.delta_time);
            if event.is_end_of_track() {
                carry = delta;
                continue;
            }
            carry = 0;
            let delta = u32::try_from(delta).map_err(|_| (index, VlqError::TooLarge(u32::MAX)))?;
            write_vlq(delta, out).map_err(|e| (index, e))?;
            event
                .write_body(out, &mut running_status, settings)
                .map_err(|e| (index, e))?;
        }

        let index = self.events.len();
        let delta = u32::try_from(carry).map_err(|_| (index, VlqError::TooLarge(u32::MAX)))?;
        write_vlq(delta, out).map_err(|e| (index, e))?;
        MidiEvent::new(0, EventBody::Meta(MetaEvent::EndOfTrack))
            .write_body(out, &mut running_status, settings)
            .map_err(|e| (index, e))
    }
}

impl From<Vec<MidiEvent>> for TrackChunk {
    fn from(events: Vec<MidiEvent>) -> Self {
        Self::new(events)
    }
}

impl FromIterator<MidiEvent> for TrackChunk {
    fn from_iter<T: IntoIterator<Item = MidiEvent>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ParseError,
        message::ChannelEvent,
        num::{u4, u7},
    };
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32, note: u8) -> MidiEvent {
        MidiEvent::new(delta, ChannelEvent::note_on(u4::new(0), u7::new(note), u7::new(64)))
    }

    fn encode(track: &TrackChunk, settings: &WritingSettings) -> Vec<u8> {
        let mut out = Vec::new();
        track.write_content(&mut out, settings).unwrap();
        out
    }

    #[test]
    fn read_stops_at_end_of_track() {
        let bytes = [
            0x00, 0x90, 0x3C, 0x40, // note on
            0x60, 0x3C, 0x00, // running status
            0x00, 0xFF, 0x2F, 0x00, // end of track
            0xAA, // after the end
        ];
        let mut reader = Reader::from_byte_slice(&bytes);
        let track = TrackChunk::read(&mut reader, &ReadingSettings::default(), false).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(track.duration(), 0x60);
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn missing_end_of_track() {
        let bytes = [0x00, 0x90, 0x3C, 0x40];
        let settings = ReadingSettings::default();
        let track =
            TrackChunk::read(&mut Reader::from_byte_slice(&bytes), &settings, false).unwrap();
        assert_eq!(track.events(), &[note_on(0, 0x3C)]);

        let abort = settings.with_missing_end_of_track(MissingEndOfTrackPolicy::Abort);
        let err =
            TrackChunk::read(&mut Reader::from_byte_slice(&bytes), &abort, false).unwrap_err();
        assert_eq!(
            err.parse_error_kind(),
            Some(&ParseError::Chunk(ChunkError::MissingEndOfTrack))
        );
    }

    #[test]
    fn error_names_the_event() {
        let bytes = [0x00, 0x90, 0x3C, 0x40, 0x00, 0xF2, 0x00];
        let mut reader = Reader::from_byte_slice(&bytes);
        let err = TrackChunk::read(&mut reader, &ReadingSettings::default(), false).unwrap_err();
        assert_eq!(err.location().event, Some(1));
    }

    #[test]
    fn cut_off_event_is_dropped_when_truncated() {
        // the second note on lost its velocity
        let bytes = [0x00, 0x90, 0x3C, 0x40, 0x10, 0x90, 0x3E];
        let settings = ReadingSettings::default();
        let err = TrackChunk::read(&mut Reader::from_byte_slice(&bytes), &settings, false)
            .unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.location().event, Some(1));

        let track =
            TrackChunk::read(&mut Reader::from_byte_slice(&bytes), &settings, true).unwrap();
        assert_eq!(track.events(), &[note_on(0, 0x3C)]);

        let abort = settings.with_missing_end_of_track(MissingEndOfTrackPolicy::Abort);
        let err =
            TrackChunk::read(&mut Reader::from_byte_slice(&bytes), &abort, true).unwrap_err();
        assert_eq!(
            err.parse_error_kind(),
            Some(&ParseError::Chunk(ChunkError::MissingEndOfTrack))
        );
    }

    #[test]
    fn write_appends_end_of_track() {
        let track = TrackChunk::new(alloc::vec![note_on(0, 60), note_on(10, 62)]);
        assert_eq!(
            encode(&track, &WritingSettings::default()),
            [0x00, 0x90, 60, 64, 0x0A, 0x90, 62, 64, 0x00, 0xFF, 0x2F, 0x00]
        );
        assert_eq!(
            encode(&track, &WritingSettings::default().with_running_status(true)),
            [0x00, 0x90, 60, 64, 0x0A, 62, 64, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn inner_end_of_track_is_skipped() {
        let track = TrackChunk::new(alloc::vec![
            note_on(0, 60),
            MidiEvent::new(5, MetaEvent::EndOfTrack),
            note_on(10, 62),
        ]);
        assert_eq!(
            encode(&track, &WritingSettings::default()),
            [0x00, 0x90, 60, 64, 0x0F, 0x90, 62, 64, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn write_reports_the_failing_event() {
        let track = TrackChunk::new(alloc::vec![note_on(0, 60), note_on(0x1000_0000, 62)]);
        let mut out = Vec::new();
        assert_eq!(
            track.write_content(&mut out, &WritingSettings::default()),
            Err((1, VlqError::TooLarge(0x1000_0000)))
        );
    }
}
