#![doc = r#"
Processing events in absolute time

Events store the number of ticks since their predecessor. The
[`TimedEventsContainer`] methods present every event with its absolute time instead,
let a caller change that time (or anything else about the event), then sort the events
by their new times and derive fresh delta-times.

```rust
# use midifile::prelude::*;
let note = |delta, key| {
    MidiEvent::new(delta, ChannelEvent::note_on(u4::new(0), u7::new(key), u7::new(90)))
};
let mut events = vec![note(0, 60), note(100, 62), note(100, 64)];

// play the track backwards
events
    .process_timed_events(|timed| timed.time = 200 - timed.time)
    .unwrap();

let keys: Vec<_> = events
    .iter()
    .map(|e| match &e.body {
        EventBody::Channel(c) => c.message,
        _ => unreachable!(),
    })
    .collect();
assert_eq!(keys[0], ChannelMessage::NoteOn { note: u7::new(64), velocity: u7::new(90) });
assert_eq!(events[2].delta_time, 100);
```

# Ordering

Events are reordered by the key `(time, original index)`: events that end up at the
same time keep their original relative order. Events the filter rejects are never
handed to the action but still take part in the reordering.

# Errors

An action moving an event before time zero fails the pass with
[`ProcessError::NegativeTime`], and two neighbours more than [`VLQ_MAX`] ticks apart
fail it with [`ProcessError::DeltaTimeOverflow`]. On any error, including
one returned by a caller closure, the order and delta-times of the sequence are left as
they were. Other changes the action made to the events are kept.

Containers with several track chunks process each chunk on its own. A failure in one
chunk leaves the chunks before it processed.
"#]

use crate::{
    ProcessError,
    file::{MidiFile, TrackChunk},
    message::MidiEvent,
    vlq::VLQ_MAX,
};
use alloc::vec::Vec;

/// An event paired with its absolute time, handed to processing actions.
///
/// Only lives for the duration of one pass. Changing [`MidiEvent::delta_time`] through
/// `event` has no effect on the result, the delta-time is derived from `time`.
#[derive(Debug)]
pub struct TimedEvent<'a> {
    /// Absolute time in ticks. Setting it moves the event.
    pub time: i64,
    index: usize,
    /// The event itself
    pub event: &'a mut MidiEvent,
}

impl TimedEvent<'_> {
    /// Position of the event in its sequence before the pass.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A read-only view of an event at its absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEventRef<'a> {
    /// Absolute time in ticks
    pub time: u64,
    /// The event itself
    pub event: &'a MidiEvent,
}

#[doc = r#"
Anything holding one or more delta-timed event sequences

Implemented for a single sequence ([`Vec<MidiEvent>`], [`TrackChunk`]) and for groups
of them (`[TrackChunk]`, [`Vec<TrackChunk>`], [`MidiFile`]).
"#]
pub trait TimedEventsContainer {
    /// Runs `action` on every event for which `matches` returns true, then reorders
    /// the events by their new times.
    ///
    /// Returns the number of events passed to `action`. Errors returned by the closures
    /// are passed through as they are.
    fn try_process_timed_events<E, A, M>(&mut self, action: A, matches: M) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>;

    /// Every event with its absolute time, ordered by time.
    ///
    /// Events from different sequences at the same time are ordered by sequence, then
    /// by their position in it.
    fn timed_events(&self) -> Vec<TimedEventRef<'_>>;

    /// Runs `action` on every event, then reorders the events by their new times.
    ///
    /// Returns the number of events.
    fn process_timed_events<A>(&mut self, mut action: A) -> Result<usize, ProcessError>
    where
        A: FnMut(&mut TimedEvent<'_>),
    {
        self.try_process_timed_events(
            |timed| {
                action(timed);
                Ok(())
            },
            |_| Ok(true),
        )
    }

    /// Runs `action` on every event for which `matches` returns true, then reorders
    /// the events by their new times.
    ///
    /// Returns the number of matching events.
    fn process_timed_events_matching<A, M>(
        &mut self,
        mut action: A,
        mut matches: M,
    ) -> Result<usize, ProcessError>
    where
        A: FnMut(&mut TimedEvent<'_>),
        M: FnMut(&TimedEvent<'_>) -> bool,
    {
        self.try_process_timed_events(
            |timed| {
                action(timed);
                Ok(())
            },
            |timed| Ok(matches(timed)),
        )
    }
}

/// One pass over a single sequence.
fn process_sequence<E, A, M>(
    events: &mut Vec<MidiEvent>,
    action: &mut A,
    matches: &mut M,
) -> Result<usize, E>
where
    E: From<ProcessError>,
    A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
    M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
{
    if events.is_empty() {
        return Ok(0);
    }
    let original: Vec<u32> = events.iter().map(|e| e.delta_time).collect();

    let result = visit(events, action, matches).and_then(|(count, times)| {
        let order = sorted_order(&times);
        let deltas = derive_deltas(&order, &times)?;
        Ok((count, order, deltas))
    });

    let (count, order, deltas) = match result {
        Ok(pass) => pass,
        Err(e) => {
            for (event, delta) in events.iter_mut().zip(original) {
                event.delta_time = delta;
            }
            return Err(e);
        }
    };

    let mut slots: Vec<Option<MidiEvent>> = events.drain(..).map(Some).collect();
    for (index, delta) in order.into_iter().zip(deltas) {
        if let Some(mut event) = slots[index].take() {
            event.delta_time = delta;
            events.push(event);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("processed {count} of {} timed events", events.len());
    Ok(count)
}

/// Hands the matching events to `action` and collects every event's final time.
fn visit<E, A, M>(
    events: &mut [MidiEvent],
    action: &mut A,
    matches: &mut M,
) -> Result<(usize, Vec<i64>), E>
where
    E: From<ProcessError>,
    A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
    M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
{
    let mut count = 0;
    let mut times = Vec::with_capacity(events.len());
    let mut time: i64 = 0;
    for (index, event) in events.iter_mut().enumerate() {
        time += i64::from(event.delta_time);
        let mut timed = TimedEvent { time, index, event };
        if matches(&timed)? {
            action(&mut timed)?;
            count += 1;
            if timed.time < 0 {
                return Err(ProcessError::NegativeTime {
                    index,
                    time: timed.time,
                }
                .into());
            }
        }
        times.push(timed.time);
    }
    Ok((count, times))
}

/// Original indices ordered by `(time, index)`.
fn sorted_order(times: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..times.len()).collect();
    order.sort_unstable_by_key(|&index| (times[index], index));
    order
}

fn derive_deltas(order: &[usize], times: &[i64]) -> Result<Vec<u32>, ProcessError> {
    let mut previous = 0;
    order
        .iter()
        .map(|&index| {
            let delta = times[index] - previous;
            previous = times[index];
            u32::try_from(delta)
                .ok()
                .filter(|&delta| delta <= VLQ_MAX)
                .ok_or(ProcessError::DeltaTimeOverflow { index, delta })
        })
        .collect()
}

fn sequence_view(events: &[MidiEvent]) -> impl Iterator<Item = TimedEventRef<'_>> {
    events.iter().scan(0u64, |time, event| {
        *time += u64::from(event.delta_time);
        Some(TimedEventRef { time: *time, event })
    })
}

fn process_sequences<'a, E, A, M>(
    sequences: impl Iterator<Item = &'a mut Vec<MidiEvent>>,
    mut action: A,
    mut matches: M,
) -> Result<usize, E>
where
    E: From<ProcessError>,
    A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
    M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
{
    let mut count = 0;
    for events in sequences {
        count += process_sequence(events, &mut action, &mut matches)?;
    }
    Ok(count)
}

fn merged_view<'a>(sequences: impl Iterator<Item = &'a [MidiEvent]>) -> Vec<TimedEventRef<'a>> {
    let mut view: Vec<_> = sequences.flat_map(sequence_view).collect();
    // stable, so ties keep sequence order then event order
    view.sort_by_key(|timed| timed.time);
    view
}

impl TimedEventsContainer for Vec<MidiEvent> {
    fn try_process_timed_events<E, A, M>(
        &mut self,
        mut action: A,
        mut matches: M,
    ) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
    {
        process_sequence(self, &mut action, &mut matches)
    }

    fn timed_events(&self) -> Vec<TimedEventRef<'_>> {
        sequence_view(self).collect()
    }
}

impl TimedEventsContainer for TrackChunk {
    fn try_process_timed_events<E, A, M>(&mut self, action: A, matches: M) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
    {
        self.events_mut().try_process_timed_events(action, matches)
    }

    fn timed_events(&self) -> Vec<TimedEventRef<'_>> {
        sequence_view(self.events()).collect()
    }
}

impl TimedEventsContainer for [TrackChunk] {
    fn try_process_timed_events<E, A, M>(&mut self, action: A, matches: M) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
    {
        process_sequences(
            self.iter_mut().map(TrackChunk::events_mut),
            action,
            matches,
        )
    }

    fn timed_events(&self) -> Vec<TimedEventRef<'_>> {
        merged_view(self.iter().map(TrackChunk::events))
    }
}

impl TimedEventsContainer for Vec<TrackChunk> {
    fn try_process_timed_events<E, A, M>(&mut self, action: A, matches: M) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
    {
        self.as_mut_slice().try_process_timed_events(action, matches)
    }

    fn timed_events(&self) -> Vec<TimedEventRef<'_>> {
        self.as_slice().timed_events()
    }
}

impl TimedEventsContainer for MidiFile {
    fn try_process_timed_events<E, A, M>(&mut self, action: A, matches: M) -> Result<usize, E>
    where
        E: From<ProcessError>,
        A: FnMut(&mut TimedEvent<'_>) -> Result<(), E>,
        M: FnMut(&TimedEvent<'_>) -> Result<bool, E>,
    {
        process_sequences(
            self.track_chunks_mut().map(TrackChunk::events_mut),
            action,
            matches,
        )
    }

    fn timed_events(&self) -> Vec<TimedEventRef<'_>> {
        merged_view(self.track_chunks().map(TrackChunk::events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        message::{ChannelEvent, ChannelMessage, EventBody, MetaEvent},
        num::{u4, u7},
    };
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32, note: u8) -> MidiEvent {
        MidiEvent::new(delta, ChannelEvent::note_on(u4::new(0), u7::new(note), u7::new(64)))
    }

    fn note_off(delta: u32, note: u8) -> MidiEvent {
        MidiEvent::new(delta, ChannelEvent::note_off(u4::new(0), u7::new(note), u7::new(0)))
    }

    fn text(delta: u32, text: &str) -> MidiEvent {
        MidiEvent::new(delta, MetaEvent::Text(text.as_bytes().to_vec()))
    }

    fn is_note_on(timed: &TimedEvent<'_>) -> bool {
        matches!(
            timed.event.body,
            EventBody::Channel(ChannelEvent {
                message: ChannelMessage::NoteOn { .. },
                ..
            })
        )
    }

    fn deltas(events: &[MidiEvent]) -> Vec<u32> {
        events.iter().map(|e| e.delta_time).collect()
    }

    #[test]
    fn empty_container() {
        let mut events: Vec<MidiEvent> = Vec::new();
        assert_eq!(events.process_timed_events(|_| {}), Ok(0));
        assert!(events.is_empty());

        let mut tracks: Vec<TrackChunk> = Vec::new();
        assert_eq!(tracks.process_timed_events(|_| {}), Ok(0));
    }

    #[test]
    fn no_op_keeps_everything() {
        let mut events = alloc::vec![note_on(0, 60), text(10, "a"), note_off(20, 60), text(0, "b")];
        let before = events.clone();
        assert_eq!(events.process_timed_events(|_| {}), Ok(4));
        assert_eq!(events, before);
    }

    #[test]
    fn times_collapse_onto_one_point() {
        let mut events = alloc::vec![text(0, "A"), text(1000, "B")];
        let count = events.process_timed_events(|timed| timed.time = 100).unwrap();
        assert_eq!(count, 2);
        assert_eq!(events, [text(100, "A"), text(0, "B")]);
    }

    #[test]
    fn notes_change_places() {
        let a = note_on(0, 60);
        let b = note_off(1000, 60);
        let c = note_on(80, 90);
        let mut events = alloc::vec![a.clone(), b.clone(), c.clone()];

        events
            .process_timed_events(|timed| {
                if let EventBody::Channel(channel) = &timed.event.body {
                    match channel.message {
                        ChannelMessage::NoteOn { .. } => timed.time = 100,
                        ChannelMessage::NoteOff { .. } => timed.time = 10,
                        _ => {}
                    }
                }
            })
            .unwrap();

        assert_eq!(
            events,
            [
                MidiEvent { delta_time: 10, ..b },
                MidiEvent { delta_time: 90, ..a },
                MidiEvent { delta_time: 0, ..c },
            ]
        );
    }

    fn note_on_to_100_note_off_to_10(timed: &mut TimedEvent<'_>) {
        if let EventBody::Channel(channel) = &timed.event.body {
            match channel.message {
                ChannelMessage::NoteOn { .. } => timed.time = 100,
                ChannelMessage::NoteOff { .. } => timed.time = 10,
                _ => {}
            }
        }
    }

    #[test]
    fn equal_times_keep_stored_order() {
        let a = note_on(0, 60);
        let b = note_off(1000, 60);
        let c = note_off(80, 90);
        let mut events = alloc::vec![a.clone(), b.clone(), c.clone()];

        assert_eq!(events.process_timed_events(note_on_to_100_note_off_to_10), Ok(3));
        // b and c both land on 10
        assert_eq!(
            events,
            [
                MidiEvent { delta_time: 10, ..b },
                MidiEvent { delta_time: 0, ..c },
                MidiEvent { delta_time: 90, ..a },
            ]
        );
    }

    #[test]
    fn filtered_equal_times_keep_stored_order() {
        let mut track = TrackChunk::new(alloc::vec![
            note_on(0, 60),
            note_on(0, 90),
            note_off(1000, 60)
        ]);
        let count = track
            .process_timed_events_matching(note_on_to_100_note_off_to_10, is_note_on)
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            track.events(),
            [note_on(100, 60), note_on(0, 90), note_off(900, 60)]
        );
    }

    #[test]
    fn filter_skips_but_resorts() {
        let mut events = alloc::vec![note_on(0, 60), text(10, "x"), note_on(10, 62)];
        let mut seen = Vec::new();
        let count = events
            .process_timed_events_matching(
                |timed| {
                    seen.push(timed.index());
                    timed.time += 50;
                },
                is_note_on,
            )
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen, [0, 2]);
        // text at 10, first note at 50, second note at 70
        assert_eq!(events, [text(10, "x"), note_on(40, 60), note_on(20, 62)]);
    }

    #[test]
    fn delta_set_by_the_action_is_overwritten() {
        let mut events = alloc::vec![note_on(5, 60), note_on(5, 62)];
        events
            .process_timed_events(|timed| timed.event.delta_time = 999)
            .unwrap();
        assert_eq!(deltas(&events), [5, 5]);
    }

    #[test]
    fn events_are_moved_not_copied() {
        let mut events = alloc::vec![text(0, "first"), text(10, "second"), text(10, "third")];
        let buffers: Vec<*const u8> = events
            .iter()
            .filter_map(|e| match &e.body {
                EventBody::Meta(meta) => meta.text_bytes().map(<[u8]>::as_ptr),
                _ => None,
            })
            .collect();

        events
            .process_timed_events(|timed| timed.time = 20 - timed.time)
            .unwrap();

        let after: Vec<*const u8> = events
            .iter()
            .filter_map(|e| match &e.body {
                EventBody::Meta(meta) => meta.text_bytes().map(<[u8]>::as_ptr),
                _ => None,
            })
            .collect();
        // second (t=10) and third (t=20) flip to 10 and 0, first moves to 20
        assert_eq!(after, [buffers[2], buffers[1], buffers[0]]);
    }

    #[test]
    fn negative_time_restores_the_sequence() {
        let mut events = alloc::vec![note_on(0, 60), note_on(10, 62), note_on(10, 64)];
        let before = events.clone();
        let err = events
            .process_timed_events(|timed| {
                timed.event.delta_time = 0;
                timed.time -= 15;
            })
            .unwrap_err();
        assert_eq!(err, ProcessError::NegativeTime { index: 0, time: -15 });
        assert_eq!(events, before);
    }

    #[test]
    fn delta_overflow() {
        let mut events = alloc::vec![note_on(0, 60), note_on(10, 62)];
        let err = events
            .process_timed_events(|timed| {
                if timed.index() == 1 {
                    timed.time = i64::from(u32::MAX) + 1;
                }
            })
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::DeltaTimeOverflow {
                index: 1,
                delta: i64::from(u32::MAX) + 1
            }
        );
        assert_eq!(deltas(&events), [0, 10]);
    }

    #[test]
    fn delta_must_fit_a_vlq() {
        let mut events = alloc::vec![note_on(0, 60), note_on(10, 62)];
        let largest = i64::from(VLQ_MAX);
        let err = events
            .process_timed_events(|timed| {
                if timed.index() == 1 {
                    timed.time = largest + 1;
                }
            })
            .unwrap_err();
        assert_eq!(
            err,
            ProcessError::DeltaTimeOverflow {
                index: 1,
                delta: largest + 1
            }
        );
        assert_eq!(deltas(&events), [0, 10]);

        events
            .process_timed_events(|timed| {
                if timed.index() == 1 {
                    timed.time = largest;
                }
            })
            .unwrap();
        assert_eq!(deltas(&events), [0, VLQ_MAX]);
    }

    #[derive(Debug, PartialEq)]
    enum MyError {
        Stop(usize),
        Engine(ProcessError),
    }

    impl From<ProcessError> for MyError {
        fn from(value: ProcessError) -> Self {
            Self::Engine(value)
        }
    }

    #[test]
    fn caller_errors_pass_through() {
        let mut events = alloc::vec![note_on(0, 60), note_on(10, 62), note_on(10, 64)];
        let before = events.clone();
        let err = events
            .try_process_timed_events::<MyError, _, _>(
                |timed| {
                    timed.time = 0;
                    if timed.index() == 2 {
                        return Err(MyError::Stop(2));
                    }
                    Ok(())
                },
                |_| Ok(true),
            )
            .unwrap_err();
        assert_eq!(err, MyError::Stop(2));
        assert_eq!(events, before);

        let err = events
            .try_process_timed_events::<MyError, _, _>(
                |timed| {
                    timed.time = -1;
                    Ok(())
                },
                |_| Ok(true),
            )
            .unwrap_err();
        assert_eq!(
            err,
            MyError::Engine(ProcessError::NegativeTime { index: 0, time: -1 })
        );
    }

    #[test]
    fn track_chunks_are_independent() {
        let mut tracks = alloc::vec![
            TrackChunk::new(alloc::vec![note_on(0, 60), note_off(100, 60)]),
            TrackChunk::new(alloc::vec![text(50, "mark")]),
        ];
        let count = tracks
            .process_timed_events(|timed| timed.time = 200 - timed.time)
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(tracks[0].events(), [note_off(100, 60), note_on(100, 60)]);
        assert_eq!(tracks[1].events(), [text(150, "mark")]);
    }

    #[test]
    fn merged_view_breaks_ties_by_chunk() {
        let tracks = [
            TrackChunk::new(alloc::vec![text(10, "a"), text(0, "b")]),
            TrackChunk::new(alloc::vec![text(5, "c"), text(5, "d")]),
        ];
        let order: Vec<(u64, &[u8])> = tracks
            .timed_events()
            .into_iter()
            .filter_map(|timed| match &timed.event.body {
                EventBody::Meta(meta) => meta.text_bytes().map(|t| (timed.time, t)),
                _ => None,
            })
            .collect();
        assert_eq!(
            order,
            [
                (5, b"c".as_slice()),
                (10, b"a".as_slice()),
                (10, b"b".as_slice()),
                (10, b"d".as_slice()),
            ]
        );
    }
}
