use midifile::prelude::*;
use pretty_assertions::assert_eq;

fn note_on(delta: u32, note: u8) -> MidiEvent {
    MidiEvent::new(delta, ChannelEvent::note_on(u4::new(0), u7::new(note), u7::new(100)))
}

fn note_off(delta: u32, note: u8) -> MidiEvent {
    MidiEvent::new(delta, ChannelEvent::note_off(u4::new(0), u7::new(note), u7::new(0)))
}

fn marker(delta: u32, name: &str) -> MidiEvent {
    MidiEvent::new(delta, MetaEvent::Marker(name.as_bytes().to_vec()))
}

fn song() -> MidiFile {
    let mut file = MidiFile::with_tracks(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(96),
        [
            TrackChunk::new(vec![marker(0, "intro"), marker(384, "verse")]),
            TrackChunk::new(vec![
                note_on(0, 60),
                note_off(96, 60),
                note_on(0, 62),
                note_off(96, 62),
            ]),
        ],
    );
    file.chunks_mut().insert(
        1,
        Chunk::Unknown(UnknownChunk::new(ChunkId(*b"XFIH"), vec![0u8])),
    );
    file
}

fn is_note(timed: &TimedEvent<'_>) -> bool {
    matches!(timed.event.body, EventBody::Channel(_))
}

#[test]
fn file_is_processed_per_track() {
    let mut file = song();
    let count = file
        .process_timed_events_matching(|timed| timed.time += 48, is_note)
        .unwrap();
    assert_eq!(count, 4);

    let tracks: Vec<_> = file.track_chunks().collect();
    assert_eq!(tracks[0].events(), [marker(0, "intro"), marker(384, "verse")]);
    assert_eq!(
        tracks[1].events(),
        [note_on(48, 60), note_off(96, 60), note_on(0, 62), note_off(96, 62)]
    );
    // the unknown chunk stays where it was
    assert_eq!(file.chunks()[1].id(), ChunkId(*b"XFIH"));
}

#[test]
fn processed_file_is_written_in_order() {
    let mut file = song();
    // reverse the notes in time
    file.process_timed_events_matching(|timed| timed.time = 192 - timed.time, is_note)
        .unwrap();

    let bytes = file.write(&WritingSettings::default()).unwrap();
    let read = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
    let notes = read.track_chunks().nth(1).unwrap();
    assert_eq!(
        notes.events(),
        [note_off(0, 62), note_off(96, 60), note_on(0, 62), note_on(96, 60)]
    );
}

#[test]
fn merged_view_spans_tracks() {
    let file = song();
    let times: Vec<u64> = file.timed_events().iter().map(|t| t.time).collect();
    assert_eq!(times, [0, 0, 96, 96, 192, 384]);

    let first = file.timed_events()[0];
    assert_eq!(first.event, &marker(0, "intro"));
}

#[test]
fn earlier_tracks_stay_processed_on_failure() {
    let mut file = song();
    let err = file
        .process_timed_events(|timed| {
            if timed.time == 192 {
                timed.time = -1;
            } else {
                timed.time += 1;
            }
        })
        .unwrap_err();
    assert_eq!(err, ProcessError::NegativeTime { index: 3, time: -1 });

    let tracks: Vec<_> = file.track_chunks().collect();
    // the marker track was already shifted
    assert_eq!(tracks[0].events(), [marker(1, "intro"), marker(384, "verse")]);
    // the failing track kept its original timing
    assert_eq!(
        tracks[1].events(),
        [note_on(0, 60), note_off(96, 60), note_on(0, 62), note_off(96, 62)]
    );
}

#[test]
fn quantize_to_a_grid() {
    let mut track = TrackChunk::new(vec![
        note_on(5, 60),
        note_off(40, 60),
        note_on(10, 64),
        note_off(50, 64),
    ]);
    let grid = 24;
    track
        .process_timed_events(|timed| {
            timed.time = (timed.time + grid / 2) / grid * grid;
        })
        .unwrap();
    // 5 -> 0, 45 -> 48, 55 -> 48, 105 -> 96
    assert_eq!(
        track.events(),
        [note_on(0, 60), note_off(48, 60), note_on(0, 64), note_off(48, 64)]
    );
}

#[test]
fn fallible_actions() {
    #[derive(Debug, PartialEq)]
    enum EditError {
        Engine(ProcessError),
        TooLate(i64),
    }
    impl From<ProcessError> for EditError {
        fn from(value: ProcessError) -> Self {
            Self::Engine(value)
        }
    }

    let mut tracks = vec![TrackChunk::new(vec![note_on(0, 60), note_off(1000, 60)])];
    let limit = 500;
    let result = tracks.try_process_timed_events(
        |timed| {
            if timed.time > limit {
                return Err(EditError::TooLate(timed.time));
            }
            Ok(())
        },
        |_| Ok(true),
    );
    assert_eq!(result, Err(EditError::TooLate(1000)));
    assert_eq!(tracks[0].duration(), 1000);

    let result = tracks.try_process_timed_events::<EditError, _, _>(
        |timed| {
            timed.time *= 2;
            Ok(())
        },
        |timed| Ok(timed.index() == 1),
    );
    assert_eq!(result, Ok(1));
    assert_eq!(tracks[0].duration(), 2000);
}
