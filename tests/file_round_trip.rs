use midifile::prelude::*;
use pretty_assertions::assert_eq;

fn conductor_track() -> TrackChunk {
    TrackChunk::new(vec![
        MidiEvent::new(0, MetaEvent::SequenceNumber(Some(7))),
        MidiEvent::new(0, MetaEvent::SequenceTrackName(b"Conductor".to_vec())),
        MidiEvent::new(0, MetaEvent::CopyrightNotice(b"(c) nobody".to_vec())),
        MidiEvent::new(0, MetaEvent::SetTempo(u24::new(500_000))),
        MidiEvent::new(0, MetaEvent::TimeSignature(TimeSignature::default())),
        MidiEvent::new(
            0,
            MetaEvent::KeySignature(KeySignature::try_new(-3, Scale::Minor).unwrap()),
        ),
        MidiEvent::new(
            0,
            MetaEvent::SmpteOffset(SmpteOffset::new(SmpteFps::Thirty, 1, 2, 3, 4, 5).unwrap()),
        ),
        MidiEvent::new(480, MetaEvent::Marker(b"verse".to_vec())),
        MidiEvent::new(0, MetaEvent::CuePoint(b"lights".to_vec())),
        MidiEvent::new(0, MetaEvent::SequencerSpecific(vec![0x00, 0x00, 0x41])),
        MidiEvent::new(0, MetaEvent::Unknown {
            status: 0x60,
            data: vec![1, 2],
        }),
    ])
}

fn piano_track() -> TrackChunk {
    let ch = u4::new(3);
    TrackChunk::new(vec![
        MidiEvent::new(0, MetaEvent::InstrumentName(b"Piano".to_vec())),
        MidiEvent::new(0, MetaEvent::ChannelPrefix(ch)),
        MidiEvent::new(0, MetaEvent::PortPrefix(u7::new(1))),
        MidiEvent::new(0, ChannelEvent::new(ch, ChannelMessage::ProgramChange {
            program: u7::new(1),
        })),
        MidiEvent::new(0, ChannelEvent::new(ch, ChannelMessage::ControlChange {
            controller: u7::new(7),
            value: u7::new(100),
        })),
        MidiEvent::new(0, ChannelEvent::note_on(ch, u7::new(60), u7::new(90))),
        MidiEvent::new(0, ChannelEvent::note_on(ch, u7::new(64), u7::new(90))),
        MidiEvent::new(10, ChannelEvent::new(ch, ChannelMessage::PolyphonicKeyPressure {
            note: u7::new(60),
            pressure: u7::new(20),
        })),
        MidiEvent::new(10, ChannelEvent::new(ch, ChannelMessage::ChannelPressure {
            pressure: u7::new(30),
        })),
        MidiEvent::new(10, ChannelEvent::new(ch, ChannelMessage::PitchBend {
            value: u14::new(0x2000),
        })),
        MidiEvent::new(0, MetaEvent::Lyric(b"la".to_vec())),
        MidiEvent::new(450, ChannelEvent::note_off(ch, u7::new(60), u7::new(0))),
        MidiEvent::new(0, ChannelEvent::note_off(ch, u7::new(64), u7::new(0))),
        MidiEvent::new(
            0,
            SysExEvent::new(SysExKind::Normal, [0x7E, 0x7F, 0x09, 0x01, 0xF7]),
        ),
        MidiEvent::new(0, SysExEvent::new(SysExKind::Escape, [0xF3, 0x01])),
        MidiEvent::new(0x0FFF_FFFF, MetaEvent::Text(b"far away".to_vec())),
    ])
}

fn song() -> MidiFile {
    let mut file = MidiFile::with_tracks(
        FormatType::Simultaneous,
        Timing::new_ticks_per_quarter_note(480),
        [conductor_track(), piano_track()],
    );
    file.chunks_mut().push(Chunk::Unknown(UnknownChunk::new(
        ChunkId(*b"XFKM"),
        b"karaoke".to_vec(),
    )));
    file
}

#[test]
fn every_event_survives() {
    let file = song();
    for settings in [
        WritingSettings::default(),
        WritingSettings::default().with_running_status(true),
    ] {
        let bytes = file.write(&settings).unwrap();
        let read = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
        assert_eq!(read, file);
        // nothing is lost the second time either
        assert_eq!(read.write(&settings).unwrap(), bytes);
    }
}

#[test]
fn running_status_is_smaller() {
    let file = song();
    let plain = file.write(&WritingSettings::default()).unwrap();
    let running = file
        .write(&WritingSettings::default().with_running_status(true))
        .unwrap();
    // two note ons and two note offs in a row, one status byte saved in each pair
    assert_eq!(plain.len() - running.len(), 2);
}

#[test]
fn silent_note_on_is_read_as_is() {
    let file = MidiFile::with_tracks(
        FormatType::SingleMultiChannel,
        Timing::default(),
        [TrackChunk::new(vec![
            MidiEvent::new(0, ChannelEvent::note_on(u4::new(0), u7::new(60), u7::new(80))),
            MidiEvent::new(96, ChannelEvent::note_off(u4::new(0), u7::new(60), u7::new(64))),
        ])],
    );
    let settings = WritingSettings::default()
        .with_running_status(true)
        .with_note_off_as_silent_note_on(true);
    let bytes = file.write(&settings).unwrap();
    assert_eq!(
        bytes[22..],
        [0x00, 0x90, 60, 80, 0x60, 60, 0, 0x00, 0xFF, 0x2F, 0x00]
    );

    let read = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
    let track = read.track_chunks().next().unwrap();
    assert_eq!(
        track.events()[1],
        MidiEvent::new(96, ChannelEvent::note_on(u4::new(0), u7::new(60), u7::new(0)))
    );
}

#[test]
fn hand_written_file() {
    let bytes = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 2, 0, 2, 0x01, 0xE0, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 15, //
        0x00, 0xC1, 0x05, // program change, channel 1
        0x83, 0x60, 0x91, 0x40, 0x7F, // 480 ticks later
        0x10, 0x40, 0x00, // running status
        0x00, 0xFF, 0x2F, 0x00, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 4, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let file = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
    assert_eq!(file.format(), Some(FormatType::SequentiallyIndependent));
    assert_eq!(file.timing(), Timing::new_ticks_per_quarter_note(480));

    let tracks: Vec<_> = file.track_chunks().collect();
    assert_eq!(tracks.len(), 2);
    assert!(tracks[1].is_empty());

    let ch = u4::new(1);
    assert_eq!(
        tracks[0].events(),
        [
            MidiEvent::new(0, ChannelEvent::new(ch, ChannelMessage::ProgramChange {
                program: u7::new(5)
            })),
            MidiEvent::new(480, ChannelEvent::note_on(ch, u7::new(0x40), u7::new(0x7F))),
            MidiEvent::new(16, ChannelEvent::note_on(ch, u7::new(0x40), u7::new(0))),
        ]
    );
    assert_eq!(tracks[0].duration(), 496);
}

#[test]
fn io_round_trip() {
    let file = song();
    let mut sink = Vec::new();
    file.write_to(&mut sink, &WritingSettings::default()).unwrap();
    let read = MidiFile::read_from(sink.as_slice(), &ReadingSettings::default()).unwrap();
    assert_eq!(read, file);
}

#[test]
fn builder_from_chunks() {
    let mut builder = MidiFileBuilder::new(ReadingSettings::default());
    builder.handle_chunk(Chunk::Header(HeaderChunk::new(
        FormatType::Simultaneous,
        1,
        Timing::new_smpte(SmpteFps::TwentyFive, 40),
    )));
    builder.handle_chunk(Chunk::Track(piano_track()));
    let file = builder.build().unwrap();
    assert_eq!(file.timing(), Timing::new_smpte(SmpteFps::TwentyFive, 40));

    let bytes = file.write(&WritingSettings::default()).unwrap();
    assert_eq!(MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap(), file);
}

#[test]
fn single_events() {
    let event = MidiEvent::new(
        200,
        ChannelEvent::new(u4::new(2), ChannelMessage::PitchBend {
            value: u14::new(0x3FFF),
        }),
    );
    let bytes = event.encode().unwrap();
    assert_eq!(bytes, [0x81, 0x48, 0xE2, 0x7F, 0x7F]);
    assert_eq!(event.encoded_len(), Ok(5));
    assert_eq!(
        MidiEvent::decode(&bytes, &ReadingSettings::default()).unwrap(),
        (event, 5)
    );
}
