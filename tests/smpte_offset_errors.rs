use midifile::prelude::*;
use pretty_assertions::assert_eq;

/// The five content bytes of an SMPTE offset event
fn smpte_bytes(fps_bits: u8, hour: u8, minute: u8, second: u8, frame: u8, subframe: u8) -> [u8; 5] {
    [(fps_bits << 5) | (hour & 0x1F), minute, second, frame, subframe]
}

#[test]
fn invalid_frame_rate_code() {
    for code in [4, 5, 7] {
        let data = smpte_bytes(code, 12, 30, 15, 10, 50);
        assert_eq!(SmpteOffset::parse(data), Err(SmpteError::FrameRate(code)));
    }
}

#[test]
fn invalid_hour() {
    let data = [0x18, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Hour(24)));

    let data = [0x1F, 0x00, 0x00, 0x00, 0x00];
    assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Hour(31)));
}

#[test]
fn invalid_minute_and_second() {
    for minute in [60, 61, 99, 255] {
        let data = smpte_bytes(0, 12, minute, 30, 15, 50);
        assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Minute(minute)));
    }
    for second in [60, 255] {
        let data = smpte_bytes(1, 12, 30, second, 15, 50);
        assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Second(second)));
    }
}

#[test]
fn invalid_subframe() {
    for subframe in [100, 150, 255] {
        let data = smpte_bytes(2, 12, 30, 45, 15, subframe);
        assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Subframe(subframe)));
    }
}

#[test]
fn frame_limits_follow_the_rate() {
    let cases = [
        (SmpteFps::TwentyFour, 0, 24),
        (SmpteFps::TwentyFive, 1, 25),
        (SmpteFps::TwentyNine, 2, 30),
        (SmpteFps::Thirty, 3, 30),
    ];
    for (fps, bits, first_invalid) in cases {
        let data = smpte_bytes(bits, 12, 30, 45, first_invalid - 1, 50);
        assert_eq!(SmpteOffset::parse(data).map(|o| o.fps), Ok(fps));

        let data = smpte_bytes(bits, 12, 30, 45, first_invalid, 50);
        assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Frame(first_invalid)));
    }
}

#[test]
fn first_error_wins() {
    let data = smpte_bytes(0, 25, 61, 30, 15, 50);
    assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Hour(25)));

    let data = smpte_bytes(1, 23, 60, 60, 15, 50);
    assert_eq!(SmpteOffset::parse(data), Err(SmpteError::Minute(60)));
}

#[test]
fn hour_bits_do_not_leak_into_the_rate() {
    for bits in 0..=3u8 {
        for hour in 0..=23 {
            let offset = SmpteOffset::parse([(bits << 5) | hour, 30, 45, 15, 50]).unwrap();
            assert_eq!(u8::from(offset.fps), bits);
            assert_eq!(offset.hour, hour);
        }
    }
}

#[test]
fn drop_frame_precision() {
    let offset = SmpteOffset::parse(smpte_bytes(2, 0, 0, 0, 1, 0)).unwrap();
    // one frame lasts 1001/30000 seconds
    let exact_frame_duration = 1_001_000.0 / 30.0;
    assert!((offset.as_micros() - exact_frame_duration).abs() < 0.001);

    let midnight = SmpteOffset::parse(smpte_bytes(1, 0, 0, 0, 0, 0)).unwrap();
    assert_eq!(midnight.as_micros(), 0.0);
}

#[test]
fn short_content_is_reported() {
    // FF 54 with 3 content bytes
    let bytes = [0x00, 0xFF, 0x54, 0x03, 0x00, 0x00, 0x00];
    let err = MidiEvent::decode(&bytes, &ReadingSettings::default()).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Event(EventError::ContentTooShort {
            event: "SmpteOffset",
            expected: 5,
            found: 3,
        }))
    );
}
