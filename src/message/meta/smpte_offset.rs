#![doc = r#"
SMPTE Offset - Precise time positioning for a track

# What is SMPTE Offset?

SMPTE Offset is a MIDI meta-event that specifies an exact starting time for a track
using SMPTE time code format. This allows MIDI sequences to be precisely synchronized
with video, film, or other time-based media.

# Format

```text
FF 54 05 hr mn se fr ff
```

- `hr`: `0rrhhhhh`, where `rr` is the frame rate code and `hhhhh` the hour (0-23)
- `mn`: Minutes (0-59)
- `se`: Seconds (0-59)
- `fr`: Frames (below the frame rate)
- `ff`: Fractional frames in 100ths (0-99)
"#]

use super::ParamCheck;
use crate::{SmpteError, file::SmpteFps, reader::ReadResult, writer::Sink};

/// A representation of a MIDI track's starting position in SMPTE time code.
///
/// The fields are public. [`SmpteOffset::new`] checks every range; values stored
/// directly are written as they are, with the hour truncated to its 5 bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate for this offset.
    ///
    /// **Important**: This should match the file's frame rate when the MIDI file
    /// uses SMPTE-based timing.
    pub fps: SmpteFps,
    /// Hour component of the time code (0-23).
    pub hour: u8,
    /// Minute component of the time code (0-59).
    pub minute: u8,
    /// Second component of the time code (0-59).
    pub second: u8,
    /// Frame number within the current second.
    ///
    /// Valid range depends on the frame rate:
    /// - 24 fps: 0-23
    /// - 25 fps: 0-24
    /// - 29.97 fps: 0-29
    /// - 30 fps: 0-29
    pub frame: u8,
    /// Subframe component, 1/100th of a frame (0-99).
    pub subframe: u8,
}

impl SmpteOffset {
    /// Create an offset, checking every component against its range.
    pub const fn new(
        fps: SmpteFps,
        hour: u8,
        minute: u8,
        second: u8,
        frame: u8,
        subframe: u8,
    ) -> Result<Self, SmpteError> {
        if hour > 23 {
            return Err(SmpteError::Hour(hour));
        }
        if minute > 59 {
            return Err(SmpteError::Minute(minute));
        }
        if second > 59 {
            return Err(SmpteError::Second(second));
        }
        if frame >= fps.as_division() {
            return Err(SmpteError::Frame(frame));
        }
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// Parse the five content bytes of the event, rejecting any value out of range.
    pub fn parse(data: [u8; 5]) -> Result<Self, SmpteError> {
        let [hr, minute, second, frame, subframe] = data;
        let fps = SmpteFps::try_from(hr >> 5)?;
        Self::new(fps, hr & 0b0001_1111, minute, second, frame, subframe)
    }

    /// Convert this SMPTE offset to microseconds.
    pub const fn as_micros(&self) -> f64 {
        ((((self.hour as u64 * 3600) + (self.minute as u64) * 60 + self.second as u64) * 1_000_000)
            as f64)
            + ((self.frame as u64) * 1_000_000) as f64 / self.fps.as_f64()
            + ((self.subframe as u32) * 10_000) as f64 / self.fps.as_f64()
    }

    pub(super) fn read(check: &mut ParamCheck<'_, '_>) -> ReadResult<Self> {
        let [hr, minute, second, frame, subframe] = check.fixed::<5>()?;
        let code = check.clamp(hr >> 5, 0, 3, "FrameRate")?;
        let fps = SmpteFps::try_from(code).unwrap_or(SmpteFps::Thirty);
        Ok(Self {
            fps,
            hour: check.clamp(hr & 0b0001_1111, 0, 23, "Hours")?,
            minute: check.clamp(minute, 0, 59, "Minutes")?,
            second: check.clamp(second, 0, 59, "Seconds")?,
            frame: check.clamp(frame, 0, fps.as_division() - 1, "Frames")?,
            subframe: check.clamp(subframe, 0, 99, "SubFrames")?,
        })
    }

    pub(super) fn write<S: Sink>(&self, out: &mut S) {
        let code: u8 = self.fps.into();
        out.put(&[
            (code << 5) | (self.hour & 0b0001_1111),
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]);
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // the bytes after 00 FF 54 05
    let offset = SmpteOffset::parse([0x41, 0x17, 0x2D, 0x0C, 0x22]).unwrap();

    assert_eq!(offset.fps, SmpteFps::TwentyNine);
    assert_eq!(offset.hour, 1);
    assert_eq!(offset.minute, 23);
    assert_eq!(offset.second, 45);
    assert_eq!(offset.frame, 12);
    assert_eq!(offset.subframe, 34);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let err = SmpteOffset::parse([0x7F, 0x17, 0x2D, 0x0C, 0x22]).unwrap_err();
    assert_eq!(err, SmpteError::Hour(31));

    let err = SmpteOffset::parse([0x41, 0x50, 0x2D, 0x0C, 0x22]).unwrap_err();
    assert_eq!(err, SmpteError::Minute(80));

    let err = SmpteOffset::parse([0x81, 0x17, 0x2D, 0x0C, 0x22]).unwrap_err();
    assert_eq!(err, SmpteError::FrameRate(4));

    // 25 fps has frames 0 through 24
    let err = SmpteOffset::parse([0x21, 0x17, 0x2D, 0x19, 0x22]).unwrap_err();
    assert_eq!(err, SmpteError::Frame(25));
}

#[test]
fn micros() {
    let offset = SmpteOffset::new(SmpteFps::TwentyFive, 0, 0, 1, 5, 0).unwrap();
    assert_eq!(offset.as_micros(), 1_200_000.);
}
