#![doc = r#"
SMPTE (Society of Motion Picture and Television Engineers) frame rates

A MIDI file can time its events in musical time (ticks per quarter note) or in
absolute SMPTE time, where the header division holds a frame rate and a number of
ticks per frame. The same four rates are used by the SMPTE offset meta event:

- 24 fps: Film standard
- 25 fps: PAL/SECAM video standard
- 29.97 fps: NTSC color video, "drop frame"
- 30 fps: NTSC black & white video, some digital formats
"#]

use crate::SmpteError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The possible FPS (Frames Per Second) for MIDI tracks and files
///
/// The discriminant is the two-bit rate code used by the
/// [`SmpteOffset`](crate::message::SmpteOffset) meta event. The header chunk division
/// stores the rate as a negative number instead, see [`SmpteFps::from_division`].
///
/// # Drop-Frame Timecode
///
/// The "TwentyNine" variant represents 29.97 fps, also known as "drop-frame" timecode.
/// Despite the name, no actual frames are dropped - the time code numbering skips
/// certain values to keep the timecode aligned with real time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[num_enum(error_type(name = SmpteError, constructor = SmpteError::FrameRate))]
#[repr(u8)]
pub enum SmpteFps {
    /// 24 frames per second - Standard film rate
    TwentyFour = 0,
    /// 25 frames per second - PAL/SECAM television standard
    TwentyFive = 1,
    /// 29.97 frames per second (30000/1001) - NTSC color television drop-frame rate
    TwentyNine = 2,
    /// 30 frames per second - NTSC black & white, some digital formats
    Thirty = 3,
}

impl SmpteFps {
    /// Reads the frame rate from the high byte of a header division, which holds
    /// -24, -25, -29 or -30.
    pub const fn from_division(byte: i8) -> Option<Self> {
        match byte {
            -24 => Some(Self::TwentyFour),
            -25 => Some(Self::TwentyFive),
            -29 => Some(Self::TwentyNine),
            -30 => Some(Self::Thirty),
            _ => None,
        }
    }

    /// The high byte of a header division for this rate.
    pub const fn to_division(self) -> i8 {
        match self {
            Self::TwentyFour => -24,
            Self::TwentyFive => -25,
            Self::TwentyNine => -29,
            Self::Thirty => -30,
        }
    }

    /// Get the nominal frame rate as an integer.
    ///
    /// Drop-frame 29.97 fps returns 30 here, as MIDI uses the nominal rate
    /// for frame numbering.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }
    /// Get the actual frame rate as a floating-point value.
    ///
    /// This returns the precise frame rate, including the fractional rate for
    /// drop-frame timecode (29.97 fps = 30000/1001).
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// The precise value for NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;

#[test]
fn division_codes() {
    for fps in [
        SmpteFps::TwentyFour,
        SmpteFps::TwentyFive,
        SmpteFps::TwentyNine,
        SmpteFps::Thirty,
    ] {
        assert_eq!(SmpteFps::from_division(fps.to_division()), Some(fps));
    }
    assert_eq!(SmpteFps::from_division(-28), None);
    assert_eq!(SmpteFps::try_from(5), Err(SmpteError::FrameRate(5)));
}
