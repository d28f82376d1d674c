mod smpte;
pub use smpte::*;

use crate::HeaderError;

/// The header timing type.
///
/// This is either the number of ticks per quarter note or the alternative SMPTE
/// format, stored in the 16-bit division field of the header chunk. The top bit of
/// the division selects the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(TicksPerQuarterNote),

    /// The midi file's delta times are defined using an SMPTE and MIDI Time Code
    Smpte(SmpteHeader),
}

impl Default for Timing {
    /// 96 ticks per quarter note
    fn default() -> Self {
        Self::new_ticks_per_quarter_note(96)
    }
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// Only 15 bits are stored: the leading bit of `tpqn` is masked off, so `0x8000`
    /// becomes 0 and `0x8060` becomes 96. Use
    /// [`try_new_ticks_per_quarter_note`](Self::try_new_ticks_per_quarter_note) to
    /// reject such values instead.
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote(tpqn & 0x7FFF))
    }

    /// Like [`new_ticks_per_quarter_note`](Self::new_ticks_per_quarter_note), but
    /// returns `None` if `tpqn` does not fit in 15 bits.
    pub const fn try_new_ticks_per_quarter_note(tpqn: u16) -> Option<Self> {
        if tpqn > 0x7FFF {
            return None;
        }
        Some(Self::new_ticks_per_quarter_note(tpqn))
    }

    /// Define the timing in terms of fps and ticks per frame
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: u8) -> Self {
        Self::Smpte(SmpteHeader {
            fps,
            ticks_per_frame,
        })
    }

    /// Decodes the division field of a header chunk.
    pub fn from_division(division: u16) -> Result<Self, HeaderError> {
        let [high, low] = division.to_be_bytes();
        if high & 0x80 == 0 {
            return Ok(Self::new_ticks_per_quarter_note(division));
        }
        let fps =
            SmpteFps::from_division(high as i8).ok_or(HeaderError::InvalidSmpteFps(high as i8))?;
        Ok(Self::new_smpte(fps, low))
    }

    /// Encodes the timing as the division field of a header chunk.
    pub const fn division(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(t) => t.0,
            Self::Smpte(s) => u16::from_be_bytes([s.fps.to_division() as u8, s.ticks_per_frame]),
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.ticks_per_quarter_note()),
            _ => None,
        }
    }
}

/// A representation of the `tpqn` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.0
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    fps: SmpteFps,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }
}

#[test]
fn divisions() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        Timing::from_division(0x0060),
        Ok(Timing::new_ticks_per_quarter_note(96))
    );
    // -25 fps, 40 ticks per frame
    let smpte = Timing::from_division(0xE728).unwrap();
    assert_eq!(smpte, Timing::new_smpte(SmpteFps::TwentyFive, 40));
    assert_eq!(smpte.division(), 0xE728);
    assert_eq!(smpte.ticks_per_quarter_note(), None);

    assert_eq!(
        Timing::from_division(0xE400),
        Err(HeaderError::InvalidSmpteFps(-28))
    );
}

#[test]
fn ticks_per_quarter_note_has_15_bits() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        Timing::new_ticks_per_quarter_note(0x8060).ticks_per_quarter_note(),
        Some(96)
    );
    assert_eq!(
        Timing::try_new_ticks_per_quarter_note(0x7FFF),
        Some(Timing::new_ticks_per_quarter_note(0x7FFF))
    );
    assert_eq!(Timing::try_new_ticks_per_quarter_note(0x8000), None);
}
