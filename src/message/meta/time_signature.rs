use super::ParamCheck;
use crate::{reader::ReadResult, writer::Sink};

/// FF 58 04 nn dd cc bb Time Signature
///
/// The denominator is stored as a power of two: `6/8` is `nn = 6, dd = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// Negative power of two of the beat unit
    pub denominator_power: u8,
    /// MIDI clocks per metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes per MIDI quarter note (24 clocks)
    pub thirty_seconds_per_quarter: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator_power: 2,
            clocks_per_click: 24,
            thirty_seconds_per_quarter: 8,
        }
    }
}

impl TimeSignature {
    /// The beat unit, or `None` if the stored power does not fit a `u32`.
    pub const fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_power as u32)
    }

    pub(super) fn read(check: &mut ParamCheck<'_, '_>) -> ReadResult<Self> {
        let [numerator, denominator_power, clocks_per_click, thirty_seconds_per_quarter] =
            check.fixed::<4>()?;
        Ok(Self {
            numerator,
            denominator_power,
            clocks_per_click,
            thirty_seconds_per_quarter,
        })
    }

    pub(super) fn write<S: Sink>(&self, out: &mut S) {
        out.put(&[
            self.numerator,
            self.denominator_power,
            self.clocks_per_click,
            self.thirty_seconds_per_quarter,
        ]);
    }
}
