#![doc = r#"
Exotically-sized integers used by the MIDI file format.

Channel numbers are nibbles, data bytes keep their top bit clear, pitch bends are
two data bytes glued together and tempos are three bytes wide. Each width gets a
wrapper whose checked constructor refuses values that do not fit.
"#]

use crate::OutOfRangeError;
use core::fmt;

macro_rules! restricted_int {
    {$(#[$attr:meta])* $name:ident : $inner:ty => $bits:expr} => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        #[allow(non_camel_case_types)]
        pub struct $name($inner);

        impl $name {
            /// Number of significant bits.
            pub const BITS: u32 = $bits;
            const MASK: $inner = (1 << $bits) - 1;
            /// The largest representable value.
            pub const MAX: $name = $name(Self::MASK);
            /// Zero.
            pub const ZERO: $name = $name(0);

            /// Creates the integer from a literal.
            ///
            /// # Panics
            /// if `raw` does not fit. Use [`Self::try_new`] for untrusted values.
            pub const fn new(raw: $inner) -> $name {
                if raw > Self::MASK {
                    panic!("value does not fit the restricted integer");
                }
                $name(raw)
            }

            /// Creates the integer, failing if `raw` has bits set above the width.
            pub fn try_new(raw: $inner) -> Result<$name, OutOfRangeError> {
                if raw > Self::MASK {
                    Err(OutOfRangeError {
                        bits: $bits,
                        value: u32::from(raw),
                    })
                } else {
                    Ok($name(raw))
                }
            }

            /// Creates the integer by masking off the extra bits.
            pub const fn from_int_lossy(raw: $inner) -> $name {
                $name(raw & Self::MASK)
            }

            /// Creates the integer, clamping `raw` to [`Self::MAX`].
            pub const fn saturating(raw: $inner) -> $name {
                if raw > Self::MASK {
                    Self::MAX
                } else {
                    $name(raw)
                }
            }

            /// Returns the inner integer.
            pub const fn as_int(self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = OutOfRangeError;
            fn try_from(raw: $inner) -> Result<$name, OutOfRangeError> {
                $name::try_new(raw)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> $inner {
                value.0
            }
        }

        impl PartialEq<$inner> for $name {
            fn eq(&self, rhs: &$inner) -> bool {
                self.0 == *rhs
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

restricted_int! {
    /// A 4-bit integer, such as a channel number.
    u4: u8 => 4
}
restricted_int! {
    /// A 7-bit integer, such as a note number or a velocity.
    u7: u8 => 7
}
restricted_int! {
    /// A 14-bit integer made of two data bytes, such as a pitch bend.
    u14: u16 => 14
}
restricted_int! {
    /// A 24-bit integer, such as a tempo in microseconds per quarter note.
    u24: u32 => 24
}

/// Packs two nibbles into one byte, `head` in the high half.
pub const fn combine_nibbles(head: u4, tail: u4) -> u8 {
    (head.0 << 4) | tail.0
}

/// The high nibble of `byte`.
pub const fn head_nibble(byte: u8) -> u4 {
    u4(byte >> 4)
}

/// The low nibble of `byte`.
pub const fn tail_nibble(byte: u8) -> u4 {
    u4(byte & 0x0F)
}

/// Glues two data bytes into a 14-bit value, `head` holding the high 7 bits.
pub const fn combine_u7(head: u7, tail: u7) -> u14 {
    u14(((head.0 as u16) << 7) | tail.0 as u16)
}

/// Splits a 14-bit value into its high and low 7 bits.
pub const fn split_u14(value: u14) -> (u7, u7) {
    (u7((value.0 >> 7) as u8), u7((value.0 & 0x7F) as u8))
}

#[test]
fn construction_checks_width() {
    assert!(u4::try_new(15).is_ok());
    assert_eq!(
        u4::try_new(16),
        Err(OutOfRangeError { bits: 4, value: 16 })
    );
    assert!(u7::try_new(0x80).is_err());
    assert!(u14::try_new(0x3FFF).is_ok());
    assert!(u14::try_new(0x4000).is_err());
    assert_eq!(u24::MAX.as_int(), 0xFF_FFFF);
}

#[test]
fn lossy_and_saturating() {
    assert_eq!(u7::from_int_lossy(0x85), 5);
    assert_eq!(u7::saturating(0x85), 127);
    assert_eq!(u4::saturating(3), 3);
}

#[test]
fn nibbles() {
    let byte = combine_nibbles(u4::new(0x9), u4::new(0x3));
    assert_eq!(byte, 0x93);
    assert_eq!(head_nibble(byte), 0x9);
    assert_eq!(tail_nibble(byte), 0x3);
}

#[test]
fn seven_bit_halves() {
    let value = combine_u7(u7::new(0x40), u7::new(0x01));
    assert_eq!(value, 0x2001);
    assert_eq!(split_u14(value), (u7::new(0x40), u7::new(0x01)));
}
