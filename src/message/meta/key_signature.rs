use super::ParamCheck;
use crate::{InvalidParameterValue, reader::ReadResult, writer::Sink};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Major or minor mode of a [`KeySignature`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Scale {
    /// `0`
    #[default]
    Major = 0,
    /// `1`
    Minor = 1,
}

#[doc = r#"
FF 59 02 sf mi Key Signature

`sf` is the number of sharps (positive) or flats (negative), `-7..=7`.
`mi` is `0` for a major key and `1` for a minor key.
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    key: i8,
    scale: Scale,
}

impl KeySignature {
    /// Lowest key, seven flats
    pub const MIN_KEY: i8 = -7;
    /// Highest key, seven sharps
    pub const MAX_KEY: i8 = 7;

    /// Create a key signature, failing if `key` is outside of `-7..=7`.
    pub const fn try_new(key: i8, scale: Scale) -> Result<Self, InvalidParameterValue> {
        if key < Self::MIN_KEY || key > Self::MAX_KEY {
            return Err(InvalidParameterValue {
                event: "KeySignature",
                field: "Key",
                value: key as i32,
            });
        }
        Ok(Self { key, scale })
    }

    /// Sharps (positive) or flats (negative)
    pub const fn key(&self) -> i8 {
        self.key
    }

    /// Major or minor
    pub const fn scale(&self) -> Scale {
        self.scale
    }

    pub(super) fn read(check: &mut ParamCheck<'_, '_>) -> ReadResult<Self> {
        let [raw_key, raw_scale] = check.fixed::<2>()?;
        let key = check.clamp(raw_key as i8, Self::MIN_KEY, Self::MAX_KEY, "Key")?;
        let scale = check.clamp(raw_scale, Scale::Major.into(), Scale::Minor.into(), "Scale")?;
        Ok(Self {
            key,
            scale: Scale::try_from(scale).unwrap_or_default(),
        })
    }

    pub(super) fn write<S: Sink>(&self, out: &mut S) {
        out.put(&[self.key as u8, self.scale.into()]);
    }
}
