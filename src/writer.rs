#![doc = r#"
Byte sinks and settings used to encode MIDI files.

Encoders write into anything implementing [`Sink`]. Sizes are never computed by a
separate routine: running an encoder into a [`WriteCounter`] tells how many bytes it
would produce.
"#]

use alloc::vec::Vec;

/// A destination for encoded bytes.
pub trait Sink {
    /// Append `bytes`
    fn put(&mut self, bytes: &[u8]);

    /// Append a single byte
    fn put_u8(&mut self, byte: u8) {
        self.put(&[byte]);
    }
}

impl Sink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
    fn put_u8(&mut self, byte: u8) {
        self.push(byte);
    }
}

/// A sink that only counts the bytes written into it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteCounter(pub usize);

impl Sink for WriteCounter {
    fn put(&mut self, bytes: &[u8]) {
        self.0 += bytes.len();
    }
}

/// How strictly the file layout is checked before writing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compatibility {
    /// Require a header chunk, and exactly one track in single track files
    #[default]
    Standard,
    /// Write whatever chunks the file holds
    Lenient,
}

/// Options for encoding.
///
/// Chunk lengths and the header's track count are always recomputed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritingSettings {
    /// Layout checks
    pub compatibility: Compatibility,
    /// Omit the status byte of a channel event when it repeats the previous one
    pub use_running_status: bool,
    /// Write note-off events as note-on events with zero velocity
    pub note_off_as_silent_note_on: bool,
}

impl WritingSettings {
    /// Set the compatibility mode
    pub const fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }
    /// Enable or disable running status
    pub const fn with_running_status(mut self, enabled: bool) -> Self {
        self.use_running_status = enabled;
        self
    }
    /// Enable or disable writing note-offs as silent note-ons
    pub const fn with_note_off_as_silent_note_on(mut self, enabled: bool) -> Self {
        self.note_off_as_silent_note_on = enabled;
        self
    }
}

#[test]
fn counter_matches_vec() {
    let mut bytes: Vec<u8> = Vec::new();
    let mut counter = WriteCounter::default();
    for sink in [&mut bytes as &mut dyn Sink, &mut counter] {
        sink.put(b"MTrk");
        sink.put_u8(0);
    }
    assert_eq!(counter.0, bytes.len());
}
