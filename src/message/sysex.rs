use crate::writer::{Sink, WriteCounter};
use alloc::vec::Vec;

/// Which status byte introduced a system exclusive event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysExKind {
    /// `F0`, a complete message or the first packet of one
    #[default]
    Normal,
    /// `F7`, a continuation packet or an arbitrary escaped byte sequence
    Escape,
}

impl SysExKind {
    /// The status byte.
    pub const fn status(self) -> u8 {
        match self {
            Self::Normal => 0xF0,
            Self::Escape => 0xF7,
        }
    }
}

#[doc = r#"
A system exclusive event

```text
F0 <length: vlq> <bytes to be transmitted after F0>
F7 <length: vlq> <all bytes to be transmitted>
```

The data is kept exactly as stored, including any terminating `F7`.
"#]
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    /// Introducing status
    pub kind: SysExKind,
    /// Payload
    pub data: Vec<u8>,
}

impl SysExEvent {
    /// Create a system exclusive event
    pub fn new(kind: SysExKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// Number of content bytes, not counting the status and the length.
    pub fn content_len(&self) -> usize {
        let mut counter = WriteCounter::default();
        self.write_content(&mut counter);
        counter.0
    }

    pub(crate) fn write_content<S: Sink>(&self, out: &mut S) {
        out.put(&self.data);
    }
}
