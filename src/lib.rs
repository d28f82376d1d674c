#![doc = r#"
Read, edit and write Standard MIDI Files

A [`MidiFile`](file::MidiFile) is decoded from bytes with
[`MidiFile::parse`](file::MidiFile::parse), edited through its
[`TrackChunk`](file::TrackChunk)s and [`MidiEvent`](message::MidiEvent)s, and encoded
again with [`MidiFile::write`](file::MidiFile::write). How forgiving the decoder is with
malformed input is set through [`ReadingSettings`](reader::ReadingSettings), how the
encoder behaves through [`WritingSettings`](writer::WritingSettings).

Events are stored with delta-times. The [`timed`] module lets you work with absolute
times instead: move events around, and the delta-times and order are rebuilt for you.

```rust
use midifile::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 60, 100,
    0x60, 0x80, 60, 0,
    0x00, 0xFF, 0x2F, 0x00,
];

let mut file = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
assert_eq!(file.timing(), Timing::new_ticks_per_quarter_note(96));

// twice as slow
file.process_timed_events(|timed| timed.time *= 2).unwrap();
let track = file.track_chunks().next().unwrap();
assert_eq!(track.events()[1].delta_time, 192);

let written = file.write(&WritingSettings::default()).unwrap();
assert_eq!(written[26..28], [0x81, 0x40]);
```

# Features

- `std` (default): `std::io` readers and writers.
- `tracing` (default): logs recovered problems through [`tracing`](https://docs.rs/tracing).
- `serde`: `Serialize`/`Deserialize` for the data types.
"#]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod num;
pub mod reader;
pub mod timed;
pub mod vlq;
pub mod writer;

/// Commonly used types and traits
pub mod prelude {
    pub use crate::error::*;
    pub use crate::file::{builder::MidiFileBuilder, *};
    pub use crate::message::*;
    pub use crate::num::{u4, u7, u14, u24};
    pub use crate::reader::{
        ErrorLocation, InvalidChannelValuePolicy, InvalidChunkSizePolicy,
        InvalidMetaValuePolicy, MissingEndOfTrackPolicy, NoHeaderChunkPolicy,
        NotEnoughBytesPolicy, ReadResult, ReaderError, ReaderErrorKind, ReadingSettings,
        UnexpectedTrackCountPolicy, UnknownChunkPolicy,
    };
    pub use crate::timed::*;
    pub use crate::writer::{Compatibility, WritingSettings};
}
