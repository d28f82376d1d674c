#![doc = r#"
Errors produced while decoding, encoding and processing MIDI files.

Decoding errors are wrapped into a [`ReaderError`](crate::reader::ReaderError), which
tags them with the byte position and the chunk/event being read. Encoding errors are
[`WriteError`]s and errors raised by the timed-event engine are [`ProcessError`]s.
"#]

use crate::file::ChunkId;
use thiserror::Error;

/// A raw integer does not fit in the restricted integer it was converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{value} does not fit in {bits} bits")]
pub struct OutOfRangeError {
    /// Width of the restricted integer
    pub bits: u32,
    /// The offending raw value
    pub value: u32,
}

/// Errors of the variable-length quantity codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VlqError {
    /// The value exceeds [`VLQ_MAX`](crate::vlq::VLQ_MAX).
    #[error("variable-length quantity {0:#X} exceeds the 28-bit maximum")]
    TooLarge(u32),
    /// More than four bytes had their continuation bit set.
    #[error("variable-length quantity is longer than 4 bytes")]
    Overflow,
}

/// A decoded field lies outside of the domain of its event.
///
/// Only raised when the active policy is
/// [`InvalidMetaValuePolicy::Abort`](crate::reader::InvalidMetaValuePolicy::Abort)
/// (or the channel counterpart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{event} event has an invalid {field} value of {value}")]
pub struct InvalidParameterValue {
    /// Name of the event type, such as `KeySignature`
    pub event: &'static str,
    /// Name of the field, such as `Key`
    pub field: &'static str,
    /// The value as it was found in the stream
    pub value: i32,
}

/// Chunk framing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The declared content length runs past the end of the input.
    #[error("{id} chunk declares {declared} content bytes but only {available} remain")]
    NotEnoughBytes {
        /// Chunk tag
        id: ChunkId,
        /// Declared content length
        declared: u32,
        /// Bytes left in the input
        available: usize,
    },
    /// The content was not consumed exactly.
    #[error("{id} chunk declares {declared} content bytes but {consumed} were used")]
    InvalidSize {
        /// Chunk tag
        id: ChunkId,
        /// Declared content length
        declared: u32,
        /// Bytes consumed by the decoder
        consumed: usize,
    },
    /// The header chunk is shorter than its fixed layout.
    #[error("header chunk is {0} bytes long, expected at least 6")]
    HeaderTooShort(u32),
    /// No header chunk was found.
    #[error("no header chunk")]
    MissingHeader,
    /// The header's track count disagrees with the track chunks found.
    #[error("header declares {expected} track chunks, found {found}")]
    UnexpectedTrackCount {
        /// Track count stored in the header
        expected: u16,
        /// Track chunks actually read
        found: usize,
    },
    /// A track chunk ended without an end-of-track event.
    #[error("track chunk has no end-of-track event")]
    MissingEndOfTrack,
}

/// Errors in the header chunk content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The file format is not 0, 1 or 2.
    #[error("unknown file format {0}")]
    InvalidFormat(u16),
    /// The SMPTE division holds a frame rate other than -24, -25, -29 or -30.
    #[error("invalid SMPTE frame rate {0} in time division")]
    InvalidSmpteFps(i8),
}

/// Errors while decoding a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    /// A data byte was found where a status byte was needed.
    #[error("event has no status byte and no running status is active")]
    MissingRunningStatus,
    /// System common and realtime messages cannot be stored in a file.
    #[error("status byte {0:#04X} cannot appear in a MIDI file")]
    UnsupportedStatus(u8),
    /// The content frame is shorter than the fixed layout of the event.
    #[error("{event} event needs {expected} content bytes, found {found}")]
    ContentTooShort {
        /// Name of the event type
        event: &'static str,
        /// Bytes the layout needs
        expected: usize,
        /// Bytes the frame declares
        found: usize,
    },
}

/// Validation errors of an [`SmpteOffset`](crate::message::SmpteOffset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// Frame rate code bits other than `0..=3`
    #[error("invalid frame rate code {0}")]
    FrameRate(u8),
    /// Hours above 23
    #[error("invalid hour offset {0}")]
    Hour(u8),
    /// Minutes above 59
    #[error("invalid minute offset {0}")]
    Minute(u8),
    /// Seconds above 59
    #[error("invalid second offset {0}")]
    Second(u8),
    /// Frames at or above the frame rate
    #[error("invalid frame {0}")]
    Frame(u8),
    /// Sub-frames above 99
    #[error("invalid subframe {0}")]
    Subframe(u8),
}

/// Everything that can go wrong with the content of a MIDI stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Variable-length quantity errors
    #[error("{0}")]
    Vlq(#[from] VlqError),
    /// Chunk framing errors
    #[error("Chunk: {0}")]
    Chunk(#[from] ChunkError),
    /// Header chunk errors
    #[error("Header: {0}")]
    Header(#[from] HeaderError),
    /// Event errors
    #[error("Event: {0}")]
    Event(#[from] EventError),
    /// A field value outside of its domain
    #[error("{0}")]
    InvalidParameterValue(#[from] InvalidParameterValue),
}

/// The file cannot be written in the requested compatibility mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// Standard files start with a header chunk.
    #[error("the file has no header chunk")]
    MissingHeaderChunk,
    /// Format 0 files hold exactly one track chunk.
    #[error("single track format requires exactly one track chunk, found {0}")]
    SingleTrackCount(usize),
    /// The header track count field is 16 bits wide.
    #[error("{0} track chunks do not fit in the header track count")]
    TooManyTracks(usize),
}

/// Errors produced while encoding a file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The chunk layout violates the compatibility mode
    #[error(transparent)]
    Structural(#[from] StructuralError),
    /// An event carries a value the VLQ codec cannot represent
    #[error("chunk #{chunk}, event #{event}: {source}")]
    Vlq {
        /// Index of the chunk in the file
        chunk: usize,
        /// Index of the event in the track chunk
        event: usize,
        /// The codec failure
        source: VlqError,
    },
    /// A chunk's content does not fit the 32-bit length field
    #[error("{id} chunk content is {len} bytes long")]
    ChunkTooLarge {
        /// Chunk tag
        id: ChunkId,
        /// Encoded content length
        len: usize,
    },
    /// The underlying writer failed
    #[cfg(feature = "std")]
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

/// The Write Result type (see [`WriteError`])
pub type WriteResult<T> = Result<T, WriteError>;

/// Errors raised by the timed-event engine itself.
///
/// Errors returned from caller supplied closures are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// An action moved an event before the start of its container.
    #[error("event #{index} was moved to negative time {time}")]
    NegativeTime {
        /// Original index of the event
        index: usize,
        /// The time it was given
        time: i64,
    },
    /// Two neighbouring events are further apart than the largest delta-time.
    #[error("event #{index} is {delta} ticks after its predecessor")]
    DeltaTimeOverflow {
        /// Original index of the event
        index: usize,
        /// The delta that does not fit
        delta: i64,
    },
}
