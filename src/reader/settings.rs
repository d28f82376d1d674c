/// What to do with a meta event parameter outside of its domain,
/// such as a key signature of nine sharps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidMetaValuePolicy {
    /// Fail with [`InvalidParameterValue`](crate::InvalidParameterValue)
    #[default]
    Abort,
    /// Clamp the value to the nearest bound
    SnapToLimits,
}

/// What to do with a channel event data byte that has its top bit set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidChannelValuePolicy {
    /// Fail with [`InvalidParameterValue`](crate::InvalidParameterValue)
    #[default]
    Abort,
    /// Use 127
    SnapToLimits,
    /// Keep the low 7 bits
    ReadValid,
}

/// What to do when a chunk declares more content than the input holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotEnoughBytesPolicy {
    /// Fail with [`ChunkError::NotEnoughBytes`](crate::ChunkError::NotEnoughBytes)
    #[default]
    Abort,
    /// Decode whatever is available
    Ignore,
}

/// What to do when a chunk's content is not consumed exactly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidChunkSizePolicy {
    /// Fail with [`ChunkError::InvalidSize`](crate::ChunkError::InvalidSize)
    #[default]
    Abort,
    /// Skip the leftover bytes
    Ignore,
}

/// What to do with a chunk that is neither a header nor a track.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownChunkPolicy {
    /// Keep it as an [`UnknownChunk`](crate::file::UnknownChunk)
    #[default]
    ReadAsUnknownChunk,
    /// Drop it
    Skip,
}

/// What to do with a track chunk that has no end-of-track event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingEndOfTrackPolicy {
    /// Accept the track as it is
    #[default]
    Ignore,
    /// Fail with [`ChunkError::MissingEndOfTrack`](crate::ChunkError::MissingEndOfTrack)
    Abort,
}

/// What to do when the header's track count disagrees with the track chunks found.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnexpectedTrackCountPolicy {
    /// Keep every track chunk that was read
    #[default]
    Ignore,
    /// Fail with [`ChunkError::UnexpectedTrackCount`](crate::ChunkError::UnexpectedTrackCount)
    Abort,
}

/// What to do with a file that has no header chunk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoHeaderChunkPolicy {
    /// Fail with [`ChunkError::MissingHeader`](crate::ChunkError::MissingHeader)
    #[default]
    Abort,
    /// Read the file with default timing
    Ignore,
}

#[doc = r#"
Tolerance settings for decoding.

Every field is independent. The default aborts on anything malformed, keeps unknown
chunks and accepts tracks without an end-of-track event or with a track count that
disagrees with the header.

```rust
# use midifile::prelude::*;
let lenient = ReadingSettings::default()
    .with_invalid_meta_value(InvalidMetaValuePolicy::SnapToLimits)
    .with_not_enough_bytes(NotEnoughBytesPolicy::Ignore);
assert_eq!(lenient.unknown_chunk, UnknownChunkPolicy::ReadAsUnknownChunk);
```
"#]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadingSettings {
    /// Meta event parameters outside of their domain
    pub invalid_meta_value: InvalidMetaValuePolicy,
    /// Channel event data bytes above 127
    pub invalid_channel_value: InvalidChannelValuePolicy,
    /// Chunk content truncated by the end of the input
    pub not_enough_bytes: NotEnoughBytesPolicy,
    /// Chunk content not consumed exactly
    pub invalid_chunk_size: InvalidChunkSizePolicy,
    /// Chunks with a tag other than `MThd` or `MTrk`
    pub unknown_chunk: UnknownChunkPolicy,
    /// Track chunks without an end-of-track event
    pub missing_end_of_track: MissingEndOfTrackPolicy,
    /// Header track count disagreeing with the file
    pub unexpected_track_count: UnexpectedTrackCountPolicy,
    /// Files without a header chunk
    pub no_header_chunk: NoHeaderChunkPolicy,
}

impl ReadingSettings {
    /// Set the policy for invalid meta event parameters
    pub const fn with_invalid_meta_value(mut self, policy: InvalidMetaValuePolicy) -> Self {
        self.invalid_meta_value = policy;
        self
    }
    /// Set the policy for invalid channel event data bytes
    pub const fn with_invalid_channel_value(mut self, policy: InvalidChannelValuePolicy) -> Self {
        self.invalid_channel_value = policy;
        self
    }
    /// Set the policy for truncated chunks
    pub const fn with_not_enough_bytes(mut self, policy: NotEnoughBytesPolicy) -> Self {
        self.not_enough_bytes = policy;
        self
    }
    /// Set the policy for chunks with leftover content
    pub const fn with_invalid_chunk_size(mut self, policy: InvalidChunkSizePolicy) -> Self {
        self.invalid_chunk_size = policy;
        self
    }
    /// Set the policy for unknown chunks
    pub const fn with_unknown_chunk(mut self, policy: UnknownChunkPolicy) -> Self {
        self.unknown_chunk = policy;
        self
    }
    /// Set the policy for tracks without an end-of-track event
    pub const fn with_missing_end_of_track(mut self, policy: MissingEndOfTrackPolicy) -> Self {
        self.missing_end_of_track = policy;
        self
    }
    /// Set the policy for a mismatched track count
    pub const fn with_unexpected_track_count(
        mut self,
        policy: UnexpectedTrackCountPolicy,
    ) -> Self {
        self.unexpected_track_count = policy;
        self
    }
    /// Set the policy for files without a header chunk
    pub const fn with_no_header_chunk(mut self, policy: NoHeaderChunkPolicy) -> Self {
        self.no_header_chunk = policy;
        self
    }
}
