#![doc = r#"
Contains types for MIDI file chunks

# Overview

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then exactly that many content bytes.

- `MThd`: the [`HeaderChunk`](crate::file::HeaderChunk), with the file format, the number
  of tracks and the [`Timing`](crate::file::Timing) of delta-times
- `MTrk`: a [`TrackChunk`], a sequence of delta-timed events
- anything else: an [`UnknownChunk`], kept as opaque bytes

# Example Structure

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
[Track Chunk 2: "MTrk"]
...
[Optional Unknown Chunks]
```
"#]

mod track;
pub use track::*;

mod unknown;
pub use unknown::*;

use crate::{
    ChunkError, WriteError, WriteResult,
    file::HeaderChunk,
    reader::{
        InvalidChunkSizePolicy, NotEnoughBytesPolicy, ReadResult, Reader, ReaderError,
        ReaderErrorKind, ReadingSettings, UnknownChunkPolicy,
    },
    writer::Sink,
};
use core::fmt;

/// The 4-byte tag of a chunk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkId(pub [u8; 4]);

impl ChunkId {
    /// `MThd`
    pub const HEADER: ChunkId = ChunkId(*b"MThd");
    /// `MTrk`
    pub const TRACK: ChunkId = ChunkId(*b"MTrk");

    /// True for `MThd` and `MTrk`.
    pub fn is_standard(&self) -> bool {
        standard_chunk_ids().contains(self)
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            for b in self.0 {
                write!(f, "{}", b as char)?;
            }
            Ok(())
        } else {
            write!(f, "{:02X?}", self.0)
        }
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({self})")
    }
}

/// The tags of the chunks defined by the standard, header first.
pub const fn standard_chunk_ids() -> [ChunkId; 2] {
    [ChunkId::HEADER, ChunkId::TRACK]
}

/// A chunk of a MIDI file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Chunk {
    /// `MThd`
    Header(HeaderChunk),
    /// `MTrk`
    Track(TrackChunk),
    /// Any other tag
    Unknown(UnknownChunk),
}

impl Chunk {
    /// The tag written for this chunk.
    pub fn id(&self) -> ChunkId {
        match self {
            Self::Header(_) => ChunkId::HEADER,
            Self::Track(_) => ChunkId::TRACK,
            Self::Unknown(u) => u.id(),
        }
    }

    /// The track chunk, if this is one.
    pub fn as_track(&self) -> Option<&TrackChunk> {
        match self {
            Self::Track(t) => Some(t),
            _ => None,
        }
    }

    /// The track chunk, if this is one.
    pub fn as_track_mut(&mut self) -> Option<&mut TrackChunk> {
        match self {
            Self::Track(t) => Some(t),
            _ => None,
        }
    }

    /// Reads the chunk starting at the reader's position.
    ///
    /// Returns `None` for an unknown chunk that the settings skip. `index` is only
    /// used to locate errors.
    pub(crate) fn read(
        reader: &mut Reader<'_>,
        index: usize,
        settings: &ReadingSettings,
    ) -> ReadResult<Option<Self>> {
        let id = ChunkId(reader.read_array()?);
        Self::read_content(reader, id, settings).map_err(|e| e.in_chunk(index, id))
    }

    fn read_content(
        reader: &mut Reader<'_>,
        id: ChunkId,
        settings: &ReadingSettings,
    ) -> ReadResult<Option<Self>> {
        let declared = u32::from_be_bytes(reader.read_array()?);
        let available = reader.remaining();

        let truncated = declared as usize > available;
        let len = if truncated {
            match settings.not_enough_bytes {
                NotEnoughBytesPolicy::Abort => {
                    return Err(ReaderError::new(
                        reader.position(),
                        ReaderErrorKind::chunk(ChunkError::NotEnoughBytes {
                            id,
                            declared,
                            available,
                        }),
                    ));
                }
                NotEnoughBytesPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "{id} chunk declares {declared} bytes, reading the {available} available"
                    );
                    available
                }
            }
        } else {
            declared as usize
        };

        let mut content = reader.sub_reader(len)?;
        #[cfg(feature = "tracing")]
        tracing::debug!("reading {id} chunk of {len} bytes at {}", content.position());

        let chunk = match id {
            ChunkId::HEADER => Self::Header(HeaderChunk::read(&mut content)?),
            ChunkId::TRACK => Self::Track(TrackChunk::read(&mut content, settings, truncated)?),
            _ => match settings.unknown_chunk {
                UnknownChunkPolicy::ReadAsUnknownChunk => {
                    Self::Unknown(UnknownChunk::new(id, content.take_rest()))
                }
                UnknownChunkPolicy::Skip => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("skipping unknown {id} chunk");
                    return Ok(None);
                }
            },
        };

        if !content.is_empty() {
            match settings.invalid_chunk_size {
                InvalidChunkSizePolicy::Abort => {
                    return Err(ReaderError::new(
                        content.position(),
                        ReaderErrorKind::chunk(ChunkError::InvalidSize {
                            id,
                            declared,
                            consumed: len - content.remaining(),
                        }),
                    ));
                }
                InvalidChunkSizePolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "{id} chunk has {} unused content bytes, skipping",
                        content.remaining()
                    );
                }
            }
        }
        Ok(Some(chunk))
    }
}

/// Writes the tag, the length of `content`, then the content itself.
pub(crate) fn write_chunk<S: Sink>(out: &mut S, id: ChunkId, content: &[u8]) -> WriteResult<()> {
    let len = u32::try_from(content.len()).map_err(|_| WriteError::ChunkTooLarge {
        id,
        len: content.len(),
    })?;
    out.put(&id.0);
    out.put(&len.to_be_bytes());
    out.put(content);
    Ok(())
}

#[test]
fn standard_ids() {
    use pretty_assertions::assert_eq;
    let [header, track] = standard_chunk_ids();
    assert_eq!(header.to_string(), "MThd");
    assert_eq!(track.to_string(), "MTrk");
    assert!(!ChunkId(*b"XFIH").is_standard());
    assert_eq!(ChunkId([0, 1, 2, 3]).to_string(), "[00, 01, 02, 03]");
}

#[cfg(test)]
fn read_one(bytes: &[u8], settings: &ReadingSettings) -> ReadResult<Option<Chunk>> {
    Chunk::read(&mut Reader::from_byte_slice(bytes), 0, settings)
}

#[test]
fn truncated_chunk() {
    use crate::ParseError;
    // declares 8 bytes, holds 4
    let bytes = *b"abcd\x00\x00\x00\x08wxyz";
    let err = read_one(&bytes, &ReadingSettings::default()).unwrap_err();
    assert_eq!(err.location().chunk, Some((0, ChunkId(*b"abcd"))));
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Chunk(ChunkError::NotEnoughBytes {
            id: ChunkId(*b"abcd"),
            declared: 8,
            available: 4,
        }))
    );

    let ignore = ReadingSettings::default().with_not_enough_bytes(NotEnoughBytesPolicy::Ignore);
    assert_eq!(
        read_one(&bytes, &ignore).unwrap(),
        Some(Chunk::Unknown(UnknownChunk::new(ChunkId(*b"abcd"), *b"wxyz")))
    );
}

#[test]
fn oversized_header() {
    use crate::ParseError;
    let bytes = *b"MThd\x00\x00\x00\x08\x00\x00\x00\x01\x00\x60\xAA\xBB";
    let err = read_one(&bytes, &ReadingSettings::default()).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Chunk(ChunkError::InvalidSize {
            id: ChunkId::HEADER,
            declared: 8,
            consumed: 6,
        }))
    );

    let ignore = ReadingSettings::default().with_invalid_chunk_size(InvalidChunkSizePolicy::Ignore);
    assert!(matches!(
        read_one(&bytes, &ignore).unwrap(),
        Some(Chunk::Header(_))
    ));
}

#[test]
fn skipped_unknown_chunk() {
    let settings = ReadingSettings::default().with_unknown_chunk(UnknownChunkPolicy::Skip);
    let bytes = *b"XFIH\x00\x00\x00\x02\x01\x02MThd";
    let mut reader = Reader::from_byte_slice(&bytes);
    assert_eq!(Chunk::read(&mut reader, 0, &settings).unwrap(), None);
    assert_eq!(reader.remaining(), 4);
}
