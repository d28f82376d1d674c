#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is an ordered list of [`Chunk`]s plus the [`Timing`] of its delta-times. The
order of the chunks survives a read/write round trip, unknown chunks included.

```rust
# use midifile::prelude::*;
let file = MidiFile::with_tracks(
    FormatType::SingleMultiChannel,
    Timing::new_ticks_per_quarter_note(480),
    [TrackChunk::new(vec![
        MidiEvent::new(0, ChannelEvent::note_on(u4::new(0), u7::new(60), u7::new(100))),
        MidiEvent::new(480, ChannelEvent::note_off(u4::new(0), u7::new(60), u7::new(0))),
    ])],
);

let bytes = file.write(&WritingSettings::default()).unwrap();
let read = MidiFile::parse(&bytes, &ReadingSettings::default()).unwrap();
assert_eq!(read, file);
```
"#]

/// Contains the [`MidiFileBuilder`](builder::MidiFileBuilder)
pub mod builder;

mod chunk;
use chunk::write_chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

use crate::{
    StructuralError, WriteError, WriteResult,
    file::builder::MidiFileBuilder,
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind, ReadingSettings},
    writer::{Compatibility, Sink, WritingSettings},
};
use alloc::vec::Vec;

#[doc = r#"
A Standard MIDI File

The header chunk, if any, is one of the [`chunks`](MidiFile::chunks). Its track
count and division are not kept in sync while editing: [`MidiFile::write`] recomputes
them from the track chunks and from [`MidiFile::timing`].
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    chunks: Vec<Chunk>,
    timing: Timing,
}

impl MidiFile {
    /// Create a file with a header chunk and no tracks
    pub fn new(format: FormatType, timing: Timing) -> Self {
        Self {
            chunks: alloc::vec![Chunk::Header(HeaderChunk::new(format, 0, timing))],
            timing,
        }
    }

    /// Create a file with a header chunk followed by `tracks`
    pub fn with_tracks(
        format: FormatType,
        timing: Timing,
        tracks: impl IntoIterator<Item = TrackChunk>,
    ) -> Self {
        let mut file = Self::new(format, timing);
        file.chunks.extend(tracks.into_iter().map(Chunk::Track));
        let track_count = u16::try_from(file.chunks.len() - 1).unwrap_or(u16::MAX);
        if let Some(Chunk::Header(header)) = file.chunks.first_mut() {
            *header = HeaderChunk::new(format, track_count, timing);
        }
        file
    }

    /// Create a file from raw chunks, without any header checks.
    pub fn from_chunks(chunks: Vec<Chunk>, timing: Timing) -> Self {
        Self { chunks, timing }
    }

    /// Parse a set of bytes into a file struct
    pub fn parse(bytes: &[u8], settings: &ReadingSettings) -> ReadResult<Self> {
        let mut reader = Reader::from_byte_slice(bytes);
        let mut builder = MidiFileBuilder::new(*settings);

        let mut index = 0;
        while !reader.is_empty() {
            if let Some(chunk) = Chunk::read(&mut reader, index, settings)? {
                builder.handle_chunk(chunk);
            }
            index += 1;
        }

        builder
            .build()
            .map_err(|k| ReaderError::new(reader.position(), ReaderErrorKind::chunk(k)))
    }

    /// Reads the whole of `source` and parses it.
    #[cfg(feature = "std")]
    pub fn read_from<R: std::io::Read>(
        mut source: R,
        settings: &ReadingSettings,
    ) -> ReadResult<Self> {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|e| ReaderError::new(bytes.len(), ReaderErrorKind::Io(e)))?;
        Self::parse(&bytes, settings)
    }

    /// Encodes the file.
    pub fn write(&self, settings: &WritingSettings) -> WriteResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_into(&mut out, settings)?;
        Ok(out)
    }

    /// Encodes the file into `sink`.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(
        &self,
        mut sink: W,
        settings: &WritingSettings,
    ) -> WriteResult<()> {
        let bytes = self.write(settings)?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(())
    }

    fn write_into<S: Sink>(&self, out: &mut S, settings: &WritingSettings) -> WriteResult<()> {
        let found = self.track_chunks().count();
        let tracks_count =
            u16::try_from(found).map_err(|_| StructuralError::TooManyTracks(found))?;

        if settings.compatibility == Compatibility::Standard {
            match self.header() {
                None => return Err(StructuralError::MissingHeaderChunk.into()),
                Some(header)
                    if header.format() == FormatType::SingleMultiChannel && found != 1 =>
                {
                    return Err(StructuralError::SingleTrackCount(found).into());
                }
                Some(_) => {}
            }
        }

        let mut content = Vec::new();
        for (index, chunk) in self.chunks.iter().enumerate() {
            content.clear();
            match chunk {
                Chunk::Header(header) => {
                    HeaderChunk::new(header.format(), tracks_count, self.timing)
                        .write_content(&mut content);
                }
                Chunk::Track(track) => {
                    track
                        .write_content(&mut content, settings)
                        .map_err(|(event, source)| WriteError::Vlq {
                            chunk: index,
                            event,
                            source,
                        })?;
                }
                Chunk::Unknown(unknown) => content.extend_from_slice(unknown.data()),
            }
            write_chunk(out, chunk.id(), &content)?;
        }
        Ok(())
    }

    /// The first header chunk
    pub fn header(&self) -> Option<&HeaderChunk> {
        self.chunks.iter().find_map(|c| match c {
            Chunk::Header(h) => Some(h),
            _ => None,
        })
    }

    /// The format type of the file, if it has a header.
    pub fn format(&self) -> Option<FormatType> {
        self.header().map(HeaderChunk::format)
    }

    /// Returns header info
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Set the timing written to the header chunk
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    /// All chunks, in file order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// All chunks, for editing
    pub fn chunks_mut(&mut self) -> &mut Vec<Chunk> {
        &mut self.chunks
    }

    /// The track chunks, in file order
    pub fn track_chunks(&self) -> impl Iterator<Item = &TrackChunk> {
        self.chunks.iter().filter_map(Chunk::as_track)
    }

    /// The track chunks, for editing
    pub fn track_chunks_mut(&mut self) -> impl Iterator<Item = &mut TrackChunk> {
        self.chunks.iter_mut().filter_map(Chunk::as_track_mut)
    }

    /// Appends a track chunk
    pub fn push_track(&mut self, track: TrackChunk) {
        self.chunks.push(Chunk::Track(track));
    }
}
