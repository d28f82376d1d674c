use super::MidiFile;
use crate::{
    ChunkError,
    file::{Chunk, HeaderChunk, Timing},
    reader::{NoHeaderChunkPolicy, ReadingSettings, UnexpectedTrackCountPolicy},
};
use alloc::vec::Vec;

/// A builder used to create a new [`MidiFile`] from decoded chunks.
///
/// Chunks keep the order they are handed in. The file-level checks of
/// [`ReadingSettings`] (missing header, track count) run in [`MidiFileBuilder::build`].
#[derive(Debug, Default)]
pub struct MidiFileBuilder {
    settings: ReadingSettings,
    header: Option<HeaderChunk>,
    tracks_count: usize,
    chunks: Vec<Chunk>,
}

impl MidiFileBuilder {
    /// Create a builder applying the file-level policies of `settings`
    pub fn new(settings: ReadingSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Handles a chunk of a midi file.
    ///
    /// Only the first header chunk is kept, later ones are dropped.
    pub fn handle_chunk(&mut self, chunk: Chunk) {
        match &chunk {
            Chunk::Header(_) if self.header.is_some() => {
                #[cfg(feature = "tracing")]
                tracing::warn!("dropping duplicate header chunk");
                return;
            }
            Chunk::Header(header) => self.header = Some(*header),
            Chunk::Track(_) => self.tracks_count += 1,
            Chunk::Unknown(_) => {}
        }
        self.chunks.push(chunk);
    }

    /// Attempts to finish the midifile from the provided chunks.
    pub fn build(self) -> Result<MidiFile, ChunkError> {
        let timing = match self.header {
            Some(header) => {
                let expected = header.tracks_count();
                if usize::from(expected) != self.tracks_count {
                    match self.settings.unexpected_track_count {
                        UnexpectedTrackCountPolicy::Ignore => {
                            #[cfg(feature = "tracing")]
                            tracing::warn!(
                                "header declares {expected} tracks, found {}",
                                self.tracks_count
                            );
                        }
                        UnexpectedTrackCountPolicy::Abort => {
                            return Err(ChunkError::UnexpectedTrackCount {
                                expected,
                                found: self.tracks_count,
                            });
                        }
                    }
                }
                header.timing()
            }
            None => match self.settings.no_header_chunk {
                NoHeaderChunkPolicy::Abort => return Err(ChunkError::MissingHeader),
                NoHeaderChunkPolicy::Ignore => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("no header chunk, using default timing");
                    Timing::default()
                }
            },
        };

        Ok(MidiFile {
            chunks: self.chunks,
            timing,
        })
    }
}
