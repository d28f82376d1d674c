use super::Reader;
use crate::{ChunkError, ParseError, file::ChunkId};
use core::fmt;
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading data into the midi representation
"#]
#[derive(Debug, Error)]
#[error("Reading at Position {position}{location}, {kind}")]
pub struct ReaderError {
    position: usize,
    location: ErrorLocation,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// Reading out of bounds.
    #[error("Read out of bounds!")]
    OutOfBounds,
    /// The byte source failed.
    #[cfg(feature = "std")]
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderErrorKind {
    pub(crate) const fn chunk(chunk_err: ChunkError) -> Self {
        Self::ParseError(ParseError::Chunk(chunk_err))
    }
}

/// The chunk and event being decoded when an error occurred.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Index and tag of the chunk
    pub chunk: Option<(usize, ChunkId)>,
    /// Index of the event inside its track chunk
    pub event: Option<usize>,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((index, id)) = self.chunk {
            write!(f, " (chunk #{index} {id}")?;
            if let Some(event) = self.event {
                write!(f, ", event #{event}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self {
            position,
            location: ErrorLocation {
                chunk: None,
                event: None,
            },
            kind,
        }
    }
    /// True if out of bounds or unexpected end of file
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the parse error, if this is one.
    pub fn parse_error_kind(&self) -> Option<&ParseError> {
        match &self.kind {
            ReaderErrorKind::ParseError(e) => Some(e),
            _ => None,
        }
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
    /// Returns the chunk and event that were being decoded.
    pub fn location(&self) -> ErrorLocation {
        self.location
    }

    /// Create a new invalid data error
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self::new(position, ReaderErrorKind::ParseError(error))
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self::new(position, ReaderErrorKind::OutOfBounds)
    }

    /// Tags the error with the chunk it happened in, unless it is already tagged.
    pub(crate) fn in_chunk(mut self, index: usize, id: ChunkId) -> Self {
        if self.location.chunk.is_none() {
            self.location.chunk = Some((index, id));
        }
        self
    }

    /// Tags the error with the event it happened in, unless it is already tagged.
    pub(crate) fn at_event(mut self, index: usize) -> Self {
        if self.location.event.is_none() {
            self.location.event = Some(index);
        }
        self
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;

pub(crate) fn inv_data(reader: &Reader<'_>, v: impl Into<ParseError>) -> ReaderError {
    ReaderError::parse_error(reader.position(), v.into())
}
