use super::ChunkId;
use alloc::vec::Vec;

/// A chunk with a tag other than `MThd` or `MTrk`, kept as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownChunk {
    id: ChunkId,
    data: Vec<u8>,
}

impl UnknownChunk {
    /// Create an unknown chunk
    pub fn new(id: ChunkId, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            data: data.into(),
        }
    }
    /// The tag of the chunk
    pub fn id(&self) -> ChunkId {
        self.id
    }
    /// The content of the chunk
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// The content of the chunk, for editing
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}
