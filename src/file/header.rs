use crate::{
    ChunkError,
    file::{FormatType, Timing},
    reader::{ReadResult, Reader, ReaderError, ReaderErrorKind, inv_data},
    writer::Sink,
};

#[doc = r#"
The content of an `MThd` chunk

```text
<format: u16> <track count: u16> <division: u16>
```

The track count and the division are recomputed from the file when it is written,
so the values here describe the file as it was read.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderChunk {
    format: FormatType,
    tracks_count: u16,
    timing: Timing,
}

impl HeaderChunk {
    /// Length of the fixed layout.
    pub const LEN: usize = 6;

    /// Create a header
    pub const fn new(format: FormatType, tracks_count: u16, timing: Timing) -> Self {
        Self {
            format,
            tracks_count,
            timing,
        }
    }
    /// Returns the file format
    pub const fn format(&self) -> FormatType {
        self.format
    }
    /// Set the file format
    pub fn set_format(&mut self, format: FormatType) {
        self.format = format;
    }
    /// Number of track chunks the header declares
    pub const fn tracks_count(&self) -> u16 {
        self.tracks_count
    }
    /// Get the timing props
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Decodes the fixed layout. Any bytes after it are left in `content`.
    pub(crate) fn read(content: &mut Reader<'_>) -> ReadResult<Self> {
        if content.remaining() < Self::LEN {
            return Err(ReaderError::new(
                content.position(),
                ReaderErrorKind::chunk(ChunkError::HeaderTooShort(content.remaining() as u32)),
            ));
        }
        let format = u16::from_be_bytes(content.read_array()?);
        let format = FormatType::try_from(format).map_err(|e| inv_data(content, e))?;
        let tracks_count = u16::from_be_bytes(content.read_array()?);
        let timing = Timing::from_division(u16::from_be_bytes(content.read_array()?))
            .map_err(|e| inv_data(content, e))?;
        Ok(Self {
            format,
            tracks_count,
            timing,
        })
    }

    pub(crate) fn write_content<S: Sink>(&self, out: &mut S) {
        out.put(&u16::from(self.format).to_be_bytes());
        out.put(&self.tracks_count.to_be_bytes());
        out.put(&self.timing.division().to_be_bytes());
    }
}

#[test]
fn header_layout() {
    use pretty_assertions::assert_eq;
    let bytes = [0x00, 0x01, 0x00, 0x03, 0x01, 0xE0];
    let header = HeaderChunk::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    assert_eq!(
        header,
        HeaderChunk::new(
            FormatType::Simultaneous,
            3,
            Timing::new_ticks_per_quarter_note(480)
        )
    );

    let mut out = alloc::vec::Vec::new();
    header.write_content(&mut out);
    assert_eq!(out, bytes);
}

#[test]
fn header_errors() {
    use crate::{HeaderError, ParseError};
    let short = HeaderChunk::read(&mut Reader::from_byte_slice(&[0, 1, 0, 1])).unwrap_err();
    assert_eq!(
        short.parse_error_kind(),
        Some(&ParseError::Chunk(ChunkError::HeaderTooShort(4)))
    );

    let format = [0x00, 0x07, 0x00, 0x01, 0x00, 0x60];
    let err = HeaderChunk::read(&mut Reader::from_byte_slice(&format)).unwrap_err();
    assert_eq!(
        err.parse_error_kind(),
        Some(&ParseError::Header(HeaderError::InvalidFormat(7)))
    );
}
