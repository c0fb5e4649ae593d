use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::escape_literal;
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Binary comment written after the header so transports treat the file as binary.
pub const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Size of the chunks used when streaming padding bytes.
pub const PADDING_CHUNK_SIZE: usize = 1024 * 1024;

/// PDF version written in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PdfVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V2_0,
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let version = match self {
            PdfVersion::V1_0 => "1.0",
            PdfVersion::V1_1 => "1.1",
            PdfVersion::V1_2 => "1.2",
            PdfVersion::V1_3 => "1.3",
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_6 => "1.6",
            PdfVersion::V1_7 => "1.7",
            PdfVersion::V2_0 => "2.0",
        };
        write!(f, "{version}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    pub version: PdfVersion,
    pub binary_marker: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            version: PdfVersion::V1_4,
            binary_marker: true,
        }
    }
}

/// Forward-only PDF serializer.
///
/// Every byte goes through [`PdfWriter::write_bytes`], which keeps
/// `current_position` equal to the number of bytes emitted. Object offsets
/// are captured from that counter when an object is opened, so the
/// cross-reference table never needs a second pass or a seek.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: BTreeMap<u32, u64>,
    current_position: u64,
    open_object: Option<ObjectId>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: BTreeMap::new(),
            current_position: 0,
            open_object: None,
        }
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.current_position
    }

    /// Recorded object offsets keyed by object number.
    pub fn offsets(&self) -> &BTreeMap<u32, u64> {
        &self.xref_positions
    }

    /// Value for the trailer's `/Size`: highest object number plus one.
    pub fn index_size(&self) -> u32 {
        self.xref_positions
            .keys()
            .next_back()
            .map_or(1, |max| max + 1)
    }

    pub fn write_header(&mut self, config: &WriterConfig) -> Result<()> {
        self.write_header_token(&config.version.to_string(), config.binary_marker)
    }

    /// Writes `%PDF-<token>` verbatim. The token is not checked, which lets
    /// callers emit versions no reader supports.
    pub fn write_header_token(&mut self, token: &str, binary_marker: bool) -> Result<()> {
        self.write_bytes(b"%PDF-")?;
        self.write_bytes(token.as_bytes())?;
        self.write_bytes(b"\n")?;
        if binary_marker {
            self.write_bytes(BINARY_MARKER)?;
        }
        Ok(())
    }

    /// Records the offset of the object introducer and writes `N G obj`.
    pub fn begin_object(&mut self, id: ObjectId) -> Result<u64> {
        let offset = self.current_position;
        self.xref_positions.insert(id.number(), offset);
        self.open_object = Some(id);
        tracing::trace!(object = id.number(), offset, "begin object");

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        Ok(offset)
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.open_object = None;
        self.write_bytes(b"\nendobj\n")
    }

    /// Object currently between `begin_object` and `end_object`, if any.
    pub fn open_object(&self) -> Option<ObjectId> {
        self.open_object
    }

    pub fn write_dictionary(&mut self, dict: &Dictionary) -> Result<()> {
        self.write_object_value(&Object::Dictionary(dict.clone()))
    }

    /// Injects `/Length` for `payload` and writes the stream body.
    pub fn write_stream(&mut self, dict: Dictionary, payload: &[u8]) -> Result<()> {
        self.write_stream_with_length(dict, payload.len(), payload)
    }

    /// Like [`PdfWriter::write_stream`] but with a caller-chosen `/Length`.
    /// A declared length that differs from the payload produces an invalid
    /// stream.
    pub fn write_stream_with_length(
        &mut self,
        mut dict: Dictionary,
        declared_length: usize,
        payload: &[u8],
    ) -> Result<()> {
        dict.set("Length", declared_length);
        self.write_dictionary(&dict)?;
        self.write_bytes(b"\nstream\n")?;
        self.write_bytes(payload)?;
        self.write_bytes(b"\nendstream")
    }

    /// Convenience for a complete dictionary object.
    pub fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<u64> {
        let offset = self.begin_object(id)?;
        self.write_object_value(object)?;
        self.end_object()?;
        Ok(offset)
    }

    /// Convenience for a complete stream object.
    pub fn write_stream_object(
        &mut self,
        id: ObjectId,
        dict: Dictionary,
        payload: &[u8],
    ) -> Result<u64> {
        let offset = self.begin_object(id)?;
        self.write_stream(dict, payload)?;
        self.end_object()?;
        Ok(offset)
    }

    pub fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_number(*f).as_bytes())?,
            Object::String(s) => {
                self.write_bytes(b"(")?;
                self.write_bytes(escape_literal(s).as_bytes())?;
                self.write_bytes(b")")?;
            }
            Object::HexString(bytes) => {
                let mut hex = String::with_capacity(bytes.len() * 2 + 2);
                hex.push('<');
                for byte in bytes {
                    hex.push_str(&format!("{byte:02X}"));
                }
                hex.push('>');
                self.write_bytes(hex.as_bytes())?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Reference(id) => {
                self.write_bytes(id.to_string().as_bytes())?;
            }
        }
        Ok(())
    }

    /// Writes bytes verbatim. Position tracking stays exact.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.write_bytes(data)
    }

    /// Writes `len` NUL bytes in chunks of at most `chunk_size`.
    pub fn write_padding(&mut self, len: u64, chunk_size: usize) -> Result<()> {
        let chunk_size = chunk_size.max(1);
        let chunk = vec![0u8; chunk_size.min(len as usize)];
        let mut remaining = len;
        while remaining > 0 {
            let step = remaining.min(chunk.len() as u64) as usize;
            self.write_bytes(&chunk[..step])?;
            remaining -= step as u64;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub(crate) fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

impl PdfWriter<BufWriter<std::fs::File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}

/// Formats a number the way content streams and dictionaries expect:
/// integral values without a fraction, others with at most six decimals.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{value:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
