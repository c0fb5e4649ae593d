//! Deliberately broken documents.
//!
//! Every variant starts from the same plausible single-page document
//! (header, catalog, page tree, page with font resources, content stream)
//! and breaks exactly one structural rule, so a consumer gets past the
//! first token and fails on the path under test.

use crate::document::{catalog_dict, page_dict, pages_dict, FontResource, CATALOG_ID, PAGES_ID};
use crate::error::{FixtureError, Result};
use crate::expectation::ExpectedBehavior;
use crate::layout::PageGeometry;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::ContentStream;
use crate::writer::{PdfVersion, PdfWriter, Trailer, WriterConfig};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[cfg(feature = "manifest")]
use serde::{Deserialize, Serialize};

const PAGE_ID: ObjectId = ObjectId::object(3);
const CONTENT_ID: ObjectId = ObjectId::object(4);
const ENCRYPT_ID: ObjectId = ObjectId::object(5);

/// Header token no reader supports.
pub const UNSUPPORTED_VERSION: &str = "99.99";

/// `/Length` declared by the malformed stream, far beyond its payload.
pub const MALFORMED_DECLARED_LENGTH: usize = 9999;

/// Garbage payload of the malformed stream. Never contains `endstream`.
pub const MALFORMED_PAYLOAD: &[u8] = b"CORRUPTED_BINARY_DATA_\x00\xff\xfe\xfd\x80\x81\x01\x02";

/// Tokens substituted for the page tree's `/Kids` array.
pub const CORRUPTED_KIDS_TOKEN: &str = "CORRUPTED_DATA_HERE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "manifest", serde(rename_all = "snake_case"))]
pub enum CorruptionVariant {
    /// Output stops inside the content stream
    #[default]
    Truncated,
    /// Header version outside the supported range
    InvalidHeader,
    /// Objects intact, cross-reference table omitted
    MissingXref,
    /// Catalog dictionary unterminated, page tree holds garbage tokens
    CorruptedObject,
    /// Trailer declares an encryption dictionary readers cannot handle
    UnsupportedEncryption,
    /// Stream `/Length` exceeds its binary payload
    MalformedStream,
}

impl CorruptionVariant {
    pub const ALL: [CorruptionVariant; 6] = [
        CorruptionVariant::Truncated,
        CorruptionVariant::InvalidHeader,
        CorruptionVariant::MissingXref,
        CorruptionVariant::CorruptedObject,
        CorruptionVariant::UnsupportedEncryption,
        CorruptionVariant::MalformedStream,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CorruptionVariant::Truncated => "truncated",
            CorruptionVariant::InvalidHeader => "invalid_header",
            CorruptionVariant::MissingXref => "missing_xref",
            CorruptionVariant::CorruptedObject => "corrupted_object",
            CorruptionVariant::UnsupportedEncryption => "unsupported_encryption",
            CorruptionVariant::MalformedStream => "malformed_stream",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CorruptionVariant::Truncated => "PDF with truncated content (missing EOF)",
            CorruptionVariant::InvalidHeader => "PDF with invalid header",
            CorruptionVariant::MissingXref => "PDF with missing cross-reference table",
            CorruptionVariant::CorruptedObject => "PDF with corrupted object structure",
            CorruptionVariant::UnsupportedEncryption => {
                "PDF with unsupported encryption (key length)"
            }
            CorruptionVariant::MalformedStream => "PDF with malformed stream data",
        }
    }

    /// Version token written in the header.
    pub fn pdf_version(&self) -> String {
        match self {
            CorruptionVariant::InvalidHeader => UNSUPPORTED_VERSION.to_string(),
            CorruptionVariant::UnsupportedEncryption => PdfVersion::V1_7.to_string(),
            _ => PdfVersion::V1_4.to_string(),
        }
    }

    pub fn expected_behavior(&self) -> ExpectedBehavior {
        match self {
            CorruptionVariant::Truncated => {
                ExpectedBehavior::error("UnexpectedEof", "unexpected end of (file|input)")
            }
            CorruptionVariant::InvalidHeader => ExpectedBehavior::warning(
                "UnsupportedVersion",
                &["unsupported.*version", "invalid.*version"],
            ),
            CorruptionVariant::MissingXref => {
                ExpectedBehavior::error("InvalidXRef", "invalid.*xref|cross-reference")
            }
            CorruptionVariant::CorruptedObject => {
                ExpectedBehavior::error("InvalidObject", "object [0-9]+.*(unterminated|invalid)")
            }
            CorruptionVariant::UnsupportedEncryption => {
                ExpectedBehavior::error("UnsupportedEncryption", "unsupported.*(encryption|key length)")
            }
            CorruptionVariant::MalformedStream => {
                ExpectedBehavior::error("StreamLengthMismatch", "stream.*length")
            }
        }
    }

    /// Comma-separated list of every variant name.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|variant| variant.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Writes the corrupted document and returns the number of bytes written.
    pub fn write<W: Write>(&self, writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<u64> {
        tracing::debug!(variant = self.name(), "writing corrupted document");
        match self {
            CorruptionVariant::Truncated => write_truncated(writer, geometry)?,
            CorruptionVariant::InvalidHeader => write_invalid_header(writer, geometry)?,
            CorruptionVariant::MissingXref => write_missing_xref(writer, geometry)?,
            CorruptionVariant::CorruptedObject => write_corrupted_object(writer, geometry)?,
            CorruptionVariant::UnsupportedEncryption => {
                write_unsupported_encryption(writer, geometry)?
            }
            CorruptionVariant::MalformedStream => write_malformed_stream(writer, geometry)?,
        }
        writer.flush()?;
        Ok(writer.position())
    }

    pub fn to_bytes(&self, geometry: &PageGeometry) -> Result<Vec<u8>> {
        let mut writer = PdfWriter::new_with_writer(Vec::new());
        self.write(&mut writer, geometry)?;
        Ok(writer.into_inner())
    }
}

impl fmt::Display for CorruptionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorruptionVariant {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == wanted)
            .ok_or_else(|| FixtureError::UnknownVariant {
                name: s.to_string(),
                expected: Self::names(),
            })
    }
}

fn header<W: Write>(writer: &mut PdfWriter<W>, version: &str) -> Result<()> {
    writer.write_header_token(version, WriterConfig::default().binary_marker)
}

fn sample_content(geometry: &PageGeometry, caption: &str) -> Vec<u8> {
    let mut content = ContentStream::new();
    content
        .begin_text()
        .set_font(FontResource::Regular.resource_name(), geometry.font_size)
        .move_text(geometry.margin, geometry.first_baseline())
        .show_text("Corrupted test document")
        .move_text(0.0, -geometry.line_height)
        .show_text(caption)
        .end_text();
    content.into_bytes()
}

/// Catalog, page tree and page objects, all well formed.
fn write_page_tree<W: Write>(writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<()> {
    writer.write_object(CATALOG_ID, &Object::Dictionary(catalog_dict(PAGES_ID)))?;
    writer.write_object(PAGES_ID, &Object::Dictionary(pages_dict(&[PAGE_ID])))?;
    write_page(writer, geometry)
}

fn write_page<W: Write>(writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<()> {
    let dict = page_dict(PAGES_ID, CONTENT_ID, geometry, &[FontResource::Regular]);
    writer.write_object(PAGE_ID, &Object::Dictionary(dict))?;
    Ok(())
}

/// Writes a correct index and a trailer rooted at the catalog.
fn write_finish<W: Write>(writer: &mut PdfWriter<W>, encrypt: Option<ObjectId>) -> Result<()> {
    let mut trailer = Trailer::new(writer.index_size(), CATALOG_ID);
    if let Some(encrypt) = encrypt {
        trailer = trailer.with_encrypt(encrypt);
    }
    let index_offset = writer.write_index()?;
    writer.write_trailer(&trailer, index_offset)
}

fn write_truncated<W: Write>(writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<()> {
    header(writer, &PdfVersion::V1_4.to_string())?;
    write_page_tree(writer, geometry)?;

    let payload = sample_content(geometry, CorruptionVariant::Truncated.description());
    let cut = payload.len() / 2;
    writer.begin_object(CONTENT_ID)?;
    writer.write_dictionary(&Dictionary::new().with("Length", payload.len()))?;
    writer.write_raw(b"\nstream\n")?;
    // Output ends here: no endstream, endobj, xref, trailer or %%EOF.
    writer.write_raw(&payload[..cut])
}

fn write_invalid_header<W: Write>(writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<()> {
    header(writer, UNSUPPORTED_VERSION)?;
    write_page_tree(writer, geometry)?;
    let payload = sample_content(geometry, CorruptionVariant::InvalidHeader.description());
    writer.write_stream_object(CONTENT_ID, Dictionary::new(), &payload)?;
    write_finish(writer, None)
}

fn write_missing_xref<W: Write>(writer: &mut PdfWriter<W>, geometry: &PageGeometry) -> Result<()> {
    header(writer, &PdfVersion::V1_4.to_string())?;
    write_page_tree(writer, geometry)?;
    let payload = sample_content(geometry, CorruptionVariant::MissingXref.description());
    writer.write_stream_object(CONTENT_ID, Dictionary::new(), &payload)?;
    // No xref section; startxref points at the start of the file.
    let trailer = Trailer::new(writer.index_size(), CATALOG_ID);
    writer.write_trailer(&trailer, 0)
}

fn write_corrupted_object<W: Write>(
    writer: &mut PdfWriter<W>,
    geometry: &PageGeometry,
) -> Result<()> {
    header(writer, &PdfVersion::V1_4.to_string())?;

    // Catalog dictionary is never closed and the object never ends.
    writer.begin_object(CATALOG_ID)?;
    writer.write_raw(b"<<\n/Type /Catalog\n/Pages 2 0 R\n")?;

    writer.begin_object(PAGES_ID)?;
    writer.write_raw(
        format!("<<\n/Type /Pages\n/Kids {CORRUPTED_KIDS_TOKEN}\n/Count 1\n>>").as_bytes(),
    )?;
    writer.end_object()?;

    write_page(writer, geometry)?;
    let payload = sample_content(geometry, CorruptionVariant::CorruptedObject.description());
    writer.write_stream_object(CONTENT_ID, Dictionary::new(), &payload)?;
    write_finish(writer, None)
}

/// Standard security handler dictionary with `/R 6` (AES-256) and a
/// 1024-bit key length, a combination no conforming handler accepts.
pub fn unsupported_encryption_dict() -> Dictionary {
    let crypt_filter = Dictionary::new()
        .with("CFM", Object::name("AESV3"))
        .with("AuthEvent", Object::name("DocOpen"))
        .with("Length", 32);
    Dictionary::new()
        .with("Filter", Object::name("Standard"))
        .with("V", 5)
        .with("R", 6)
        .with("Length", 1024)
        .with("P", -1)
        .with("O", Object::HexString(vec![0; 32]))
        .with("U", Object::HexString(vec![0; 32]))
        .with("OE", Object::HexString(vec![0; 32]))
        .with("UE", Object::HexString(vec![0; 32]))
        .with("Perms", Object::HexString(vec![0; 16]))
        .with("StrF", Object::name("StdCF"))
        .with("StmF", Object::name("StdCF"))
        .with("CF", Dictionary::new().with("StdCF", crypt_filter))
}

fn write_unsupported_encryption<W: Write>(
    writer: &mut PdfWriter<W>,
    geometry: &PageGeometry,
) -> Result<()> {
    header(writer, &PdfVersion::V1_7.to_string())?;
    write_page_tree(writer, geometry)?;
    let payload = sample_content(geometry, "Encrypted Document");
    writer.write_stream_object(CONTENT_ID, Dictionary::new(), &payload)?;
    writer.write_object(ENCRYPT_ID, &Object::Dictionary(unsupported_encryption_dict()))?;
    write_finish(writer, Some(ENCRYPT_ID))
}

fn write_malformed_stream<W: Write>(
    writer: &mut PdfWriter<W>,
    geometry: &PageGeometry,
) -> Result<()> {
    header(writer, &PdfVersion::V1_4.to_string())?;
    write_page_tree(writer, geometry)?;
    writer.begin_object(CONTENT_ID)?;
    writer.write_stream_with_length(Dictionary::new(), MALFORMED_DECLARED_LENGTH, MALFORMED_PAYLOAD)?;
    writer.end_object()?;
    write_finish(writer, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(variant: CorruptionVariant) -> Vec<u8> {
        variant.to_bytes(&PageGeometry::letter()).unwrap()
    }

    fn text(variant: CorruptionVariant) -> String {
        String::from_utf8_lossy(&render(variant)).to_string()
    }

    #[test]
    fn test_names_round_trip() {
        for variant in CorruptionVariant::ALL {
            assert_eq!(variant.name().parse::<CorruptionVariant>().unwrap(), variant);
            assert_eq!(variant.to_string(), variant.name());
            assert!(!variant.description().is_empty());
        }
    }

    #[test]
    fn test_unknown_variant() {
        let err = "bit_flip".parse::<CorruptionVariant>().unwrap_err();
        match err {
            FixtureError::UnknownVariant { name, expected } => {
                assert_eq!(name, "bit_flip");
                assert!(expected.contains("truncated"));
                assert!(expected.contains("malformed_stream"));
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_truncated() {
        assert_eq!(CorruptionVariant::default(), CorruptionVariant::Truncated);
    }

    #[test]
    fn test_every_variant_starts_like_a_pdf() {
        for variant in CorruptionVariant::ALL {
            let bytes = render(variant);
            assert!(bytes.starts_with(b"%PDF-"), "{variant}");
            let text = String::from_utf8_lossy(&bytes);
            assert!(text.contains("1 0 obj"), "{variant}");
            assert!(text.contains("2 0 obj"), "{variant}");
            assert!(text.contains("/Type /Catalog"), "{variant}");
        }
    }

    #[test]
    fn test_truncated_stops_inside_stream() {
        let text = text(CorruptionVariant::Truncated);
        assert!(text.contains("4 0 obj"));
        assert!(text.contains("stream\nBT\n"));
        assert!(!text.contains("endstream"));
        assert!(!text.contains("xref"));
        assert!(!text.contains("trailer"));
        assert!(!text.contains("%%EOF"));
    }

    #[test]
    fn test_invalid_header_is_otherwise_valid() {
        let text = text(CorruptionVariant::InvalidHeader);
        assert!(text.starts_with("%PDF-99.99\n"));
        assert!(text.contains("xref\n0 5\n"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_missing_xref_points_at_zero() {
        let text = text(CorruptionVariant::MissingXref);
        assert!(!text.contains("\nxref\n"));
        assert!(text.contains("trailer\n<<\n/Size 5\n/Root 1 0 R\n>>\nstartxref\n0\n%%EOF\n"));
        assert!(text.contains("endstream\nendobj\n"));
    }

    #[test]
    fn test_corrupted_object() {
        let text = text(CorruptionVariant::CorruptedObject);
        let catalog = text.find("1 0 obj").unwrap();
        let pages = text.find("2 0 obj").unwrap();
        let catalog_body = &text[catalog..pages];
        assert!(!catalog_body.contains(">>"));
        assert!(!catalog_body.contains("endobj"));
        assert!(text.contains("/Kids CORRUPTED_DATA_HERE"));
        // Rest of the file stays intact.
        assert!(text.contains("xref\n0 5\n"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_unsupported_encryption() {
        let text = text(CorruptionVariant::UnsupportedEncryption);
        assert!(text.starts_with("%PDF-1.7\n"));
        assert!(text.contains("5 0 obj\n<<\n/Filter /Standard\n/V 5\n/R 6\n/Length 1024\n/P -1"));
        assert!(text.contains("/CFM /AESV3"));
        assert!(text.contains("/Size 6\n/Root 1 0 R\n/Encrypt 5 0 R"));
        assert!(text.contains("(Encrypted Document) Tj"));
    }

    #[test]
    fn test_malformed_stream() {
        let bytes = render(CorruptionVariant::MalformedStream);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Length 9999"));
        assert!(bytes
            .windows(MALFORMED_PAYLOAD.len())
            .any(|window| window == MALFORMED_PAYLOAD));
        assert!(!String::from_utf8_lossy(MALFORMED_PAYLOAD).contains("endstream"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        for variant in [
            CorruptionVariant::InvalidHeader,
            CorruptionVariant::CorruptedObject,
            CorruptionVariant::UnsupportedEncryption,
            CorruptionVariant::MalformedStream,
        ] {
            let mut writer = PdfWriter::new_with_writer(Vec::new());
            variant.write(&mut writer, &PageGeometry::letter()).unwrap();
            let offsets = writer.offsets().clone();
            let bytes = writer.into_inner();
            for (number, offset) in offsets {
                let introducer = format!("{number} 0 obj\n");
                assert!(
                    bytes[offset as usize..].starts_with(introducer.as_bytes()),
                    "{variant}: object {number}"
                );
            }
        }
    }

    #[test]
    fn test_output_is_deterministic() {
        for variant in CorruptionVariant::ALL {
            assert_eq!(render(variant), render(variant));
        }
    }

    #[test]
    fn test_expected_behavior() {
        assert_eq!(
            CorruptionVariant::UnsupportedEncryption
                .expected_behavior()
                .error_type(),
            Some("UnsupportedEncryption")
        );
        for variant in CorruptionVariant::ALL {
            assert!(variant.expected_behavior().error_type().is_some());
        }
    }
}
