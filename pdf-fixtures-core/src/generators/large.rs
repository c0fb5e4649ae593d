use crate::document::{catalog_dict, page_dict, pages_dict, FontResource, CATALOG_ID, PAGES_ID};
use crate::error::{FixtureError, Result};
use crate::generators::{FixtureGenerator, GenerationSummary, BYTES_PER_MB};
use crate::layout::PageGeometry;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::ContentStream;
use crate::writer::{PdfWriter, WriterConfig, PADDING_CHUNK_SIZE};
use std::io::{self, Write};

/// Bytes set aside for the cross-reference table and trailer when sizing
/// the padding. The real footer is slightly smaller, so output lands a few
/// dozen bytes under the target.
pub const FOOTER_RESERVE: u64 = 200;

pub const MAX_SIZE_MB: u64 = 10_000;

/// Padding between progress log lines.
const PROGRESS_INTERVAL: u64 = 10 * BYTES_PER_MB;

const PAGE_ID: ObjectId = ObjectId::object(3);
const CONTENT_ID: ObjectId = ObjectId::object(4);

/// A single-page document grown to a requested size with NUL padding
/// between the last object and the cross-reference table.
#[derive(Debug, Clone)]
pub struct LargeBinaryGenerator {
    target_bytes: u64,
}

impl LargeBinaryGenerator {
    /// Rejects targets too small to hold the document itself or above the
    /// size limit.
    pub fn new(target_bytes: u64) -> Result<Self> {
        if target_bytes > MAX_SIZE_MB * BYTES_PER_MB {
            return Err(FixtureError::invalid(format!(
                "Size limit is {MAX_SIZE_MB} MB (10GB) for safety"
            )));
        }
        let minimum = Self::minimum_size()?;
        if target_bytes < minimum {
            return Err(FixtureError::invalid(format!(
                "Target size {target_bytes} bytes is below the {minimum} bytes a minimal document needs"
            )));
        }
        Ok(Self { target_bytes })
    }

    pub fn from_megabytes(megabytes: u64) -> Result<Self> {
        if megabytes == 0 {
            return Err(FixtureError::invalid("Size must be greater than 0 MB"));
        }
        if megabytes > MAX_SIZE_MB {
            return Err(FixtureError::invalid(format!(
                "Size limit is {MAX_SIZE_MB} MB (10GB) for safety"
            )));
        }
        Self::new(megabytes * BYTES_PER_MB)
    }

    pub fn target_bytes(&self) -> u64 {
        self.target_bytes
    }

    /// Smallest accepted target: the unpadded objects plus the footer
    /// reserve.
    pub fn minimum_size() -> Result<u64> {
        let mut dry_run = PdfWriter::new_with_writer(io::sink());
        write_prelude(&mut dry_run)?;
        Ok(dry_run.position() + FOOTER_RESERVE)
    }
}

fn write_prelude<W: Write>(writer: &mut PdfWriter<W>) -> Result<()> {
    let geometry = PageGeometry::letter();
    let mut content = ContentStream::new();
    content
        .begin_text()
        .set_font(FontResource::Regular.resource_name(), 14.0)
        .move_text(50.0, 750.0)
        .show_text("Large binary PDF")
        .move_text(0.0, -20.0)
        .show_text("Generated for testing purposes")
        .end_text();

    writer.write_header(&WriterConfig::default())?;
    writer.write_object(CATALOG_ID, &Object::Dictionary(catalog_dict(PAGES_ID)))?;
    writer.write_object(PAGES_ID, &Object::Dictionary(pages_dict(&[PAGE_ID])))?;
    let page = page_dict(PAGES_ID, CONTENT_ID, &geometry, &[FontResource::Regular]);
    writer.write_object(PAGE_ID, &Object::Dictionary(page))?;
    writer.write_stream_object(CONTENT_ID, Dictionary::new(), content.as_bytes())?;
    Ok(())
}

impl FixtureGenerator for LargeBinaryGenerator {
    const DEFAULT_FILENAME: &'static str = "large_test.pdf";

    fn write_to<W: Write>(&self, output: W) -> Result<GenerationSummary> {
        tracing::info!(
            target_bytes = self.target_bytes,
            megabytes = self.target_bytes / BYTES_PER_MB,
            "generating large document with binary padding"
        );
        let mut writer = PdfWriter::new_with_writer(output);
        write_prelude(&mut writer)?;

        let padding = self
            .target_bytes
            .saturating_sub(writer.position() + FOOTER_RESERVE);
        let mut written = 0;
        while written < padding {
            let step = (padding - written).min(PROGRESS_INTERVAL);
            writer.write_padding(step, PADDING_CHUNK_SIZE)?;
            written += step;
            tracing::debug!(
                written_mb = writer.position() as f64 / BYTES_PER_MB as f64,
                "padding progress"
            );
        }

        let bytes_written = writer.finish(CATALOG_ID, None)?;
        Ok(GenerationSummary {
            bytes_written,
            pages: 1,
            words: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_megabyte_bounds() {
        let err = LargeBinaryGenerator::from_megabytes(0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter: Size must be greater than 0 MB");
        let err = LargeBinaryGenerator::from_megabytes(MAX_SIZE_MB + 1).unwrap_err();
        assert!(err.to_string().contains("10000 MB"));
        assert_eq!(
            LargeBinaryGenerator::from_megabytes(3).unwrap().target_bytes(),
            3 * BYTES_PER_MB
        );
    }

    #[test]
    fn test_rejects_target_below_minimal_document() {
        let minimum = LargeBinaryGenerator::minimum_size().unwrap();
        assert!(minimum > FOOTER_RESERVE);
        assert!(LargeBinaryGenerator::new(minimum).is_ok());
        assert!(matches!(
            LargeBinaryGenerator::new(minimum - 1),
            Err(FixtureError::InvalidParameter(_))
        ));
        assert!(LargeBinaryGenerator::new(0).is_err());
    }

    #[test]
    fn test_size_within_footer_reserve() {
        for target in [4096u64, 100_000, BYTES_PER_MB + 17] {
            let generator = LargeBinaryGenerator::new(target).unwrap();
            let bytes = generator.to_bytes().unwrap();
            let size = bytes.len() as u64;
            assert!(size <= target, "{size} > {target}");
            assert!(target - size < FOOTER_RESERVE, "{size} too far below {target}");
        }
    }

    fn rfind(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .rposition(|window| window == needle)
            .unwrap()
    }

    #[test]
    fn test_padding_sits_before_index() {
        let bytes = LargeBinaryGenerator::new(10_000).unwrap().to_bytes().unwrap();
        let content = rfind(&bytes, b"4 0 obj\n");
        let index = rfind(&bytes, b"xref\n0 5\n");
        assert!(content < index);
        assert_eq!(bytes[index - 1], 0);
        assert!(bytes[content..index].iter().filter(|b| **b == 0).count() > 8000);

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Large binary PDF) Tj"));
        assert!(text.contains("/Kids [3 0 R]\n/Count 1"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_startxref_matches_index_position() {
        let bytes = LargeBinaryGenerator::new(50_000).unwrap().to_bytes().unwrap();
        let index = rfind(&bytes, b"xref\n0 5\n");
        let start = rfind(&bytes, b"startxref\n") + b"startxref\n".len();
        let tail = std::str::from_utf8(&bytes[start..]).unwrap();
        let declared: usize = tail.lines().next().unwrap().parse().unwrap();
        assert_eq!(declared, index);
    }

    #[test]
    fn test_summary_reports_one_page() {
        let generator = LargeBinaryGenerator::new(8192).unwrap();
        let mut buffer = Vec::new();
        let summary = generator.write_to(&mut buffer).unwrap();
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.bytes_written, buffer.len() as u64);
        assert_eq!(summary.words, None);
    }
}
