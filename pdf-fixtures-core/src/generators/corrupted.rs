use crate::corruption::CorruptionVariant;
use crate::error::Result;
use crate::generators::{FixtureGenerator, GenerationSummary};
use crate::layout::PageGeometry;
use crate::writer::PdfWriter;
use std::io::Write;

/// One corrupted document of a chosen variant.
#[derive(Debug, Clone)]
pub struct CorruptedGenerator {
    variant: CorruptionVariant,
    geometry: PageGeometry,
}

impl CorruptedGenerator {
    pub fn new(variant: CorruptionVariant) -> Self {
        Self {
            variant,
            geometry: PageGeometry::letter(),
        }
    }

    /// Parses a variant name such as `missing_xref`.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn variant(&self) -> CorruptionVariant {
        self.variant
    }
}

impl Default for CorruptedGenerator {
    fn default() -> Self {
        Self::new(CorruptionVariant::default())
    }
}

impl FixtureGenerator for CorruptedGenerator {
    const DEFAULT_FILENAME: &'static str = "corrupted.pdf";

    fn write_to<W: Write>(&self, output: W) -> Result<GenerationSummary> {
        tracing::info!(
            variant = self.variant.name(),
            "generating {}",
            self.variant.description()
        );
        let mut writer = PdfWriter::new_with_writer(output);
        let bytes_written = self.variant.write(&mut writer, &self.geometry)?;
        Ok(GenerationSummary {
            bytes_written,
            pages: 1,
            words: None,
        })
    }
}
