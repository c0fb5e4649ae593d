use crate::document::{PageContent, TextDocument};
use crate::error::{FixtureError, Result};
use crate::generators::{FixtureGenerator, GenerationSummary};
use crate::layout::{paginate, LineWrapper, PageGeometry};
use crate::text::{LoremWords, DEFAULT_SEED};
use crate::writer::PdfWriter;
use std::io::Write;

/// Upper bound on the word count, to keep generation time reasonable.
pub const MAX_WORDS: usize = 1_000_000;

/// Pseudo-Latin body text flowed over as many pages as it needs, each page
/// numbered `Page i of n` in its footer.
#[derive(Debug, Clone)]
pub struct LoremGenerator {
    words: usize,
    seed: u64,
    geometry: PageGeometry,
}

impl LoremGenerator {
    pub fn new(words: usize) -> Result<Self> {
        if words == 0 {
            return Err(FixtureError::invalid("Word count must be greater than 0"));
        }
        if words > MAX_WORDS {
            return Err(FixtureError::invalid(format!(
                "Word count limit is {MAX_WORDS} for performance reasons, got {words}"
            )));
        }
        Ok(Self {
            words,
            seed: DEFAULT_SEED,
            geometry: PageGeometry::letter(),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Result<Self> {
        geometry.validate()?;
        self.geometry = geometry;
        Ok(self)
    }

    pub fn words(&self) -> usize {
        self.words
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Lays the text out into pages, footers included.
    pub fn build_document(&self) -> TextDocument {
        let lines = LineWrapper::new(
            LoremWords::new(self.words, self.seed),
            self.geometry.chars_per_line(),
        );
        let pages = paginate(lines, self.geometry.lines_per_page());
        let total = pages.len();
        tracing::debug!(words = self.words, pages = total, "lorem text laid out");

        let mut document = TextDocument::new(self.geometry);
        for (index, lines) in pages.into_iter().enumerate() {
            document.add_page(
                PageContent::from_lines(lines).with_footer(format!("Page {} of {total}", index + 1)),
            );
        }
        document
    }
}

impl FixtureGenerator for LoremGenerator {
    const DEFAULT_FILENAME: &'static str = "lorem_document.pdf";

    fn write_to<W: Write>(&self, output: W) -> Result<GenerationSummary> {
        tracing::info!(words = self.words, seed = self.seed, "generating lorem document");
        let document = self.build_document();
        let mut writer = PdfWriter::new_with_writer(output);
        let bytes_written = document.write(&mut writer)?;
        Ok(GenerationSummary {
            bytes_written,
            pages: document.page_count(),
            words: Some(self.words),
        })
    }
}
