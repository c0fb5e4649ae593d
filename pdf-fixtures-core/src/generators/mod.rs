//! Fixture generators.
//!
//! Each generator validates its parameters when it is built, so a rejected
//! request never creates or truncates a file.

mod corrupted;
mod large;
mod lorem;
mod multipage;

pub use corrupted::CorruptedGenerator;
pub use large::{LargeBinaryGenerator, FOOTER_RESERVE, MAX_SIZE_MB};
pub use lorem::{LoremGenerator, MAX_WORDS};
pub use multipage::{page_markers, MultipageGenerator, DOCUMENT_TITLE, MAX_PAGES, TOPICS};

use crate::error::Result;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// What a generator produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationSummary {
    pub bytes_written: u64,
    /// Physical pages in the page tree
    pub pages: usize,
    /// Words of generated body text, for text generators
    pub words: Option<usize>,
}

impl GenerationSummary {
    pub fn megabytes(&self) -> f64 {
        self.bytes_written as f64 / BYTES_PER_MB as f64
    }
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = if self.bytes_written >= BYTES_PER_MB {
            format!("{:.1}MB", self.megabytes())
        } else {
            format!("{:.1}KB", self.bytes_written as f64 / 1024.0)
        };
        write!(f, "Generated PDF: {size} ({} bytes)", self.bytes_written)?;
        match self.words {
            Some(words) => write!(f, "\nContent: {words} words across {} page(s)", self.pages),
            None => write!(f, "\nPages: {}", self.pages),
        }
    }
}

/// A source of one fixture file.
pub trait FixtureGenerator {
    /// File name used when the caller does not pick one.
    const DEFAULT_FILENAME: &'static str;

    /// Streams the whole document into `output`.
    fn write_to<W: Write>(&self, output: W) -> Result<GenerationSummary>;

    /// Creates (or truncates) `path` and writes the document through a
    /// buffered handle.
    fn generate(&self, path: impl AsRef<Path>) -> Result<GenerationSummary> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let summary = self.write_to(BufWriter::new(file))?;
        tracing::info!(
            path = %path.display(),
            bytes = summary.bytes_written,
            pages = summary.pages,
            "fixture written"
        );
        Ok(summary)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }
}
