//! # pdf-fixtures
//!
//! Deterministic PDF test fixtures for parser and ingestion test suites.
//!
//! ## Features
//!
//! - **Lorem documents**: seeded filler text flowed over numbered pages
//! - **Multipage documents**: one chapter per page with markers unique to that page
//! - **Large documents**: a valid single-page file padded to a requested size
//! - **Corrupted documents**: plausible files that break exactly one structural rule
//! - **Byte-exact cross-reference tables**: offsets tracked as bytes are written, never patched
//! - **Manifests**: optional JSON sidecar with the behavior a consumer should show
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_fixtures::{CorruptionVariant, CorruptedGenerator, FixtureGenerator, LoremGenerator, Result};
//!
//! # fn main() -> Result<()> {
//! let summary = LoremGenerator::new(2_000)?.generate("lorem_document.pdf")?;
//! println!("{summary}");
//!
//! CorruptedGenerator::new(CorruptionVariant::MissingXref).generate("missing_xref.pdf")?;
//! # Ok(())
//! # }
//! ```
//!
//! Lower-level pieces are public too: [`writer::PdfWriter`] serializes
//! objects and the index, [`document::TextDocument`] assembles paginated
//! text into a page tree.

pub mod corruption;
pub mod document;
pub mod error;
pub mod expectation;
pub mod generators;
pub mod layout;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod objects;
pub mod output;
pub mod text;
pub mod writer;

pub use corruption::CorruptionVariant;
pub use document::{DocumentInfo, PageContent, TextDocument, TextLine};
pub use error::{FixtureError, Result};
pub use expectation::ExpectedBehavior;
pub use generators::{
    CorruptedGenerator, FixtureGenerator, GenerationSummary, LargeBinaryGenerator, LoremGenerator,
    MultipageGenerator,
};
pub use layout::PageGeometry;
#[cfg(feature = "manifest")]
pub use manifest::{FixtureManifest, FixtureMetadata};
pub use output::{check_overwrite, OutputDecision};
pub use writer::{PdfVersion, PdfWriter, WriterConfig};

/// Current version of pdf-fixtures
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
