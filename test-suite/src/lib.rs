//! Test suite for pdf-fixtures
//!
//! Reads generated fixtures back with an independent, strict parser and
//! checks them against the behavior each fixture promises.

pub mod parser;
pub mod validators;

pub use validators::{check_expectation, StructureValidator, ValidatedDocument, ValidationError};

/// Common test utilities
pub mod utils {
    use pdf_fixtures::FixtureGenerator;
    use std::path::{Path, PathBuf};

    /// Create a temporary directory for test outputs
    pub fn create_test_output_dir() -> anyhow::Result<tempfile::TempDir> {
        Ok(tempfile::tempdir()?)
    }

    /// Writes `generator`'s fixture into `dir` and returns its path and bytes.
    pub fn generate_into<G: FixtureGenerator>(
        generator: &G,
        dir: &Path,
        name: &str,
    ) -> anyhow::Result<(PathBuf, Vec<u8>)> {
        let path = dir.join(name);
        generator.generate(&path)?;
        let bytes = std::fs::read(&path)?;
        Ok((path, bytes))
    }

    /// Finds the last occurrence of `needle` in `haystack`.
    pub fn rfind_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .rposition(|window| window == needle)
    }
}
