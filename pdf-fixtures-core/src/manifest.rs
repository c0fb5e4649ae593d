//! JSON sidecar describing a generated fixture and how a consumer is
//! expected to react to it.

use crate::corruption::CorruptionVariant;
use crate::error::Result;
use crate::expectation::ExpectedBehavior;
use crate::generators::GenerationSummary;
use crate::writer::PdfVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureMetadata {
    /// Name of the fixture
    pub name: String,
    /// What the fixture exercises
    pub description: String,
    /// Version token written in the header
    pub pdf_version: String,
    /// File size in bytes
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureManifest {
    pub metadata: FixtureMetadata,
    pub expected_behavior: ExpectedBehavior,
}

impl FixtureManifest {
    /// Manifest for a well-formed document.
    pub fn valid(name: &str, description: &str, summary: &GenerationSummary) -> Self {
        Self {
            metadata: FixtureMetadata {
                name: name.to_string(),
                description: description.to_string(),
                pdf_version: PdfVersion::V1_4.to_string(),
                file_size: Some(summary.bytes_written),
            },
            expected_behavior: ExpectedBehavior::success(summary.pages),
        }
    }

    pub fn corrupted(variant: CorruptionVariant, summary: &GenerationSummary) -> Self {
        Self {
            metadata: FixtureMetadata {
                name: variant.name().to_string(),
                description: variant.description().to_string(),
                pdf_version: variant.pdf_version(),
                file_size: Some(summary.bytes_written),
            },
            expected_behavior: variant.expected_behavior(),
        }
    }

    /// `fixture.pdf` → `fixture.json`
    pub fn sidecar_path(pdf_path: &Path) -> PathBuf {
        pdf_path.with_extension("json")
    }

    /// Writes the manifest next to `pdf_path` and returns the sidecar path.
    pub fn write_sidecar(&self, pdf_path: &Path) -> Result<PathBuf> {
        let path = Self::sidecar_path(pdf_path);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "manifest written");
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
