//! Integration tests for fixture generation on disk
//!
//! These tests run each generator against a temporary directory and check
//! the files it leaves behind, including the cases where nothing may be
//! written at all.

use pdf_fixtures::generators::FOOTER_RESERVE;
use pdf_fixtures::{
    CorruptedGenerator, CorruptionVariant, FixtureError, FixtureGenerator, LargeBinaryGenerator,
    LoremGenerator, MultipageGenerator, Result,
};
use std::fs;
use tempfile::TempDir;

fn xref_offsets(bytes: &[u8]) -> Vec<(u32, u64)> {
    let marker = bytes
        .windows(10)
        .rposition(|w| w == b"startxref\n")
        .expect("startxref keyword");
    let tail = std::str::from_utf8(&bytes[marker + 10..]).expect("ascii tail");
    let start: usize = tail.lines().next().unwrap().parse().unwrap();
    assert!(bytes[start..].starts_with(b"xref\n"));

    let text = std::str::from_utf8(&bytes[start..]).expect("ascii footer");
    let mut lines = text.lines().skip(1);
    let header = lines.next().unwrap();
    let size: u32 = header.split_whitespace().nth(1).unwrap().parse().unwrap();
    lines
        .take(size as usize)
        .enumerate()
        .skip(1)
        .map(|(number, entry)| (number as u32, entry[..10].parse().unwrap()))
        .collect()
}

fn assert_offsets_point_at_objects(bytes: &[u8]) {
    for (number, offset) in xref_offsets(bytes) {
        let introducer = format!("{number} 0 obj\n");
        assert!(
            bytes[offset as usize..].starts_with(introducer.as_bytes()),
            "object {number} not at offset {offset}"
        );
    }
}

#[test]
fn test_lorem_file_workflow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(LoremGenerator::DEFAULT_FILENAME);

    let summary = LoremGenerator::new(3_000)?.generate(&path)?;
    let bytes = fs::read(&path)?;

    assert_eq!(summary.bytes_written, bytes.len() as u64);
    assert_eq!(summary.words, Some(3_000));
    assert!(summary.pages > 1);
    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));
    assert_offsets_point_at_objects(&bytes);

    let text = String::from_utf8_lossy(&bytes);
    let last_footer = format!("(Page {0} of {0}) Tj", summary.pages);
    assert!(text.contains(&last_footer));
    Ok(())
}

#[test]
fn test_multipage_file_workflow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(MultipageGenerator::DEFAULT_FILENAME);

    let summary = MultipageGenerator::new(20)?.generate(&path)?;
    let bytes = fs::read(&path)?;

    assert_eq!(summary.pages, 21);
    assert_offsets_point_at_objects(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Count 21"));
    assert!(text.contains("PAGE-020"));
    assert!(text.contains("MARKER-2000"));
    Ok(())
}

#[test]
fn test_large_file_workflow() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(LargeBinaryGenerator::DEFAULT_FILENAME);

    let generator = LargeBinaryGenerator::from_megabytes(2)?;
    generator.generate(&path)?;
    let size = fs::metadata(&path)?.len();

    assert!(size <= generator.target_bytes());
    assert!(generator.target_bytes() - size < FOOTER_RESERVE);
    assert_offsets_point_at_objects(&fs::read(&path)?);
    Ok(())
}

#[test]
fn test_every_corruption_variant_on_disk() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    for variant in CorruptionVariant::ALL {
        let path = temp_dir.path().join(format!("{}.pdf", variant.name()));
        let summary = CorruptedGenerator::new(variant).generate(&path)?;
        let bytes = fs::read(&path)?;
        assert_eq!(summary.bytes_written, bytes.len() as u64, "{variant}");
        assert!(bytes.starts_with(b"%PDF-"), "{variant}");
    }
    Ok(())
}

#[test]
fn test_count_of_one_succeeds() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    let lorem = temp_dir.path().join("one_word.pdf");
    assert_eq!(LoremGenerator::new(1)?.generate(&lorem)?.pages, 1);

    let multipage = temp_dir.path().join("one_page.pdf");
    assert_eq!(MultipageGenerator::new(1)?.generate(&multipage)?.pages, 2);

    let large = temp_dir.path().join("one_mb.pdf");
    LargeBinaryGenerator::from_megabytes(1)?.generate(&large)?;
    assert!(large.exists());
    Ok(())
}

#[test]
fn test_zero_is_rejected_before_any_file_exists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("never.pdf");

    let attempts: Vec<std::result::Result<(), FixtureError>> = vec![
        LoremGenerator::new(0).and_then(|g| g.generate(&path).map(|_| ())),
        MultipageGenerator::new(0).and_then(|g| g.generate(&path).map(|_| ())),
        LargeBinaryGenerator::from_megabytes(0).and_then(|g| g.generate(&path).map(|_| ())),
        CorruptedGenerator::from_name("not_a_variant").and_then(|g| g.generate(&path).map(|_| ())),
    ];

    for attempt in attempts {
        assert!(attempt.is_err());
    }
    assert!(!path.exists());
}

#[test]
fn test_generation_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.pdf");
    let second = temp_dir.path().join("second.pdf");

    LoremGenerator::new(2_500)?.with_seed(42).generate(&first)?;
    LoremGenerator::new(2_500)?.with_seed(42).generate(&second)?;
    assert_eq!(fs::read(&first)?, fs::read(&second)?);

    MultipageGenerator::new(7)?.generate(&first)?;
    MultipageGenerator::new(7)?.generate(&second)?;
    assert_eq!(fs::read(&first)?, fs::read(&second)?);
    Ok(())
}

#[test]
fn test_generate_overwrites_existing_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("existing.pdf");
    fs::write(&path, vec![b'x'; 100_000])?;

    let summary = CorruptedGenerator::default().generate(&path)?;
    assert_eq!(fs::metadata(&path)?.len(), summary.bytes_written);
    Ok(())
}

#[test]
fn test_unwritable_destination_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing_dir").join("out.pdf");
    let err = LoremGenerator::new(10).unwrap().generate(&path).unwrap_err();
    assert!(matches!(err, FixtureError::Io(_)));
}

#[cfg(feature = "manifest")]
#[test]
fn test_manifest_next_to_fixture() -> Result<()> {
    use pdf_fixtures::{ExpectedBehavior, FixtureManifest};

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("encrypted.pdf");
    let variant = CorruptionVariant::UnsupportedEncryption;
    let summary = CorruptedGenerator::new(variant).generate(&path)?;

    let sidecar = FixtureManifest::corrupted(variant, &summary).write_sidecar(&path)?;
    let manifest = FixtureManifest::read(&sidecar)?;
    assert_eq!(manifest.metadata.file_size, Some(fs::metadata(&path)?.len()));
    assert!(matches!(
        manifest.expected_behavior,
        ExpectedBehavior::ParseError { ref error_type, .. } if error_type == "UnsupportedEncryption"
    ));
    Ok(())
}
