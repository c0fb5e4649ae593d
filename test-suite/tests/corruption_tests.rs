//! Corrupted fixtures against their own manifests
//!
//! Each variant must fail the strict validator with exactly the error kind
//! and message its manifest names.

use pdf_fixtures::{CorruptedGenerator, CorruptionVariant, FixtureGenerator, FixtureManifest};
use pdf_fixtures_test_suite::utils::create_test_output_dir;
use pdf_fixtures_test_suite::{check_expectation, StructureValidator, ValidationError};
use pretty_assertions::assert_eq;

fn strict_error(variant: CorruptionVariant) -> ValidationError {
    let bytes = CorruptedGenerator::new(variant).to_bytes().unwrap();
    match StructureValidator::strict().validate(&bytes) {
        Ok(_) => panic!("{variant} validated"),
        Err(err) => err,
    }
}

#[test]
fn test_every_variant_meets_its_manifest() -> anyhow::Result<()> {
    let dir = create_test_output_dir()?;
    for variant in CorruptionVariant::ALL {
        let path = dir.path().join(format!("{variant}.pdf"));
        let summary = CorruptedGenerator::new(variant).generate(&path)?;
        let bytes = std::fs::read(&path)?;
        assert_eq!(summary.bytes_written, bytes.len() as u64);

        let sidecar = FixtureManifest::corrupted(variant, &summary).write_sidecar(&path)?;
        let manifest = FixtureManifest::read(&sidecar)?;
        check_expectation(&bytes, &manifest.expected_behavior)
            .map_err(|err| err.context(format!("variant {variant}")))?;
    }
    Ok(())
}

#[test]
fn test_manifest_json_names_error_type() -> anyhow::Result<()> {
    let dir = create_test_output_dir()?;
    let variant = CorruptionVariant::MalformedStream;
    let path = dir.path().join("stream.pdf");
    let summary = CorruptedGenerator::new(variant).generate(&path)?;
    let bytes = std::fs::read(&path)?;
    let sidecar = FixtureManifest::corrupted(variant, &summary).write_sidecar(&path)?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(sidecar)?)?;
    assert_eq!(json["metadata"]["name"], "malformed_stream");
    assert_eq!(json["metadata"]["file_size"], bytes.len() as u64);
    assert!(json["expected_behavior"].to_string().contains("StreamLengthMismatch"));
    Ok(())
}

#[test]
fn test_error_kinds() {
    let expected = [
        (CorruptionVariant::Truncated, "UnexpectedEof"),
        (CorruptionVariant::InvalidHeader, "UnsupportedVersion"),
        (CorruptionVariant::MissingXref, "InvalidXRef"),
        (CorruptionVariant::CorruptedObject, "InvalidObject"),
        (CorruptionVariant::UnsupportedEncryption, "UnsupportedEncryption"),
        (CorruptionVariant::MalformedStream, "StreamLengthMismatch"),
    ];
    for (variant, kind) in expected {
        assert_eq!(strict_error(variant).error_type(), kind, "{variant}");
        assert_eq!(variant.expected_behavior().error_type(), Some(kind));
    }
}

#[test]
fn test_invalid_header_is_otherwise_sound() {
    let bytes = CorruptedGenerator::new(CorruptionVariant::InvalidHeader)
        .to_bytes()
        .unwrap();
    assert!(bytes.starts_with(b"%PDF-99.99\n"));

    let document = StructureValidator::lenient().validate(&bytes).unwrap();
    assert_eq!(document.version, "99.99");
    assert_eq!(document.page_count(), 1);
    assert!(document.page(1).unwrap().contains("Corrupted test document"));
}

#[test]
fn test_missing_xref_error_is_located() {
    match strict_error(CorruptionVariant::MissingXref) {
        ValidationError::InvalidXRef { offset, .. } => assert_eq!(offset, 0),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_corrupted_object_is_the_catalog() {
    match strict_error(CorruptionVariant::CorruptedObject) {
        ValidationError::InvalidObject { number, .. } => assert_eq!(number, 1),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_truncated_file_has_no_trailer() {
    let bytes = CorruptedGenerator::new(CorruptionVariant::Truncated)
        .to_bytes()
        .unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(!text.contains("endstream"));
    assert!(!text.contains("trailer"));
    assert!(!text.contains("%%EOF"));
}

#[test]
fn test_variants_are_deterministic() {
    for variant in CorruptionVariant::ALL {
        let generator = CorruptedGenerator::new(variant);
        assert_eq!(
            generator.to_bytes().unwrap(),
            generator.to_bytes().unwrap(),
            "{variant}"
        );
    }
}
