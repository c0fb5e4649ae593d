//! Compares a validator outcome with a fixture's expected behavior.

use super::structure_validator::{StructureValidator, ValidatedDocument, ValidationError};
use anyhow::{bail, ensure, Context, Result};
use pdf_fixtures::ExpectedBehavior;
use regex::{Regex, RegexBuilder};

fn pattern(source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("invalid expectation pattern '{source}'"))
}

fn expect_error(
    outcome: Result<ValidatedDocument, ValidationError>,
    error_type: &str,
) -> Result<ValidationError> {
    match outcome {
        Ok(document) => bail!(
            "expected {error_type}, but the file validated with {} page(s)",
            document.page_count()
        ),
        Err(err) => {
            ensure!(
                err.error_type() == error_type,
                "expected {error_type}, got {}: {err}",
                err.error_type()
            );
            Ok(err)
        }
    }
}

/// Validates `data` and checks the outcome against `expected`.
///
/// Warning expectations are checked twice: a strict validator must fail
/// with the named kind, a lenient one must succeed and report a warning
/// matching one of the patterns.
pub fn check_expectation(data: &[u8], expected: &ExpectedBehavior) -> Result<()> {
    match expected {
        ExpectedBehavior::ParseSuccess { page_count } => {
            let document = StructureValidator::strict()
                .validate(data)
                .context("expected the file to validate")?;
            ensure!(
                document.page_count() == *page_count,
                "expected {page_count} page(s), found {}",
                document.page_count()
            );
            ensure!(
                document.warnings.is_empty(),
                "unexpected warnings: {:?}",
                document.warnings
            );
        }
        ExpectedBehavior::ParseError {
            error_type,
            error_pattern,
        } => {
            let err = expect_error(StructureValidator::strict().validate(data), error_type)?;
            if let Some(source) = error_pattern {
                let message = err.to_string();
                ensure!(
                    pattern(source)?.is_match(&message),
                    "'{message}' does not match /{source}/"
                );
            }
        }
        ExpectedBehavior::ParseWarning {
            error_type,
            warning_patterns,
        } => {
            expect_error(StructureValidator::strict().validate(data), error_type)?;

            let document = StructureValidator::lenient()
                .validate(data)
                .context("expected a lenient validator to accept the file")?;
            let patterns = warning_patterns
                .iter()
                .map(|source| pattern(source))
                .collect::<Result<Vec<_>>>()?;
            let matched = document.warnings.iter().any(|warning| {
                warning.error_type() == error_type
                    && patterns.iter().any(|p| p.is_match(&warning.to_string()))
            });
            ensure!(
                matched,
                "no {error_type} warning matches {warning_patterns:?}; got {:?}",
                document.warnings
            );
        }
    }
    Ok(())
}
