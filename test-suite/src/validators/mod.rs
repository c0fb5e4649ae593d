//! Validators for generated fixtures
//!
//! [`StructureValidator`] reads a file strictly through its cross-reference
//! table. [`check_expectation`] compares the result with the behavior a
//! fixture manifest promises.

pub mod expectation_validator;
pub mod structure_validator;

pub use expectation_validator::check_expectation;
pub use structure_validator::{
    is_supported_version, PageText, StructureValidator, ValidatedDocument, ValidationError,
    ValidationResult,
};
