use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown corruption type '{name}' (expected one of: {expected})")]
    UnknownVariant { name: String, expected: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FixtureError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FixtureError::InvalidParameter(message.into())
    }
}

#[cfg(feature = "manifest")]
impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        FixtureError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_invalid_parameter_display() {
        let error = FixtureError::invalid("Word count must be greater than 0");
        assert_eq!(
            error.to_string(),
            "Invalid parameter: Word count must be greater than 0"
        );
    }

    #[test]
    fn test_unknown_variant_display() {
        let error = FixtureError::UnknownVariant {
            name: "bogus".to_string(),
            expected: "truncated, invalid_header".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("'bogus'"));
        assert!(message.contains("truncated, invalid_header"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = IoError::new(ErrorKind::PermissionDenied, "access denied");
        let error = FixtureError::from(io_error);

        match error {
            FixtureError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected IO error variant"),
        }
        assert!(error.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_debug() {
        let error = FixtureError::InvalidParameter("page count".to_string());
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("InvalidParameter"));
        assert!(debug_str.contains("page count"));
    }
}
