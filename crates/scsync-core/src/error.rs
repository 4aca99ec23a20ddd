use std::path::{Path, PathBuf};

use thiserror::Error;

/// Core error types for catalog manifests, digests and policies
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Invalid bucket policy: {0}")]
    PolicyJson(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new Io error bound to the path being read
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new ManifestParse error
    pub fn manifest_parse(path: impl AsRef<Path>, source: serde_yaml::Error) -> Self {
        Self::ManifestParse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a new InvalidManifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Check if this error comes from the manifests rather than remote state
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ManifestParse { .. } | Self::InvalidManifest { .. })
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Io { .. } => ErrorCategory::System,
            Self::ManifestParse { .. } | Self::InvalidManifest { .. } => ErrorCategory::Validation,
            Self::PolicyJson(_) => ErrorCategory::Serialization,
        }
    }
}

/// Error categories for log classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
    System,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Serialization => "serialization",
            Self::System => "system",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_manifest_error() {
        let err = CoreError::invalid_manifest("missing name");
        assert_eq!(err.to_string(), "Invalid manifest: missing name");
        assert!(err.is_input_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = CoreError::io(
            "/tmp/vpc.yaml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("/tmp/vpc.yaml"));
        assert!(!err.is_input_error());
        assert_eq!(err.category(), ErrorCategory::System);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::PolicyJson(_)));
        assert!(!core_err.is_input_error());
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Validation.to_string(), "validation");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::System.to_string(), "system");
    }
}
