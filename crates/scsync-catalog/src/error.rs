//! Collaborator error types.
//!
//! Remote failures are not classified for retry; they abort the pass. The
//! category exists for logging only.

use std::fmt;

/// Errors returned by collaborator implementations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The requested remote entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity (portfolio, product, bucket, object).
        kind: String,
        /// Identifier that was looked up.
        id: String,
    },

    /// A remote API call failed.
    #[error("{operation} failed: {message}")]
    Remote {
        /// Name of the remote operation.
        operation: String,
        /// Error detail reported by the remote side.
        message: String,
    },

    /// The remote side answered with something that cannot be used.
    #[error("Invalid response from {operation}: {message}")]
    InvalidResponse {
        /// Name of the remote operation.
        operation: String,
        /// What was wrong with the response.
        message: String,
    },

    /// Local I/O while reading or writing object bodies.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Remote` error.
    #[must_use]
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidResponse` error.
    #[must_use]
    pub fn invalid_response(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Remote { .. } => ErrorCategory::Remote,
            Self::InvalidResponse { .. } => ErrorCategory::Protocol,
            Self::Io(_) => ErrorCategory::Io,
        }
    }
}

/// Categories of collaborator errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entity not found.
    NotFound,
    /// Remote API failure (permission, throttling, conflict).
    Remote,
    /// Unusable response.
    Protocol,
    /// Local I/O.
    Io,
}

impl ErrorCategory {
    /// Label used in the `category` field of log events.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Remote => "remote",
            Self::Protocol => "protocol",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::not_found("portfolio", "port-123");
        assert_eq!(err.to_string(), "portfolio not found: port-123");

        let err = CatalogError::remote("CreatePortfolioShare", "AccessDenied");
        assert_eq!(err.to_string(), "CreatePortfolioShare failed: AccessDenied");

        let err = CatalogError::invalid_response("CreateProduct", "missing product id");
        assert_eq!(
            err.to_string(),
            "Invalid response from CreateProduct: missing product id"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(CatalogError::not_found("object", "k").is_not_found());
        assert!(!CatalogError::remote("HeadObject", "Forbidden").is_not_found());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            CatalogError::not_found("object", "k").category(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            CatalogError::remote("ListPortfolios", "Throttling").category(),
            ErrorCategory::Remote
        );
        let io: CatalogError = std::io::Error::other("disk").into();
        assert_eq!(io.category(), ErrorCategory::Io);
        assert_eq!(ErrorCategory::Protocol.to_string(), "protocol");
    }
}
