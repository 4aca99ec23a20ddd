use std::path::{Path, PathBuf};

use scsync_catalog::CatalogError;
use scsync_core::CoreError;
use thiserror::Error;

/// Errors that abort a reconciliation pass.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Portfolio name '{name}' matches {} portfolios: {}", ids.len(), ids.join(", "))]
    AmbiguousPortfolio { name: String, ids: Vec<String> },

    #[error("Artifact has no packages directory at {}", path.display())]
    MissingPackages { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid artifact: {0}")]
    Artifact(String),

    #[error("Invalid job event: {0}")]
    JobDecode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Errors caused by the artifact, manifests or event rather than the remote side.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::Core(e) => e.is_input_error(),
            Self::AmbiguousPortfolio { .. }
            | Self::MissingPackages { .. }
            | Self::Artifact(_)
            | Self::JobDecode(_)
            | Self::Config(_) => true,
            Self::Catalog(_) | Self::Io { .. } => false,
        }
    }

    /// Short label used as the `category` field of error events.
    ///
    /// Wrapped core and collaborator errors report their own category.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Core(e) => e.category().as_str(),
            Self::Catalog(e) => e.category().as_str(),
            Self::AmbiguousPortfolio { .. } => "ambiguous",
            Self::MissingPackages { .. } | Self::Artifact(_) => "artifact",
            Self::Io { .. } => "io",
            Self::JobDecode(_) => "decode",
            Self::Config(_) => "config",
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_portfolio_lists_ids() {
        let err = SyncError::AmbiguousPortfolio {
            name: "Networking".into(),
            ids: vec!["port-1".into(), "port-2".into()],
        };
        assert_eq!(
            err.to_string(),
            "Portfolio name 'Networking' matches 2 portfolios: port-1, port-2"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn remote_errors_are_not_input_errors() {
        let err: SyncError = CatalogError::remote("CreatePortfolio", "AccessDenied").into();
        assert!(!err.is_input_error());
        assert_eq!(err.category(), "remote");
        assert_eq!(err.to_string(), "CreatePortfolio failed: AccessDenied");
    }

    #[test]
    fn wrapped_errors_report_their_own_category() {
        let err: SyncError = CoreError::invalid_manifest("portfolio 'N' has no owner").into();
        assert_eq!(err.category(), "validation");

        let err: SyncError = CatalogError::not_found("object", "artifact.zip").into();
        assert_eq!(err.category(), "not_found");

        let err: SyncError = CatalogError::invalid_response("ListPortfolios", "no id").into();
        assert_eq!(err.category(), "protocol");

        let err = SyncError::MissingPackages { path: "/tmp/a/packages".into() };
        assert_eq!(err.category(), "artifact");
    }
}
