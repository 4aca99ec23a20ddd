//! Types crossing the collaborator traits.

use scsync_core::ContentDigest;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token; `None` on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// A final page.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    /// A page followed by more results.
    #[must_use]
    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// A portfolio as listed by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSummary {
    pub id: String,
    pub display_name: String,
    pub description: Option<String>,
    pub provider_name: Option<String>,
}

/// A product as listed under a portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub product_id: String,
    pub name: String,
    pub owner: Option<String>,
}

/// A resource tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parameters for creating a portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSpec {
    pub display_name: String,
    pub description: String,
    pub provider_name: String,
    pub tags: Vec<Tag>,
    pub idempotency_token: String,
}

/// Parameters for updating an existing portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioUpdate {
    pub id: String,
    pub description: String,
    pub provider_name: String,
    pub add_tags: Vec<Tag>,
    pub remove_tag_keys: Vec<String>,
}

/// A template version to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub description: String,
    pub template_url: String,
}

/// Parameters for creating a product with its first provisioning artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSpec {
    pub name: String,
    pub owner: String,
    pub description: String,
    pub support_email: String,
    pub artifact: ArtifactSpec,
    pub idempotency_token: String,
}

/// Result of looking up an object's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectLookup {
    /// The object exists; its entity tag as a content digest.
    Found(ContentDigest),
    /// No object at that key.
    NotFound,
}
