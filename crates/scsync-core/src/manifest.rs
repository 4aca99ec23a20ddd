//! Portfolio mapping manifests.
//!
//! A manifest is the declarative description of one portfolio: its metadata,
//! the accounts it is shared with, the principals granted access, and the
//! products (templates) it contains.
//!
//! ```yaml
//! name: Networking
//! description: Shared network building blocks
//! owner: platform@example.com
//! tags:
//!   team: platform
//! principals:
//!   - role/CatalogEndUser
//! accounts:
//!   - number: 111111111111
//! products:
//!   - name: vpc
//!     owner: platform@example.com
//!     description: Standard VPC
//!     template: vpc.yaml
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::account::{AccountId, normalize_accounts, principal_arn};
use crate::error::{CoreError, Result};

/// A parsed portfolio manifest.
///
/// `owner` is required on the portfolio and on every product; descriptions
/// may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub tags: Option<TagSet>,
    #[serde(default)]
    pub principals: Vec<String>,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
    pub products: Vec<ProductDecl>,
}

/// A product declared inside a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDecl {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub description: String,
    /// Template path relative to the vendor folder.
    pub template: String,
    #[serde(default)]
    pub support_email: Option<String>,
}

impl ProductDecl {
    /// Support contact, falling back to the product owner.
    pub fn support_email(&self) -> &str {
        self.support_email.as_deref().unwrap_or(&self.owner)
    }
}

/// An entry of the `accounts` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub number: AccountNumber,
}

/// Account numbers may be written as YAML integers or strings.
///
/// Quote the value to keep leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountNumber {
    Int(u64),
    Text(String),
}

impl AccountNumber {
    pub fn as_string(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Portfolio tags, either as a plain mapping or as the `Key`/`Value` list
/// form accepted by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagSet {
    Map(#[serde(deserialize_with = "scalar_map")] BTreeMap<String, String>),
    List(Vec<TagEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    #[serde(rename = "Key", alias = "key")]
    pub key: String,
    #[serde(rename = "Value", alias = "value", deserialize_with = "scalar")]
    pub value: String,
}

/// Unquoted numbers and booleans are accepted as tag values and kept as text.
fn scalar_text(value: serde_yaml::Value) -> std::result::Result<String, String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("tag values must be scalars, got {other:?}")),
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    scalar_text(serde_yaml::Value::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn scalar_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, String>, D::Error> {
    BTreeMap::<String, serde_yaml::Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| Ok((key, scalar_text(value).map_err(D::Error::custom)?)))
        .collect()
}

impl TagSet {
    /// Key/value pairs in declaration order (mapping form is key-sorted).
    pub fn pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Self::List(list) => list.iter().map(|t| (t.key.clone(), t.value.clone())).collect(),
        }
    }
}

impl Manifest {
    /// Parses and validates a manifest from YAML text.
    pub fn from_yaml_str(source: &str, origin: impl AsRef<Path>) -> Result<Self> {
        let manifest: Manifest =
            serde_yaml::from_str(source).map_err(|e| CoreError::manifest_parse(&origin, e))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads, parses and validates a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        Self::from_yaml_str(&source, path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_manifest("portfolio name must not be empty"));
        }
        if self.owner.trim().is_empty() {
            return Err(CoreError::invalid_manifest(format!(
                "portfolio '{}' has no owner",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(CoreError::invalid_manifest(format!(
                    "portfolio '{}' declares a product without a name",
                    self.name
                )));
            }
            if product.owner.trim().is_empty() {
                return Err(CoreError::invalid_manifest(format!(
                    "product '{}' in portfolio '{}' has no owner",
                    product.name, self.name
                )));
            }
            if product.template.trim().is_empty() {
                return Err(CoreError::invalid_manifest(format!(
                    "product '{}' in portfolio '{}' has no template",
                    product.name, self.name
                )));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(CoreError::invalid_manifest(format!(
                    "product '{}' is declared twice in portfolio '{}'",
                    product.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Raw account numbers as declared.
    pub fn account_numbers(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.number.as_string()).collect()
    }

    /// Accounts the portfolio should be shared with.
    pub fn share_accounts(&self, owner: &AccountId) -> Vec<AccountId> {
        let raw = self.account_numbers();
        normalize_accounts(raw.iter().map(String::as_str), owner)
    }

    /// Principal ARNs to associate, in declaration order.
    pub fn principal_arns(&self, owner: &AccountId) -> Vec<String> {
        self.principals
            .iter()
            .map(|p| principal_arn(p, owner))
            .collect()
    }

    /// Declared tags as key/value pairs; empty when no tags are declared.
    pub fn tag_pairs(&self) -> Vec<(String, String)> {
        self.tags.as_ref().map(TagSet::pairs).unwrap_or_default()
    }
}
