//! Bucket access policy model and the template-access statement reconciler.
//!
//! Policy documents allow several fields to be either a single string or a
//! list of strings (`Resource`, `Action`, `Principal.AWS`), and `Statement`
//! itself may be a single object. These are modelled with [`OneOrMany`] so
//! callers never inspect JSON types at runtime, and the input shape is
//! written back unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::account::{AccountId, normalize_accounts};

pub const POLICY_VERSION: &str = "2012-10-17";
pub const GET_OBJECT_ACTION: &str = "s3:GetObject";

/// A string-or-list policy value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Every value, regardless of which form was used.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.as_slice().iter().any(|v| v == needle)
    }
}

/// A statement principal: either the `"*"` wildcard or a map keyed by
/// principal kind (`AWS`, `Service`, `Federated`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    Wildcard(String),
    Keyed(BTreeMap<String, OneOrMany>),
}

impl Principal {
    /// ARNs listed under the `AWS` key.
    pub fn aws(&self) -> &[String] {
        match self {
            Self::Wildcard(_) => &[],
            Self::Keyed(map) => map.get("AWS").map(OneOrMany::as_slice).unwrap_or(&[]),
        }
    }
}

/// One policy statement. Fields the reconciler does not look at
/// (`Condition`, `NotPrincipal`, ...) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Sid", default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Principal", default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OneOrMany>,
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Statement {
    /// Whether the statement's resource is exactly `pattern`, either as the
    /// single resource or as one member of a resource list.
    pub fn targets(&self, pattern: &str) -> bool {
        self.resource.as_ref().is_some_and(|r| r.contains(pattern))
    }

    /// `Allow s3:GetObject` on `resource` for the given AWS principals.
    pub fn allow_get_object(principals: Vec<String>, resource: OneOrMany) -> Self {
        let mut keyed = BTreeMap::new();
        keyed.insert("AWS".to_string(), OneOrMany::Many(principals));
        Self {
            sid: Some(uuid::Uuid::new_v4().to_string()),
            effect: "Allow".to_string(),
            principal: Some(Principal::Keyed(keyed)),
            action: Some(OneOrMany::One(GET_OBJECT_ACTION.to_string())),
            resource: Some(resource),
            extra: Map::new(),
        }
    }
}

/// A bucket policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Statement", deserialize_with = "statement_list")]
    pub statements: Vec<Statement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyDocument {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn statement_list<'de, D>(deserializer: D) -> Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Statements {
        Many(Vec<Statement>),
        One(Box<Statement>),
    }

    Ok(match Statements::deserialize(deserializer)? {
        Statements::Many(statements) => statements,
        Statements::One(statement) => vec![*statement],
    })
}

/// Resource pattern covering every stored template in `bucket`.
pub fn templates_resource(bucket: &str, prefix: &str) -> String {
    format!("arn:aws:s3:::{}/{}/*", bucket, prefix.trim_matches('/'))
}

/// Policy used when the bucket has none: the owner account may read every object.
pub fn default_policy(bucket: &str, owner: &AccountId) -> PolicyDocument {
    PolicyDocument {
        version: Some(POLICY_VERSION.to_string()),
        id: Some("Default-Policy".to_string()),
        statements: vec![Statement {
            sid: Some(uuid::Uuid::new_v4().to_string()),
            effect: "Allow".to_string(),
            principal: Some(Principal::Keyed(BTreeMap::from([(
                "AWS".to_string(),
                OneOrMany::One(owner.root_arn()),
            )]))),
            action: Some(OneOrMany::One(GET_OBJECT_ACTION.to_string())),
            resource: Some(OneOrMany::One(format!("arn:aws:s3:::{bucket}/*"))),
            extra: Map::new(),
        }],
        extra: Map::new(),
    }
}

/// Outcome of [`append_accounts`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyUpdate {
    /// Input statements, untouched, plus the appended statement if any.
    pub statements: Vec<Statement>,
    /// Declared accounts after normalization (numeric, owner excluded, deduplicated).
    pub accounts: Vec<AccountId>,
    /// Root ARNs granted by the appended statement; empty when nothing was appended.
    pub appended: Vec<String>,
}

/// Grants template read access to every desired account not yet covered.
///
/// Existing statements are never modified. The principals already listed on
/// statements targeting the templates pattern are collected, and a single new
/// statement is appended for the remaining root ARNs. When every account is
/// already covered nothing is appended, so repeated passes do not accumulate
/// statements.
pub fn append_accounts(
    statements: Vec<Statement>,
    desired: &[String],
    owner: &AccountId,
    bucket: &str,
    prefix: &str,
) -> PolicyUpdate {
    let accounts = normalize_accounts(desired.iter().map(String::as_str), owner);
    let pattern = templates_resource(bucket, prefix);

    let existing: Vec<&String> = statements
        .iter()
        .filter(|s| s.targets(&pattern))
        .filter_map(|s| s.principal.as_ref())
        .flat_map(Principal::aws)
        .collect();

    let appended: Vec<String> = accounts
        .iter()
        .map(AccountId::root_arn)
        .filter(|arn| !existing.iter().any(|e| *e == arn))
        .collect();

    let mut statements = statements;
    if !appended.is_empty() {
        statements.push(Statement::allow_get_object(
            appended.clone(),
            OneOrMany::Many(vec![pattern]),
        ));
    }

    PolicyUpdate {
        statements,
        accounts,
        appended,
    }
}
