pub mod account;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod policy;
pub mod template_key;

pub use account::{AccountId, normalize_accounts, principal_arn};
pub use digest::{ContentDigest, digest, digest_bytes};
pub use error::{CoreError, ErrorCategory, Result};
pub use manifest::{AccountEntry, AccountNumber, Manifest, ProductDecl, TagEntry, TagSet};
pub use policy::{
    OneOrMany, PolicyDocument, PolicyUpdate, Principal, Statement, append_accounts,
    default_policy, templates_resource,
};
pub use template_key::TemplateKey;
