//! Account identifiers and IAM principal ARNs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric cloud account identifier (e.g. `111111111111`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Parses an account id, accepting only non-empty all-digit values.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(trimmed.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The account root principal, `arn:aws:iam::<id>:root`.
    pub fn root_arn(&self) -> String {
        format!("arn:aws:iam::{}:root", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes declared account numbers into the set that may consume a portfolio.
///
/// Non-numeric entries and the owner's own account are dropped; duplicates keep
/// their first position.
pub fn normalize_accounts<'a>(
    raw: impl IntoIterator<Item = &'a str>,
    owner: &AccountId,
) -> Vec<AccountId> {
    let mut accounts: Vec<AccountId> = Vec::new();
    for value in raw {
        let Some(account) = AccountId::parse(value) else {
            continue;
        };
        if &account == owner || accounts.contains(&account) {
            continue;
        }
        accounts.push(account);
    }
    accounts
}

/// Expands a declared principal into a full IAM ARN.
///
/// Values already starting with `arn:` are used verbatim; anything else
/// (`role/Admin`, `user/ci`) is taken relative to the owner account.
pub fn principal_arn(declared: &str, owner: &AccountId) -> String {
    let declared = declared.trim();
    if declared.starts_with("arn:") {
        declared.to_string()
    } else {
        format!("arn:aws:iam::{owner}:{declared}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::parse("999999999999").unwrap()
    }

    #[test]
    fn parse_accepts_digits_only() {
        assert_eq!(
            AccountId::parse(" 111111111111 ").unwrap().as_str(),
            "111111111111"
        );
        assert!(AccountId::parse("").is_none());
        assert!(AccountId::parse("12ab").is_none());
        assert!(AccountId::parse("-12").is_none());
    }

    #[test]
    fn normalize_drops_owner_duplicates_and_junk() {
        let accounts = normalize_accounts(
            [
                "111111111111",
                "999999999999",
                "not-an-account",
                "222222222222",
                "111111111111",
            ],
            &owner(),
        );
        let ids: Vec<&str> = accounts.iter().map(AccountId::as_str).collect();
        assert_eq!(ids, vec!["111111111111", "222222222222"]);
    }

    #[test]
    fn root_arn_format() {
        let account = AccountId::parse("111111111111").unwrap();
        assert_eq!(account.root_arn(), "arn:aws:iam::111111111111:root");
    }

    #[test]
    fn principal_arn_expands_relative_identifiers() {
        assert_eq!(
            principal_arn("role/CatalogAdmin", &owner()),
            "arn:aws:iam::999999999999:role/CatalogAdmin"
        );
        assert_eq!(
            principal_arn("arn:aws:iam::123456789012:user/ci", &owner()),
            "arn:aws:iam::123456789012:user/ci"
        );
    }
}
