use std::fmt;

use crate::digest::ContentDigest;

/// Content-addressed object key for a stored template body.
///
/// Layout: `<prefix>/<vendor>/<mapping>/<product>/templates/<digest>.yaml`.
/// Distinct content always yields a distinct key, so an existing object at
/// the key means the exact body is already stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateKey(String);

impl TemplateKey {
    pub fn new(
        prefix: &str,
        vendor: &str,
        mapping: &str,
        product: &str,
        digest: &ContentDigest,
    ) -> Self {
        let prefix = prefix.trim_matches('/');
        Self(format!(
            "{prefix}/{vendor}/{mapping}/{product}/templates/{digest}.yaml"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public URL the catalog loads the template from.
    pub fn url(&self, url_base: &str, bucket: &str) -> String {
        format!("{}/{}/{}", url_base.trim_end_matches('/'), bucket, self.0)
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digest_bytes;

    #[test]
    fn key_layout() {
        let digest = digest_bytes(b"");
        let key = TemplateKey::new("sc-templates/", "acme", "network-mapping", "vpc", &digest);
        assert_eq!(
            key.as_str(),
            "sc-templates/acme/network-mapping/vpc/templates/d41d8cd98f00b204e9800998ecf8427e.yaml"
        );
    }

    #[test]
    fn different_content_gives_different_key() {
        let a = TemplateKey::new("sc-templates", "acme", "m", "vpc", &digest_bytes(b"a"));
        let b = TemplateKey::new("sc-templates", "acme", "m", "vpc", &digest_bytes(b"b"));
        assert_ne!(a, b);
    }

    #[test]
    fn template_url() {
        let key = TemplateKey::new("sc-templates", "acme", "m", "vpc", &digest_bytes(b""));
        assert_eq!(
            key.url("https://s3.amazonaws.com/", "catalog-bucket"),
            format!("https://s3.amazonaws.com/catalog-bucket/{key}")
        );
    }
}
