//! Content digests for template bodies.
//!
//! The digest is the hex-encoded MD5 of the file content, which is also what
//! the object store reports as the entity tag of a single-part upload. That
//! lets a stored object's tag be compared directly against a local file.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Read size used when hashing files.
pub const CHUNK_SIZE: usize = 4096;

/// Lowercase hex content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Builds a digest from an object-store entity tag, which is usually
    /// wrapped in double quotes (`"d41d8cd9..."`).
    pub fn from_etag(etag: &str) -> Self {
        Self(etag.trim().trim_matches('"').to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the digest of a file, reading it in [`CHUNK_SIZE`] chunks.
pub fn digest(path: impl AsRef<Path>) -> Result<ContentDigest> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    let mut context = md5::Context::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = file.read(&mut buf).map_err(|e| CoreError::io(path, e))?;
        if read == 0 {
            break;
        }
        context.consume(&buf[..read]);
    }
    Ok(ContentDigest(format!("{:x}", context.compute())))
}

/// Computes the digest of an in-memory buffer.
pub fn digest_bytes(bytes: &[u8]) -> ContentDigest {
    ContentDigest(format!("{:x}", md5::compute(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_input_has_well_known_digest() {
        assert_eq!(
            digest_bytes(b"").as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn file_digest_matches_buffer_digest_across_chunks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        file.write_all(&body).unwrap();
        file.flush().unwrap();

        assert_eq!(digest(file.path()).unwrap(), digest_bytes(&body));
    }

    #[test]
    fn identical_bytes_give_identical_digests() {
        let a = digest_bytes(b"AWSTemplateFormatVersion: '2010-09-09'\n");
        let b = digest_bytes(b"AWSTemplateFormatVersion: '2010-09-09'\n");
        let c = digest_bytes(b"AWSTemplateFormatVersion: '2010-09-10'\n");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn etag_quotes_are_stripped() {
        let tag = ContentDigest::from_etag("\"D41D8CD98F00B204E9800998ECF8427E\"");
        assert_eq!(tag, digest_bytes(b""));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = digest("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
