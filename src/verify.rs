// src/verify.rs

//! Source archive verification
//!
//! Computes SHA-256 and MD5 over fetched content and compares them against
//! the digests declared in a manifest [`Source`](crate::manifest::Source).
//! An expected digest that is absent or empty means "no check" for that
//! algorithm. SHA-256 is checked first since it is authoritative.
//!
//! Verification never removes a bad file; cleanup is left to the caller.

use crate::error::{Error, Result};
use crate::hash::{hash_bytes, Hash, HashAlgorithm, Hasher};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Digests computed over one source archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDigests {
    pub sha256: Hash,
    pub md5: Hash,
}

impl SourceDigests {
    /// Compute both digests over an in-memory buffer
    pub fn compute(content: &[u8]) -> Self {
        Self {
            sha256: hash_bytes(HashAlgorithm::Sha256, content),
            md5: hash_bytes(HashAlgorithm::Md5, content),
        }
    }

    /// Compute both digests in a single pass over a reader
    pub fn compute_reader<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut sha256 = Hasher::new(HashAlgorithm::Sha256);
        let mut md5 = Hasher::new(HashAlgorithm::Md5);
        let mut buffer = [0u8; 8192];

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            sha256.update(&buffer[..n]);
            md5.update(&buffer[..n]);
        }

        Ok(Self {
            sha256: sha256.finalize(),
            md5: md5.finalize(),
        })
    }

    /// Check these digests against the expected values
    ///
    /// `origin` names the archive or file in a mismatch error.
    pub fn check(
        &self,
        origin: &Path,
        expected_md5: Option<&str>,
        expected_sha256: Option<&str>,
    ) -> Result<()> {
        check_one(origin, &self.sha256, expected_sha256)?;
        check_one(origin, &self.md5, expected_md5)
    }
}

fn check_one(origin: &Path, actual: &Hash, expected: Option<&str>) -> Result<()> {
    let expected = match expected.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => return Ok(()),
    };

    if actual.matches(expected) {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            algorithm: actual.algorithm,
            source_ref: origin.display().to_string(),
            path: origin.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.value.clone(),
        })
    }
}

/// Verify a byte buffer against expected digests
///
/// Returns the computed digests on success so callers can record them.
///
/// # Example
/// ```
/// use lpak::verify::verify;
///
/// let sha = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
/// let digests = verify(b"hello world", None, Some(sha)).unwrap();
/// assert_eq!(digests.md5.as_str(), "5eb63bbbe01eeed093cb22bb8f5acdc3");
/// ```
pub fn verify(
    content: &[u8],
    expected_md5: Option<&str>,
    expected_sha256: Option<&str>,
) -> Result<SourceDigests> {
    let digests = SourceDigests::compute(content);
    digests.check(Path::new("<buffer>"), expected_md5, expected_sha256)?;
    Ok(digests)
}

/// Verify a stream against expected digests without buffering it
pub fn verify_reader<R: Read>(
    reader: &mut R,
    origin: &Path,
    expected_md5: Option<&str>,
    expected_sha256: Option<&str>,
) -> Result<SourceDigests> {
    let digests = SourceDigests::compute_reader(reader)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {}", origin.display(), e)))?;
    digests.check(origin, expected_md5, expected_sha256)?;
    Ok(digests)
}

/// Verify a file on disk against expected digests
pub fn verify_file(
    path: &Path,
    expected_md5: Option<&str>,
    expected_sha256: Option<&str>,
) -> Result<SourceDigests> {
    let mut file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    verify_reader(&mut file, path, expected_md5, expected_sha256)
}
