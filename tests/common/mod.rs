// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use lpak::{Instruction, Manifest, Source};
use tempfile::TempDir;

/// Archive body served or copied by fetch tests
pub const ARCHIVE_BODY: &[u8] = b"hello world";

/// SHA-256 of [`ARCHIVE_BODY`]
pub const ARCHIVE_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// MD5 of [`ARCHIVE_BODY`]
pub const ARCHIVE_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";

/// Create a scratch directory for sources.
///
/// Keep the TempDir alive to prevent cleanup.
pub fn source_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// A manifest with one source at `archive` expecting [`ARCHIVE_BODY`].
pub fn hello_manifest(archive: &str) -> Manifest {
    let mut source = Source::new(archive);
    source.sha256 = ARCHIVE_SHA256.to_string();
    source.md5 = ARCHIVE_MD5.to_string();

    Manifest {
        name: "hello".to_string(),
        version: "1.0".to_string(),
        release: "01ARYZ6S41TSV4RRFFQ69G5FAV".to_string(),
        package_type: "tar.xz".to_string(),
        platform_id: "x86_64-gnu-linux-9".to_string(),
        provides: vec!["hello".to_string()],
        requires: vec!["glibc".to_string()],
        sources: vec![source],
        instructions: vec![Instruction::autotools("hello-1.0.tar.gz", "hello", "1.0")],
        ..Default::default()
    }
}
