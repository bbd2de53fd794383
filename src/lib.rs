// src/lib.rs

//! lpak source package tooling
//!
//! Declarative manifests describe how to fetch, verify, and build a package
//! from source in a Linux From Scratch style environment.
//!
//! # Architecture
//!
//! - Manifests: YAML or JSON, detected from the leading byte
//! - Releases: time-ordered identifiers, later always sorts greater
//! - Fetching: cached by file name, verified by SHA-256 and MD5
//! - Build scripts: a fixed POSIX shell preamble plus ordered instructions
//! - Archives: tar streams compressed per the manifest's package type

pub mod compression;
mod error;
pub mod fetch;
pub mod hash;
pub mod manifest;
pub mod release;
pub mod script;
pub mod verify;

pub use compression::{compress, ArchiveFormat};
pub use error::{Error, Result};
pub use fetch::{fetch_sources, ChecksumList, FetchConfig, SourceFetcher, Transport};
pub use hash::{Hash, HashAlgorithm, Hasher};
pub use manifest::{
    FileRecord, Instruction, Manifest, ManifestFormat, ManifestOverrides, Source,
};
pub use release::{compare_releases, new_release, Release};
pub use script::{to_build_script, to_build_script_with, ScriptConfig};
pub use verify::{verify, verify_file, verify_reader, SourceDigests};
