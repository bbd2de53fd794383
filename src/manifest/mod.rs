// src/manifest/mod.rs

//! Package manifests
//!
//! A manifest describes how to fetch, verify, and build one package from
//! source:
//! - Metadata (name, version, release, platform)
//! - Source archives with expected digests
//! - Ordered build instructions
//! - The files recorded by the last fetch
//!
//! # Example Manifest
//!
//! ```yaml
//! name: foo
//! version: 1.2.3
//! release: 01ARYZ6S41TSV4RRFFQ69G5FAV
//! package: tar.xz
//! platform_id: x86_64-gnu-linux-9
//! sources:
//!   - archive: https://example.com/foo-1.2.3.tar.gz
//!     sha256: b94d27b9...
//! instructions:
//!   - unpack: tar -xvf foo-1.2.3.tar.gz && cd foo-1.2.3
//!     configure: ./configure --prefix=/usr
//!     build: make
//!     install: make install
//! ```

pub mod codec;
mod format;

pub use codec::{
    decode, decode_as, decode_file, encode, encode_pretty, is_json_format, ManifestFormat,
};
pub use format::{
    FileRecord, Instruction, Manifest, ManifestOverrides, Source, DEFAULT_FILE_MODE,
    DEFAULT_PACKAGE_TYPE, DEFAULT_PLATFORM_ID,
};
