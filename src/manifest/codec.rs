// src/manifest/codec.rs

//! Manifest decoding and encoding
//!
//! Manifests are YAML or JSON. The format is picked from the first
//! non-whitespace byte: `{` or `[` means JSON, anything else YAML. A YAML
//! flow mapping that starts with `{` is therefore treated as JSON.

use crate::error::{Error, Result};
use crate::manifest::format::Manifest;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Serialization format of a manifest document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManifestFormat {
    Json,
    #[default]
    Yaml,
}

impl ManifestFormat {
    /// Detect the format of a document from its leading byte
    pub fn detect(content: &[u8]) -> Self {
        if is_json_format(content) {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    /// Name used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Conventional file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManifestFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(Error::ParseError {
                format: "manifest",
                message: format!("unknown format '{}', expected json or yaml", other),
            }),
        }
    }
}

/// True if the first non-whitespace character opens a JSON object or array
///
/// Whitespace is the Unicode `White_Space` set, so vertical tab, NEL and
/// no-break space are skipped as well.
pub fn is_json_format(content: &[u8]) -> bool {
    String::from_utf8_lossy(content)
        .trim_start()
        .starts_with(['{', '['])
}

/// Decode a manifest, detecting the format
pub fn decode(content: &[u8]) -> Result<Manifest> {
    decode_as(content, ManifestFormat::detect(content))
}

/// Decode a manifest in a known format
pub fn decode_as(content: &[u8], format: ManifestFormat) -> Result<Manifest> {
    decode_value(content, format)
}

/// Decode any deserializable document in the given format
pub fn decode_value<T: DeserializeOwned>(content: &[u8], format: ManifestFormat) -> Result<T> {
    match format {
        ManifestFormat::Json => serde_json::from_slice(content).map_err(|e| Error::ParseError {
            format: format.name(),
            message: e.to_string(),
        }),
        ManifestFormat::Yaml => serde_yaml::from_slice(content).map_err(|e| Error::ParseError {
            format: format.name(),
            message: e.to_string(),
        }),
    }
}

/// Read and decode a manifest file
pub fn decode_file(path: &Path) -> Result<Manifest> {
    let content = std::fs::read(path).map_err(|e| {
        Error::IoError(format!("Failed to read manifest {}: {}", path.display(), e))
    })?;

    decode(&content).map_err(|e| match e {
        Error::ParseError { format, message } => Error::ParseError {
            format,
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })
}

/// Encode a manifest as compact JSON or YAML
pub fn encode(manifest: &Manifest, format: ManifestFormat) -> Result<Vec<u8>> {
    match format {
        ManifestFormat::Json => serde_json::to_vec(manifest).map_err(|e| serialize_error(format, e)),
        ManifestFormat::Yaml => serde_yaml::to_string(manifest)
            .map(String::into_bytes)
            .map_err(|e| serialize_error(format, e)),
    }
}

/// Encode a manifest with two-space indented JSON; YAML is unchanged
pub fn encode_pretty(manifest: &Manifest, format: ManifestFormat) -> Result<Vec<u8>> {
    match format {
        ManifestFormat::Json => {
            serde_json::to_vec_pretty(manifest).map_err(|e| serialize_error(format, e))
        }
        ManifestFormat::Yaml => encode(manifest, format),
    }
}

fn serialize_error(format: ManifestFormat, e: impl fmt::Display) -> Error {
    Error::SerializeError {
        format: format.name(),
        message: e.to_string(),
    }
}
