// src/manifest/format.rs

//! Manifest data model
//!
//! Every field defaults when missing, so a document carrying only `name`
//! and `version` decodes. Wire keys follow the on-disk format: the package
//! type is `package`, the platform is `platform_id`, and a file's MD5 is
//! `md5sum`.

use crate::error::{Error, Result};
use crate::release;
use crate::verify::SourceDigests;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Default archive type for new manifests
pub const DEFAULT_PACKAGE_TYPE: &str = "tar.xz";

/// Default platform for new manifests
pub const DEFAULT_PLATFORM_ID: &str = "x86_64-gnu-linux-9";

/// Permission string recorded for every fetched file
pub const DEFAULT_FILE_MODE: &str = "0644";

/// A package manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
    pub version: String,

    /// Time-ordered release identifier
    pub release: String,

    pub description: String,
    pub summary: String,

    /// Archive type of the finished package (`tar.xz`, `tar.gz`, ...)
    #[serde(rename = "package")]
    pub package_type: String,

    /// Target platform, `<arch>-<rest>`
    #[serde(rename = "platform_id")]
    pub platform_id: String,

    pub provides: Vec<String>,
    pub requires: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommended: Vec<String>,

    pub sources: Vec<Source>,
    pub instructions: Vec<Instruction>,

    /// Artifacts recorded by the last fetch
    pub files: Vec<FileRecord>,
}

/// Caller-supplied values for [`Manifest::with_overrides`]
///
/// Empty strings and empty lists leave the generated default in place.
#[derive(Debug, Clone, Default)]
pub struct ManifestOverrides {
    pub release: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub package_type: Option<String>,
    pub platform_id: Option<String>,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
}

impl Manifest {
    /// Create a manifest with a fresh release and default metadata
    ///
    /// Description and summary are `"<Name> <version> <release>"`.
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let release = release::new_release()?;
        let description = format!("{} {} {}", title_case(name), version, release);

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            release,
            summary: description.clone(),
            description,
            package_type: DEFAULT_PACKAGE_TYPE.to_string(),
            platform_id: DEFAULT_PLATFORM_ID.to_string(),
            ..Default::default()
        })
    }

    /// Create a manifest and apply any non-empty overrides
    pub fn with_overrides(name: &str, version: &str, overrides: ManifestOverrides) -> Result<Self> {
        let mut manifest = Self::new(name, version)?;

        fn apply(field: &mut String, value: Option<String>) {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                *field = v;
            }
        }

        apply(&mut manifest.release, overrides.release);
        apply(&mut manifest.description, overrides.description);
        apply(&mut manifest.summary, overrides.summary);
        apply(&mut manifest.package_type, overrides.package_type);
        apply(&mut manifest.platform_id, overrides.platform_id);

        if !overrides.provides.is_empty() {
            manifest.provides = overrides.provides;
        }
        if !overrides.requires.is_empty() {
            manifest.requires = overrides.requires;
        }

        Ok(manifest)
    }

    /// Assign a fresh release if none is set
    ///
    /// Returns true if a release was generated.
    pub fn ensure_release(&mut self) -> Result<bool> {
        if !self.release.is_empty() {
            return Ok(false);
        }
        self.release = release::new_release()?;
        Ok(true)
    }

    /// Architecture part of the platform identifier, if any
    pub fn arch(&self) -> Option<&str> {
        self.platform_id.split('-').next().filter(|a| !a.is_empty())
    }

    /// `name-version-release.arch`, with `None` for a missing release or arch
    pub fn nvra(&self) -> String {
        let release = if self.release.is_empty() {
            "None"
        } else {
            &self.release
        };
        format!(
            "{}-{}-{}.{}",
            self.name,
            self.version,
            release,
            self.arch().unwrap_or("None")
        )
    }
}

/// Capitalize the first letter of every word, leaving the rest untouched
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// A source archive to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// URL or local path
    pub archive: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub destination: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub md5: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub ondisk: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub size: String,
}

impl Source {
    /// Create a source with no expected digests
    pub fn new(archive: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            ..Default::default()
        }
    }

    /// Describe a local archive, recording its digests and size
    pub fn from_local_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            Error::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let size = file.metadata()?.len();
        let digests = SourceDigests::compute_reader(&mut file)?;

        Ok(Self {
            archive: path.display().to_string(),
            sha256: digests.sha256.value,
            md5: digests.md5.value,
            size: size.to_string(),
            ..Default::default()
        })
    }

    /// Expected MD5, if one is declared
    pub fn expected_md5(&self) -> Option<&str> {
        Some(self.md5.trim()).filter(|s| !s.is_empty())
    }

    /// Expected SHA-256, if one is declared
    pub fn expected_sha256(&self) -> Option<&str> {
        Some(self.sha256.trim()).filter(|s| !s.is_empty())
    }
}

/// One build step; each field is an opaque shell fragment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instruction {
    pub unpack: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub pre: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub configure: String,

    pub build: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub test: String,

    pub install: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub post: String,
}

impl Instruction {
    /// Standard configure/make/install steps for an autotools tarball
    pub fn autotools(archive: &str, name: &str, version: &str) -> Self {
        Self {
            unpack: format!("tar -xvf {} && cd {}-{}", archive, name, version),
            configure: "./configure --prefix=/usr".to_string(),
            build: "make".to_string(),
            test: "make check".to_string(),
            install: "make install".to_string(),
            ..Default::default()
        }
    }

    /// Fields in script order: unpack, pre, configure, build, test, install, post
    pub fn steps(&self) -> [&str; 7] {
        [
            &self.unpack,
            &self.pre,
            &self.configure,
            &self.build,
            &self.test,
            &self.install,
            &self.post,
        ]
    }
}

/// A fetched and verified artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRecord {
    /// Absolute path on disk
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,

    /// Base file name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub mode: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub sha256: String,

    #[serde(rename = "md5sum", skip_serializing_if = "String::is_empty")]
    pub md5: String,
}

impl FileRecord {
    /// Record for a verified file at `path`
    pub fn new(path: &Path, digests: &SourceDigests) -> Self {
        Self {
            path: path.display().to_string(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mode: DEFAULT_FILE_MODE.to_string(),
            sha256: digests.sha256.value.clone(),
            md5: digests.md5.value.clone(),
        }
    }
}
