// src/commands/create.rs

//! Create command - start a new manifest

use super::write_output;
use anyhow::{Context, Result};
use lpak::manifest::{self, ManifestFormat};
use lpak::{Instruction, Manifest, ManifestOverrides, Source};
use std::path::Path;
use tracing::info;

/// Create a manifest and print or write it
///
/// Each archive is checksummed and paired with a default autotools
/// instruction.
pub fn cmd_pkg_create(
    name: &str,
    version: &str,
    overrides: ManifestOverrides,
    archives: &[String],
    format: ManifestFormat,
    output: Option<&str>,
) -> Result<()> {
    let mut manifest = Manifest::with_overrides(name, version, overrides)
        .with_context(|| format!("Failed to create manifest for {}", name))?;

    for archive in archives {
        let source = Source::from_local_file(Path::new(archive))
            .with_context(|| format!("Failed to checksum {}", archive))?;
        info!("Added source {} (sha256 {})", archive, source.sha256);
        manifest.sources.push(source);
        manifest
            .instructions
            .push(Instruction::autotools(archive, name, version));
    }

    let content = manifest::encode(&manifest, format)?;
    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_with_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("foo-1.0.tar.gz");
        std::fs::write(&archive, b"hello world").unwrap();
        let out = dir.path().join("foo.yaml");

        cmd_pkg_create(
            "foo",
            "1.0",
            ManifestOverrides::default(),
            &[archive.display().to_string()],
            ManifestFormat::Yaml,
            Some(out.to_str().unwrap()),
        )
        .unwrap();

        let manifest = manifest::decode_file(&out).unwrap();
        assert_eq!(manifest.name, "foo");
        assert_eq!(manifest.release.len(), 26);
        assert_eq!(manifest.sources.len(), 1);
        assert_eq!(manifest.sources[0].md5, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(
            manifest.instructions[0].unpack,
            format!("tar -xvf {} && cd foo-1.0", archive.display())
        );
    }

    #[test]
    fn test_create_missing_archive() {
        let result = cmd_pkg_create(
            "foo",
            "1.0",
            ManifestOverrides::default(),
            &["/nonexistent/foo.tar.gz".to_string()],
            ManifestFormat::Json,
            None,
        );
        assert!(result.is_err());
    }
}
