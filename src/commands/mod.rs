// src/commands/mod.rs
//! Command handlers for the lpak CLI

mod archive;
mod build;
mod compare;
mod convert;
mod create;
mod fetch;
mod script;

pub use archive::cmd_pkg_archive;
pub use build::cmd_pkg_build;
pub use compare::cmd_pkg_compare;
pub use convert::cmd_pkg_convert;
pub use create::cmd_pkg_create;
pub use fetch::cmd_pkg_fetch;
pub use script::cmd_pkg_script;

use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use lpak::manifest::{self, ManifestFormat};
use lpak::Manifest;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Read a manifest file, returning it along with its detected format
pub(crate) fn load_manifest(path: &str) -> Result<(Manifest, ManifestFormat)> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read manifest: {}", path))?;
    let format = ManifestFormat::detect(&content);
    let manifest = manifest::decode_as(&content, format)
        .with_context(|| format!("Failed to parse manifest: {}", path))?;
    Ok((manifest, format))
}

/// Write bytes to a file, or to stdout when no path is given
pub(crate) fn write_output(output: Option<&str>, content: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content)?;
            if !content.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Print shell completions for the lpak CLI
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "lpak", &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_manifest_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("foo.json");
        fs::write(&json, r#"{"name": "foo", "version": "1.0"}"#).unwrap();
        let yaml = dir.path().join("foo.yaml");
        fs::write(&yaml, "name: foo\nversion: '1.0'\n").unwrap();

        let (a, fa) = load_manifest(json.to_str().unwrap()).unwrap();
        let (b, fb) = load_manifest(yaml.to_str().unwrap()).unwrap();
        assert_eq!(fa, ManifestFormat::Json);
        assert_eq!(fb, ManifestFormat::Yaml);
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_manifest_error_names_path() {
        let err = load_manifest("/nonexistent/foo.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/foo.yaml"));
    }

    #[test]
    fn test_write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("foo.yaml");
        write_output(Some(path.to_str().unwrap()), b"name: foo\n").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"name: foo\n");
    }
}
