// src/commands/script.rs

//! Script command - render a manifest's build script

use super::{load_manifest, write_output};
use anyhow::{Context, Result};
use lpak::{to_build_script_with, ScriptConfig};

/// Render the build script for `manifest_path`
pub fn cmd_pkg_script(manifest_path: &str, config: &ScriptConfig, output: Option<&str>) -> Result<()> {
    let (manifest, _) = load_manifest(manifest_path)?;
    let script = to_build_script_with(&manifest, config)
        .with_context(|| format!("Failed to render build script for {}", manifest.name))?;
    write_output(output, script.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_written_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("foo.json");
        std::fs::write(
            &manifest_path,
            r#"{"name": "foo", "version": "1.0", "instructions": [{"unpack": "tar -xvf foo-1.0.tar.gz", "build": "make"}]}"#,
        )
        .unwrap();
        let out = dir.path().join("out").join("build.sh");
        let config = ScriptConfig {
            build_dir: "/tmp/build".to_string(),
            ..Default::default()
        };

        cmd_pkg_script(
            manifest_path.to_str().unwrap(),
            &config,
            Some(out.to_str().unwrap()),
        )
        .unwrap();

        let script = std::fs::read_to_string(&out).unwrap();
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("BUILDDIR=/tmp/build\nSRCDIR=/src\n"));
        assert!(script.contains("\ntar -xvf foo-1.0.tar.gz\n\n\nmake\n"));
    }

    #[test]
    fn test_script_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(cmd_pkg_script(missing.to_str().unwrap(), &ScriptConfig::default(), None).is_err());
    }
}
