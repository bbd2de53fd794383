// src/commands/build.rs

//! Build command - fetch sources and stage a build directory
//!
//! For every manifest this produces `<buildroot>/<nvra>/` containing:
//! - `build.sh`: the generated build script
//! - `SHA256SUMS`: checksums of the fetched sources
//! - `manifest.yaml`: the manifest with its release and file records

use super::load_manifest;
use anyhow::{Context, Result};
use lpak::manifest::{self, ManifestFormat};
use lpak::{to_build_script_with, FetchConfig, ScriptConfig, SourceFetcher};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Fetch and stage each manifest, returning the build directories created
pub fn cmd_pkg_build(
    manifests: &[String],
    buildroot: &str,
    sourcedir: &str,
    config: FetchConfig,
) -> Result<Vec<PathBuf>> {
    println!("BUILDROOT : {}\nSOURCEDIR : {}", buildroot, sourcedir);
    if config.force {
        println!("Force Enabled");
    }

    let fetcher = SourceFetcher::new(config)?;
    let script_config = ScriptConfig {
        src_dir: sourcedir.to_string(),
        ..Default::default()
    };
    let mut staged = Vec::with_capacity(manifests.len());

    for path in manifests {
        let (mut manifest, _) = load_manifest(path)?;
        manifest.ensure_release()?;
        let nvra = manifest.nvra();
        println!("NVRA : {}", nvra);

        let checksums = fetcher
            .fetch(&mut manifest, Path::new(sourcedir))
            .with_context(|| format!("Failed to fetch sources for {}", nvra))?;
        print!("{}", checksums);

        let build_dir = Path::new(buildroot).join(&nvra);
        fs::create_dir_all(&build_dir)
            .with_context(|| format!("Failed to create {}", build_dir.display()))?;

        let script = to_build_script_with(&manifest, &script_config)?;
        let script_path = build_dir.join("build.sh");
        fs::write(&script_path, script)
            .with_context(|| format!("Failed to write {}", script_path.display()))?;
        make_executable(&script_path)?;

        fs::write(build_dir.join("SHA256SUMS"), checksums.to_string())?;
        fs::write(
            build_dir.join("manifest.yaml"),
            manifest::encode(&manifest, ManifestFormat::Yaml)?,
        )?;

        info!("Staged {} in {}", nvra, build_dir.display());
        println!("Build directory : {}", build_dir.display());
        staged.push(build_dir);
    }

    Ok(staged)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_stages_local_sources() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("foo-1.0.tar.gz");
        fs::write(&archive, b"hello world").unwrap();

        let manifest_path = dir.path().join("foo.yaml");
        fs::write(
            &manifest_path,
            format!(
                "name: foo\nversion: '1.0'\nplatform_id: x86_64-gnu-linux-9\nsources:\n  - archive: {}\n    md5: 5eb63bbbe01eeed093cb22bb8f5acdc3\ninstructions:\n  - unpack: tar -xvf foo-1.0.tar.gz\n    build: make\n    install: make install\n",
                archive.display()
            ),
        )
        .unwrap();

        let buildroot = dir.path().join("build");
        let sourcedir = dir.path().join("src");
        let staged = cmd_pkg_build(
            &[manifest_path.display().to_string()],
            buildroot.to_str().unwrap(),
            sourcedir.to_str().unwrap(),
            FetchConfig::default(),
        )
        .unwrap();

        let build_dir = &staged[0];
        let name = build_dir.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("foo-1.0-") && name.ends_with(".x86_64"));

        let script = fs::read_to_string(build_dir.join("build.sh")).unwrap();
        assert!(script.contains(&format!("SRCDIR={}", sourcedir.display())));
        assert!(script.contains("\nmake install\n"));

        let sums = fs::read_to_string(build_dir.join("SHA256SUMS")).unwrap();
        assert!(sums.ends_with("foo-1.0.tar.gz\n"));

        let staged_manifest = manifest::decode_file(&build_dir.join("manifest.yaml")).unwrap();
        assert_eq!(staged_manifest.files.len(), 1);
        assert_eq!(staged_manifest.release.len(), 26);
    }
}
