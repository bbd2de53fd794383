// src/commands/fetch.rs

//! Fetch command - download and verify manifest sources

use super::{load_manifest, write_output};
use anyhow::{bail, Context, Result};
use lpak::manifest;
use lpak::{FetchConfig, SourceFetcher};
use std::path::Path;

/// Fetch the sources of each manifest into `sourcedir`
///
/// With `output`, the manifest (now carrying file records) is written back
/// in its original format; this needs exactly one manifest.
pub fn cmd_pkg_fetch(
    manifests: &[String],
    sourcedir: &str,
    config: FetchConfig,
    output: Option<&str>,
) -> Result<()> {
    if output.is_some() && manifests.len() != 1 {
        bail!("--output needs exactly one manifest, got {}", manifests.len());
    }

    println!("SOURCEDIR : {}", sourcedir);
    if config.force {
        println!("Force Enabled");
    }

    let fetcher = SourceFetcher::new(config)?;

    for path in manifests {
        let (mut manifest, format) = load_manifest(path)?;
        manifest.ensure_release()?;

        println!("Name : {}", manifest.name);
        println!("Version : {}", manifest.version);
        println!("Release : {}", manifest.release);
        println!("Downloading to {}", sourcedir);

        let checksums = fetcher
            .fetch(&mut manifest, Path::new(sourcedir))
            .with_context(|| format!("Failed to fetch sources for {}", path))?;

        println!("Fetch complete");
        print!("{}", checksums);

        if output.is_some() {
            write_output(output, &manifest::encode(&manifest, format)?)?;
        }
    }

    Ok(())
}
