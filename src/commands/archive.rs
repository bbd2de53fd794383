// src/commands/archive.rs

//! Archive command - package a directory tree

use anyhow::{anyhow, Context, Result};
use lpak::compression::{compress, ArchiveFormat};
use lpak::{HashAlgorithm, Hasher};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Archive output: the file on disk and a running digest of it
enum Sink {
    File(File),
    Digest(Hasher),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.write(buf),
            Self::Digest(h) => h.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::File(f) => f.flush(),
            Self::Digest(h) => h.flush(),
        }
    }
}

/// Archive `source_dir` into `output`, printing the archive's SHA-256
///
/// Returns the lowercase hex digest.
pub fn cmd_pkg_archive(
    source_dir: &str,
    output: &str,
    package_type: &str,
    excludes: &[String],
) -> Result<String> {
    let format = ArchiveFormat::from_package_type(package_type)
        .ok_or_else(|| anyhow!("Unsupported package type: {}", package_type))?;

    let output_path = Path::new(output);
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    let sinks = vec![Sink::File(file), Sink::Digest(Hasher::new(HashAlgorithm::Sha256))];
    let sinks = compress(Path::new(source_dir), excludes, format, sinks)
        .with_context(|| format!("Failed to archive {}", source_dir))?;

    let mut sha256 = None;
    for sink in sinks {
        match sink {
            Sink::File(f) => f.sync_all()?,
            Sink::Digest(h) => sha256 = Some(h.finalize().value),
        }
    }
    let sha256 = sha256.ok_or_else(|| anyhow!("archive digest missing"))?;

    println!("{} {}", sha256, output_path.display());
    Ok(sha256)
}
