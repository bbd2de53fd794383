// src/compression/mod.rs
//! Package archive creation
//!
//! Walks a directory tree and writes its regular files into a tar stream,
//! compressed according to the manifest's package type. The finished
//! stream is copied to every supplied writer, so one pass can produce a
//! file on disk and a digest at the same time.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Archive formats a package can be written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveFormat {
    /// Uncompressed tar (.tar)
    Tar,
    /// Gzip compressed tar (.tar.gz)
    TarGz,
    /// XZ compressed tar (.tar.xz)
    #[default]
    TarXz,
    /// Zstandard compressed tar (.tar.zst)
    TarZst,
}

impl ArchiveFormat {
    /// Map a manifest package type to an archive format
    ///
    /// # Examples
    /// ```
    /// use lpak::compression::ArchiveFormat;
    ///
    /// assert_eq!(ArchiveFormat::from_package_type("tar.xz"), Some(ArchiveFormat::TarXz));
    /// assert_eq!(ArchiveFormat::from_package_type("tgz"), Some(ArchiveFormat::TarGz));
    /// assert_eq!(ArchiveFormat::from_package_type("rpm"), None);
    /// ```
    pub fn from_package_type(package_type: &str) -> Option<Self> {
        match package_type.trim().to_lowercase().as_str() {
            "tar" => Some(Self::Tar),
            "tar.gz" | "tgz" => Some(Self::TarGz),
            "" | "tar.xz" | "txz" => Some(Self::TarXz),
            "tar.zst" | "tar.zstd" | "tzst" => Some(Self::TarZst),
            _ => None,
        }
    }

    /// File extension including the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Tar => ".tar",
            Self::TarGz => ".tar.gz",
            Self::TarXz => ".tar.xz",
            Self::TarZst => ".tar.zst",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar+gzip",
            Self::TarXz => "tar+xz",
            Self::TarZst => "tar+zstd",
        }
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Writer that duplicates everything to several sinks
pub struct TeeWriter<W> {
    writers: Vec<W>,
}

impl<W: Write> TeeWriter<W> {
    pub fn new(writers: Vec<W>) -> Self {
        Self { writers }
    }

    pub fn into_inner(self) -> Vec<W> {
        self.writers
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for writer in &mut self.writers {
            writer.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for writer in &mut self.writers {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Compressing writer for an archive format
pub enum Encoder<W: Write> {
    None(W),
    Gzip(flate2::write::GzEncoder<W>),
    Xz(xz2::write::XzEncoder<W>),
    Zstd(zstd::Encoder<'static, W>),
}

impl<W: Write> Encoder<W> {
    /// Wrap `writer` in the compressor for `format`
    pub fn new(writer: W, format: ArchiveFormat) -> io::Result<Self> {
        Ok(match format {
            ArchiveFormat::Tar => Self::None(writer),
            ArchiveFormat::TarGz => Self::Gzip(flate2::write::GzEncoder::new(
                writer,
                flate2::Compression::default(),
            )),
            ArchiveFormat::TarXz => Self::Xz(xz2::write::XzEncoder::new(writer, 6)),
            ArchiveFormat::TarZst => Self::Zstd(zstd::Encoder::new(writer, 0)?),
        })
    }

    /// Flush the compressed trailer and return the inner writer
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::None(w) => Ok(w),
            Self::Gzip(e) => e.finish(),
            Self::Xz(e) => e.finish(),
            Self::Zstd(e) => e.finish(),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::None(w) => w.write(buf),
            Self::Gzip(e) => e.write(buf),
            Self::Xz(e) => e.write(buf),
            Self::Zstd(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::None(w) => w.flush(),
            Self::Gzip(e) => e.flush(),
            Self::Xz(e) => e.flush(),
            Self::Zstd(e) => e.flush(),
        }
    }
}

/// Archive the regular files under `source_dir` into every writer
///
/// Entries are named relative to `source_dir`. Anything whose base name is
/// listed in `excludes` is skipped. Only the matching entry is skipped, so
/// files under an excluded directory are still archived unless their own
/// names are excluded. Symlinks and other non-regular files are left out.
/// Returns the writers once the stream is complete.
pub fn compress<W: Write>(
    source_dir: &Path,
    excludes: &[String],
    format: ArchiveFormat,
    writers: Vec<W>,
) -> Result<Vec<W>> {
    info!("Creating {} archive of {}", format, source_dir.display());

    if !source_dir.is_dir() {
        return Err(Error::ArchiveError(format!(
            "unable to archive {}: not a directory",
            source_dir.display()
        )));
    }

    let encoder = Encoder::new(TeeWriter::new(writers), format)
        .map_err(|e| Error::ArchiveError(format!("Failed to create {} encoder: {}", format, e)))?;
    let mut builder = tar::Builder::new(encoder);

    let walker = WalkDir::new(source_dir).sort_by_file_name().into_iter();

    let mut count = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| Error::ArchiveError(format!("Failed to walk directory: {}", e)))?;
        if entry.depth() > 0
            && excludes
                .iter()
                .any(|x| entry.file_name().to_str() == Some(x.as_str()))
        {
            debug!("Skipping excluded {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.path().strip_prefix(source_dir).map_err(|e| {
            Error::ArchiveError(format!("{}: {}", entry.path().display(), e))
        })?;
        let mut file = File::open(entry.path()).map_err(|e| {
            Error::IoError(format!("Failed to open {}: {}", entry.path().display(), e))
        })?;
        builder.append_file(name, &mut file).map_err(|e| {
            Error::ArchiveError(format!("Failed to add {}: {}", name.display(), e))
        })?;
        count += 1;
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| Error::ArchiveError(format!("Failed to finish tar stream: {}", e)))?;
    let mut tee = encoder
        .finish()
        .map_err(|e| Error::ArchiveError(format!("Failed to finish {} stream: {}", format, e)))?;
    tee.flush()?;

    debug!("Archived {} file(s)", count);
    Ok(tee.into_inner())
}
