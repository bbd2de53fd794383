// src/fetch/mod.rs

//! Source fetching
//!
//! For each source of a manifest, in declared order:
//! 1. Resolve the target path inside the destination directory
//! 2. Reuse an existing regular file unless `force` is set
//! 3. Otherwise download (HTTP/HTTPS) or copy (local path, `file://`)
//! 4. Verify the target against the declared digests
//! 5. Record a checksum line and a [`FileRecord`]
//!
//! Any failure aborts the whole fetch. Files already written stay on disk,
//! including one that failed verification.

mod client;

pub use client::{copy_local, HttpTransport, Transport};

use crate::error::{Error, Result};
use crate::manifest::{FileRecord, Manifest, Source};
use crate::verify::{verify_file, SourceDigests};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Fetcher settings
#[derive(Debug, Clone, Default)]
pub struct FetchConfig {
    /// Download even when the target file already exists
    pub force: bool,
    /// Show a progress bar per download
    pub progress: bool,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

/// `"<sha256> <path>"` lines, one per fetched source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumList(Vec<String>);

impl ChecksumList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for a verified file
    pub fn push(&mut self, sha256: &str, path: &Path) {
        self.0.push(format!("{} {}", sha256, path.display()));
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Renders in `sha256sum` format, every line newline-terminated
impl fmt::Display for ChecksumList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl IntoIterator for ChecksumList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Where a source archive comes from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Remote(String),
    Local(PathBuf),
}

impl Origin {
    fn parse(archive: &str) -> Result<Self> {
        match Url::parse(archive) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(archive.to_string())),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|_| Error::InvalidPath(format!("Invalid file URL: {}", archive))),
            _ => Ok(Self::Local(PathBuf::from(archive))),
        }
    }
}

/// Base file name of a source archive (last URL path segment or file name)
pub fn archive_file_name(archive: &str) -> Result<String> {
    let name = match Url::parse(archive) {
        Ok(url) if matches!(url.scheme(), "http" | "https" | "file") => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        _ => Path::new(archive)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
    };

    match name {
        Some(name) if !name.is_empty() && name != "." && name != ".." => Ok(name),
        _ => Err(Error::InvalidPath(format!(
            "Source archive has no file name: '{}'",
            archive
        ))),
    }
}

/// Fetches and verifies manifest sources into a directory
pub struct SourceFetcher<T: Transport = HttpTransport> {
    transport: T,
    config: FetchConfig,
}

impl SourceFetcher<HttpTransport> {
    /// Create a fetcher using the HTTP transport
    pub fn new(config: FetchConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: Transport> SourceFetcher<T> {
    /// Create a fetcher with a caller-supplied transport
    pub fn with_transport(transport: T, config: FetchConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch every source of `manifest` into `dest_dir`
    ///
    /// `manifest.files` is replaced with one record per source, so running
    /// twice yields the same result.
    pub fn fetch(&self, manifest: &mut Manifest, dest_dir: &Path) -> Result<ChecksumList> {
        fs::create_dir_all(dest_dir).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", dest_dir.display()))
        })?;
        let dest_dir = std::path::absolute(dest_dir).map_err(|e| {
            Error::InvalidPath(format!("Cannot resolve {}: {}", dest_dir.display(), e))
        })?;

        manifest.files.clear();
        let mut checksums = ChecksumList::new();

        for source in &manifest.sources {
            let (target, digests) = self.fetch_source(source, &dest_dir)?;
            checksums.push(digests.sha256.as_str(), &target);
            manifest.files.push(FileRecord::new(&target, &digests));
        }

        info!(
            "Fetched {} source(s) for {} into {}",
            checksums.len(),
            manifest.name,
            dest_dir.display()
        );
        Ok(checksums)
    }

    /// Fetch and verify a single source, returning its path and digests
    pub fn fetch_source(&self, source: &Source, dest_dir: &Path) -> Result<(PathBuf, SourceDigests)> {
        let file_name = archive_file_name(&source.archive)?;
        let target = dest_dir.join(&file_name);
        info!("Fetching {} -> {}", source.archive, target.display());

        if target.is_dir() {
            return Err(Error::InvalidPath(format!(
                "{} is a directory",
                target.display()
            )));
        }

        if !self.config.force && target.is_file() {
            debug!("Using cached source: {}", target.display());
        } else {
            match Origin::parse(&source.archive)? {
                Origin::Remote(url) => self.transport.download(&url, &target)?,
                Origin::Local(path) => copy_local(&path, &target)?,
            };
        }

        let digests = verify_file(&target, source.expected_md5(), source.expected_sha256())
            .map_err(|e| match e {
                Error::ChecksumMismatch {
                    algorithm,
                    path,
                    expected,
                    actual,
                    ..
                } => Error::ChecksumMismatch {
                    algorithm,
                    source_ref: source.archive.clone(),
                    path,
                    expected,
                    actual,
                },
                other => other,
            })
            .inspect_err(|e| {
                if e.is_checksum_mismatch() {
                    warn!("{}; leaving {} in place", e, target.display());
                }
            })?;

        debug!(
            "{}: sha256 {} md5 {}",
            file_name, digests.sha256, digests.md5
        );
        Ok((target, digests))
    }
}

/// Fetch all sources of `manifest` into `dest_dir` over HTTP
///
/// Returns one `"<sha256> <absolute path>"` line per source.
pub fn fetch_sources(manifest: &mut Manifest, dest_dir: &Path, force: bool) -> Result<ChecksumList> {
    let fetcher = SourceFetcher::new(FetchConfig {
        force,
        ..Default::default()
    })?;
    fetcher.fetch(manifest, dest_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;
    use std::cell::RefCell;

    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";

    /// Serves fixed content and records every requested URL
    struct FakeTransport {
        body: Vec<u8>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeTransport {
        fn new(body: &[u8]) -> Self {
            Self {
                body: body.to_vec(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for &FakeTransport {
        fn download(&self, url: &str, dest: &Path) -> Result<u64> {
            self.requests.borrow_mut().push(url.to_string());
            fs::write(dest, &self.body)?;
            Ok(self.body.len() as u64)
        }
    }

    fn manifest_with(archive: &str, sha256: &str) -> Manifest {
        let mut source = Source::new(archive);
        source.sha256 = sha256.to_string();
        source.md5 = HELLO_MD5.to_string();
        Manifest {
            name: "hello".to_string(),
            version: "1.0".to_string(),
            sources: vec![source],
            ..Default::default()
        }
    }

    #[test]
    fn test_archive_file_name() {
        assert_eq!(
            archive_file_name("https://example.com/pub/foo-1.0.tar.gz").unwrap(),
            "foo-1.0.tar.gz"
        );
        assert_eq!(
            archive_file_name("https://example.com/foo.tar.xz?mirror=1").unwrap(),
            "foo.tar.xz"
        );
        assert_eq!(archive_file_name("/tmp/src/bar.tgz").unwrap(), "bar.tgz");
        assert_eq!(archive_file_name("file:///tmp/baz.tar").unwrap(), "baz.tar");
        assert_eq!(archive_file_name("relative/qux.zip").unwrap(), "qux.zip");

        assert!(matches!(
            archive_file_name("https://example.com/"),
            Err(Error::InvalidPath(_))
        ));
        assert!(archive_file_name("").is_err());
    }

    #[test]
    fn test_origin_parse() {
        assert_eq!(
            Origin::parse("http://example.com/a.tar.gz").unwrap(),
            Origin::Remote("http://example.com/a.tar.gz".to_string())
        );
        assert_eq!(
            Origin::parse("file:///tmp/a.tar.gz").unwrap(),
            Origin::Local(PathBuf::from("/tmp/a.tar.gz"))
        );
        assert_eq!(
            Origin::parse("a.tar.gz").unwrap(),
            Origin::Local(PathBuf::from("a.tar.gz"))
        );
    }

    #[test]
    fn test_fetch_records_files_and_checksums() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new(b"hello world");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        let checksums = fetcher.fetch(&mut manifest, dir.path()).unwrap();

        let target = std::path::absolute(dir.path().join("hello-1.0.tar.gz")).unwrap();
        assert_eq!(
            checksums.lines(),
            &[format!("{} {}", HELLO_SHA256, target.display())]
        );
        assert_eq!(checksums.to_string(), format!("{} {}\n", HELLO_SHA256, target.display()));
        assert_eq!(manifest.files.len(), 1);
        assert_eq!(manifest.files[0].name, "hello-1.0.tar.gz");
        assert_eq!(manifest.files[0].mode, "0644");
        assert_eq!(manifest.files[0].md5, HELLO_MD5);
        assert_eq!(transport.requests.borrow().len(), 1);
    }

    #[test]
    fn test_cache_hit_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello-1.0.tar.gz"), b"hello world").unwrap();
        let transport = FakeTransport::new(b"never served");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        let checksums = fetcher.fetch(&mut manifest, dir.path()).unwrap();

        assert!(transport.requests.borrow().is_empty());
        assert_eq!(checksums.len(), 1);
        assert!(checksums.lines()[0].ends_with("hello-1.0.tar.gz"));
    }

    #[test]
    fn test_force_downloads_over_cache() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello-1.0.tar.gz"), b"stale").unwrap();
        let transport = FakeTransport::new(b"hello world");
        let config = FetchConfig {
            force: true,
            ..Default::default()
        };
        let fetcher = SourceFetcher::with_transport(&transport, config);
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        fetcher.fetch(&mut manifest, dir.path()).unwrap();
        assert_eq!(transport.requests.borrow().len(), 1);
    }

    #[test]
    fn test_mismatch_leaves_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new(b"hello world!");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        let err = fetcher.fetch(&mut manifest, dir.path()).unwrap_err();

        match &err {
            Error::ChecksumMismatch {
                algorithm,
                source_ref,
                path,
                ..
            } => {
                assert_eq!(*algorithm, HashAlgorithm::Sha256);
                assert_eq!(source_ref, "https://example.com/hello-1.0.tar.gz");
                assert!(path.ends_with("hello-1.0.tar.gz"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("https://example.com/hello-1.0.tar.gz"));
        assert!(dir.path().join("hello-1.0.tar.gz").is_file());
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_directory_at_target_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("hello-1.0.tar.gz")).unwrap();
        let transport = FakeTransport::new(b"hello world");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        let err = fetcher.fetch(&mut manifest, dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn test_refetch_resets_files() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::new(b"hello world");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with("https://example.com/hello-1.0.tar.gz", HELLO_SHA256);

        fetcher.fetch(&mut manifest, dir.path()).unwrap();
        let first = manifest.files.clone();
        fetcher.fetch(&mut manifest, dir.path()).unwrap();

        assert_eq!(manifest.files, first);
    }

    #[test]
    fn test_local_source_is_copied() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let archive = src_dir.path().join("hello-1.0.tar.gz");
        fs::write(&archive, b"hello world").unwrap();

        let transport = FakeTransport::new(b"");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = manifest_with(&archive.display().to_string(), HELLO_SHA256);

        fetcher.fetch(&mut manifest, dest_dir.path()).unwrap();

        assert!(transport.requests.borrow().is_empty());
        assert_eq!(
            fs::read(dest_dir.path().join("hello-1.0.tar.gz")).unwrap(),
            b"hello world"
        );
    }

    #[test]
    fn test_empty_manifest_creates_dest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b");
        let transport = FakeTransport::new(b"");
        let fetcher = SourceFetcher::with_transport(&transport, FetchConfig::default());
        let mut manifest = Manifest::default();

        let checksums = fetcher.fetch(&mut manifest, &dest).unwrap();
        assert!(checksums.is_empty());
        assert_eq!(checksums.to_string(), "");
        assert!(dest.is_dir());
    }
}
