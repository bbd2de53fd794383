// src/release.rs

//! Release identifiers
//!
//! A release is a ULID: a 26-character Crockford base32 string holding a
//! 48-bit millisecond timestamp followed by 80 random bits. The encoding
//! sorts lexicographically in the same order as the underlying value, so a
//! later release always compares greater than an earlier one, independent
//! of the package version string.
//!
//! Within one millisecond the generator increments the previous random
//! part instead of drawing a fresh one, keeping successive identifiers
//! strictly increasing even under rapid calls.

use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex};
use std::time::SystemTime;
use ulid::{Generator, Ulid};

/// Encoded length of a release identifier
pub const RELEASE_LEN: usize = 26;

/// Process-wide generator state shared by [`Release::generate`]
static GENERATOR: LazyLock<Mutex<ReleaseGenerator<OsRng>>> =
    LazyLock::new(|| Mutex::new(ReleaseGenerator::new(OsRng)));

/// A parsed release identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Release(Ulid);

impl Release {
    /// Generate a fresh release from the current time and the OS random source
    pub fn generate() -> Result<Self> {
        let mut generator = GENERATOR.lock().unwrap_or_else(|e| e.into_inner());
        generator.next()
    }

    /// Parse a 26-character release string (case-insensitive)
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != RELEASE_LEN {
            return Err(Error::ReleaseError(format!(
                "invalid release '{}': expected {} characters, got {}",
                s,
                RELEASE_LEN,
                s.len()
            )));
        }
        // 26 * 5 = 130 bits, so the leading character may only carry 3 bits
        if !matches!(s.as_bytes()[0], b'0'..=b'7') {
            return Err(Error::ReleaseError(format!("release '{}' overflows 128 bits", s)));
        }
        Ulid::from_string(s)
            .map(Self)
            .map_err(|e| Error::ReleaseError(format!("invalid release '{}': {}", s, e)))
    }

    /// Millisecond timestamp component
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }

    /// Random component
    pub fn random(&self) -> u128 {
        self.0.random()
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Release {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Random source adapter that remembers the first failure of `try_fill_bytes`
///
/// The ULID generator only draws through the infallible `Rng` interface, so
/// failures are recorded here and reported after generation.
struct CheckedRng<'a, R> {
    inner: &'a mut R,
    failure: Option<rand::Error>,
}

impl<R: RngCore> RngCore for CheckedRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.inner.try_fill_bytes(dest) {
            dest.fill(0);
            self.failure.get_or_insert(e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Monotonic release generator over a random source
pub struct ReleaseGenerator<R> {
    rng: R,
    ulids: Generator,
}

impl<R: RngCore> ReleaseGenerator<R> {
    /// Create a generator drawing random bits from `rng`
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            ulids: Generator::new(),
        }
    }

    /// Produce the next release for the current wall-clock time
    pub fn next(&mut self) -> Result<Release> {
        self.next_at(SystemTime::now())
    }

    /// Produce the next release for the given time
    ///
    /// If `now` is not later than the previous release (same millisecond,
    /// or the clock moved backwards) the previous value is incremented.
    pub fn next_at(&mut self, now: SystemTime) -> Result<Release> {
        let mut source = CheckedRng {
            inner: &mut self.rng,
            failure: None,
        };
        let generated = self.ulids.generate_from_datetime_with_source(now, &mut source);

        if let Some(e) = source.failure {
            return Err(Error::ReleaseError(format!("random source failed: {}", e)));
        }
        generated
            .map(Release)
            .map_err(|e| Error::ReleaseError(format!("cannot generate release: {}", e)))
    }
}

/// Generate a new release identifier as a string
pub fn new_release() -> Result<String> {
    Release::generate().map(|r| r.to_string())
}

/// Compare two release strings
///
/// Both must parse as release identifiers; version strings play no part.
pub fn compare_releases(a: &str, b: &str) -> Result<Ordering> {
    Ok(Release::parse(a)?.cmp(&Release::parse(b)?))
}
