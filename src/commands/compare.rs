// src/commands/compare.rs

//! Compare command - order two manifests by release

use super::load_manifest;
use anyhow::{Context, Result};
use lpak::compare_releases;
use std::cmp::Ordering;

/// Print how the releases of two manifests order
///
/// Only the release identifiers are compared; versions are ignored.
pub fn cmd_pkg_compare(first: &str, second: &str) -> Result<Ordering> {
    let (a, _) = load_manifest(first)?;
    let (b, _) = load_manifest(second)?;

    let ordering = compare_releases(&a.release, &b.release)
        .with_context(|| format!("Cannot compare releases of {} and {}", first, second))?;

    let relation = match ordering {
        Ordering::Less => "older than",
        Ordering::Equal => "the same release as",
        Ordering::Greater => "newer than",
    };
    println!("{} is {} {}", a.nvra(), relation, b.nvra());
    Ok(ordering)
}
