// src/script.rs

//! Build script generation
//!
//! Renders a POSIX shell script from a manifest's instructions. The preamble
//! pins the locale, `PATH`, and `umask`, and defines the four working
//! directories. Each instruction follows as a blank line and then its seven
//! steps, one per line; an empty step renders as an empty line.
//!
//! The preamble uses `%(name)s` placeholders filled from an explicit
//! variable table. Instruction text is emitted verbatim.

use crate::error::{Error, Result};
use crate::manifest::Manifest;
use std::collections::BTreeMap;

const PREAMBLE: &str = r#"#!/bin/sh
set -e
set -x
umask 022
LANG=C
LC_ALL=POSIX
PATH=/tools/bin:/bin:/usr/bin
export LANG LC_ALL PATH
PKG_CONFIG_PATH="${PKG_CONFIG_PATH}:/usr/lib64/pkgconfig:/usr/share/pkgconfig"
export PKG_CONFIG_PATH
BUILDDIR=%(builddir)s
SRCDIR=%(srcdir)s
DESTDIR=%(destdir)s
PKGDIR=%(pkgdir)s
export BUILDDIR SRCDIR DESTDIR PKGDIR
mkdir -vp "$BUILDDIR" "$SRCDIR" "$DESTDIR" "$PKGDIR"
"#;

/// Directory layout baked into the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    pub build_dir: String,
    pub src_dir: String,
    pub dest_dir: String,
    pub pkg_dir: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            build_dir: "/build".to_string(),
            src_dir: "/src".to_string(),
            dest_dir: "/install".to_string(),
            pkg_dir: "/package".to_string(),
        }
    }
}

impl ScriptConfig {
    /// Template variables for this layout
    pub fn variables(&self) -> BTreeMap<&'static str, &str> {
        BTreeMap::from([
            ("builddir", self.build_dir.as_str()),
            ("srcdir", self.src_dir.as_str()),
            ("destdir", self.dest_dir.as_str()),
            ("pkgdir", self.pkg_dir.as_str()),
        ])
    }
}

/// Render the build script with the default directory layout
pub fn to_build_script(manifest: &Manifest) -> Result<String> {
    to_build_script_with(manifest, &ScriptConfig::default())
}

/// Render the build script with a custom directory layout
pub fn to_build_script_with(manifest: &Manifest, config: &ScriptConfig) -> Result<String> {
    let mut script = substitute(PREAMBLE, &config.variables())?;

    for instruction in &manifest.instructions {
        script.push('\n');
        for step in instruction.steps() {
            script.push_str(step);
            script.push('\n');
        }
    }
    script.push('\n');

    Ok(script)
}

/// Replace every `%(name)s` in `template` with its value
///
/// A placeholder with no entry in `variables` is an error.
pub fn substitute(template: &str, variables: &BTreeMap<&'static str, &str>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%(") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find(")s")
            .ok_or_else(|| Error::MissingVariable(format!("unterminated placeholder in '{}'", &rest[start..])))?;
        let name = &after[..end];
        let value = variables
            .get(name)
            .ok_or_else(|| Error::MissingVariable(name.to_string()))?;
        out.push_str(value);
        rest = &after[end + 2..];
    }
    out.push_str(rest);

    Ok(out)
}
