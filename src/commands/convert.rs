// src/commands/convert.rs

//! Convert command - re-encode a manifest

use super::{load_manifest, write_output};
use anyhow::Result;
use lpak::manifest::{self, ManifestFormat};
use tracing::debug;

/// Decode `manifest_path` and encode it again as `format`
pub fn cmd_pkg_convert(
    manifest_path: &str,
    format: ManifestFormat,
    pretty: bool,
    output: Option<&str>,
) -> Result<()> {
    let (manifest, detected) = load_manifest(manifest_path)?;
    debug!("Converting {} from {} to {}", manifest_path, detected, format);

    let content = if pretty {
        manifest::encode_pretty(&manifest, format)?
    } else {
        manifest::encode(&manifest, format)?
    };
    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_yaml_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("foo.yaml");
        std::fs::write(&input, "name: foo\nversion: '1.0'\nrequires: [bar]\n").unwrap();
        let out = dir.path().join("foo.json");

        cmd_pkg_convert(
            input.to_str().unwrap(),
            ManifestFormat::Json,
            true,
            Some(out.to_str().unwrap()),
        )
        .unwrap();

        let content = std::fs::read(&out).unwrap();
        assert!(manifest::is_json_format(&content));
        let converted = manifest::decode(&content).unwrap();
        assert_eq!(converted, manifest::decode_file(&input).unwrap());
    }
}
