//! Framework package name resolution from `package.json`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: String,
}

/// Reads the `name` field from a `package.json` file.
pub fn package_name(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: PackageManifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(manifest.name)
}

/// Resolves the framework package name.
///
/// An explicit `--package-name` wins. Otherwise the manifest next to the
/// analyzed folder is consulted, then one in the current directory.
pub fn resolve(
    explicit: Option<&str>,
    manifest: Option<&Path>,
    folder: &Path,
) -> Result<String> {
    if let Some(name) = explicit {
        return Ok(name.to_owned());
    }
    if let Some(path) = manifest {
        return package_name(path);
    }

    for candidate in [
        folder.join("package.json"),
        folder.join("..").join("package.json"),
        Path::new("package.json").to_path_buf(),
    ] {
        if candidate.is_file() {
            tracing::debug!("Using manifest at {}", candidate.display());
            return package_name(&candidate);
        }
    }

    anyhow::bail!(
        "No package.json found near {}; pass --package-name or --manifest",
        folder.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, r#"{ "name": "lokum", "version": "1.0.0" }"#).unwrap();
        assert_eq!(package_name(&path).unwrap(), "lokum");
    }

    #[test]
    fn explicit_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        let name = resolve(Some("custom"), None, dir.path()).unwrap();
        assert_eq!(name, "custom");
    }

    #[test]
    fn falls_back_to_folder_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), r#"{ "name": "fw" }"#).unwrap();
        assert_eq!(resolve(None, None, dir.path()).unwrap(), "fw");
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve(None, None, dir.path()).is_err());
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(package_name(&path).is_err());
    }
}
