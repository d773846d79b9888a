//! Variable loading from the `.dotweave/variables/` directory structure

use crate::{Error, Result};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the metadata directory inside the source directory
pub const METADATA_DIR: &str = ".dotweave";

/// Load variables from `<source>/.dotweave/variables/`
///
/// Loading order:
/// 1. All `*.toml` in `variables/` (all platforms)
/// 2. All `*.toml` in `variables/{platform}/` (overrides same keys)
///
/// Each file's table is nested under the file stem, so `git.toml` containing
/// `email = "..."` is available as `git.email`.
///
/// # Errors
///
/// Returns an error if a variables file cannot be read or is not valid TOML.
pub fn load_variables(source_dir: &Path, platform: &str) -> Result<IndexMap<String, JsonValue>> {
    let mut variables = IndexMap::new();

    let variables_dir = source_dir.join(METADATA_DIR).join("variables");
    if !variables_dir.is_dir() {
        return Ok(variables);
    }

    for dir in [variables_dir.clone(), variables_dir.join(platform)] {
        for (file_stem, vars) in load_dir(&dir)? {
            let wrapped = IndexMap::from([(file_stem, JsonValue::Object(vars.into_iter().collect()))]);
            merge_variables(&mut variables, wrapped);
        }
    }

    Ok(variables)
}

/// Load every TOML file directly inside `dir`, in file-name order
fn load_dir(dir: &Path) -> Result<Vec<(String, IndexMap<String, JsonValue>)>> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(Vec::new());
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    // Parse in parallel, keep deterministic order for merging
    let loaded: Vec<_> = paths
        .par_iter()
        .map(|path| load_variable_file(path))
        .collect::<Result<Vec<_>>>()?;

    Ok(loaded.into_iter().flatten().collect())
}

/// Load a single variable file (TOML only)
///
/// Returns the file stem and the loaded table, or `None` for non-TOML files.
fn load_variable_file(path: &Path) -> Result<Option<(String, IndexMap<String, JsonValue>)>> {
    if path.extension().and_then(|s| s.to_str()) != Some("toml") {
        return Ok(None);
    }

    let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return Ok(None);
    };

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Message(format!("Failed to read {}: {e}", path.display())))?;

    let table: IndexMap<String, JsonValue> = toml::from_str(&content).map_err(|e| {
        Error::Message(format!("Failed to parse TOML from {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), keys = table.len(), "Loaded variables file");
    Ok(Some((file_stem.to_string(), table)))
}

/// Deep merge two variable maps (overlay wins on conflicts)
pub fn merge_variables(base: &mut IndexMap<String, JsonValue>, overlay: IndexMap<String, JsonValue>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(JsonValue::Object(base_obj)), JsonValue::Object(overlay_obj)) => {
                let mut base_map: IndexMap<String, JsonValue> =
                    std::mem::take(base_obj).into_iter().collect();
                merge_variables(&mut base_map, overlay_obj.into_iter().collect());
                *base_obj = base_map.into_iter().collect();
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
