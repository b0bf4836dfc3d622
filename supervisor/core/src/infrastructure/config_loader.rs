// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Component Config Loader
//
// Reads one `ComponentConfig` per file from the components directory.
// JSON (`.json`) and YAML (`.yaml`, `.yml`) are accepted. A broken file only
// costs its own component: it is logged and skipped. Duplicate names keep the
// first file in directory order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::component::ComponentConfig;
use crate::domain::errors::ConfigError;

/// Outcome of scanning a components directory.
#[derive(Debug, Default)]
pub struct LoadedConfigs {
    pub configs: Vec<ComponentConfig>,
    pub rejected: Vec<ConfigError>,
}

/// Parse a single component config file.
pub fn load_component_config(path: &Path) -> Result<ComponentConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: ComponentConfig = match extension(path).as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        }
        _ => {
            return Err(ConfigError::Parse {
                path: path.to_path_buf(),
                reason: "unsupported file extension".to_string(),
            })
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load every component config in `dir`, sorted by file name.
///
/// Fails only when the directory itself cannot be read.
pub fn load_component_configs(dir: &Path) -> Result<LoadedConfigs, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| matches!(extension(path).as_deref(), Some("json" | "yaml" | "yml")))
        .collect();
    paths.sort();

    let mut loaded = LoadedConfigs::default();
    let mut seen = HashSet::new();

    for path in paths {
        match load_component_config(&path) {
            Ok(config) => {
                if !seen.insert(config.name.clone()) {
                    warn!("Skipping {:?}: component '{}' is already defined", path, config.name);
                    loaded.rejected.push(ConfigError::Duplicate {
                        name: config.name,
                        path,
                    });
                    continue;
                }
                debug!("Loaded component config '{}' from {:?}", config.name, path);
                loaded.configs.push(config);
            }
            Err(e) => {
                warn!("Skipping component config: {}", e);
                loaded.rejected.push(e);
            }
        }
    }

    info!(
        "Loaded {} component config(s) from {:?} ({} rejected)",
        loaded.configs.len(),
        dir,
        loaded.rejected.len()
    );

    Ok(loaded)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
