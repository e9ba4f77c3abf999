//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KastConfig;
use crate::error::KastError;
use crate::result::Result;

/// File names searched in every directory, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["kast.toml", ".kastrc.json"];

/// Finds and reads configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Search `start_path` and its ancestors for a configuration file
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let start = start_path.canonicalize().map_err(|e| {
            KastError::config_error(format!("Invalid path '{}': {e}", start_path.display()))
        })?;

        for directory in start.ancestors() {
            for file_name in CONFIG_FILE_NAMES {
                let candidate = directory.join(file_name);
                if candidate.is_file() {
                    debug!("Found config: {}", candidate.display());
                    return Ok(Some(candidate));
                }
            }
        }
        Ok(None)
    }

    /// Read a `.toml` or `.json` configuration file
    pub fn load_from_file(path: &Path) -> Result<KastConfig> {
        let content = fs::read_to_string(path).map_err(|e| KastError::io_error(path, e))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => Err("unsupported file extension (expected .toml or .json)".to_string()),
        };
        parsed.map_err(|message| {
            KastError::config_error(format!(
                "Failed to load config from '{}': {message}",
                path.display()
            ))
        })
    }

    /// Load `custom_path`, or the file discovered from `start_dir`
    ///
    /// Without an explicit path and with no file found, the defaults apply.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<KastConfig> {
        if let Some(path) = custom_path {
            if !path.is_file() {
                return Err(KastError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(KastConfig::default())
            }
        }
    }
}
