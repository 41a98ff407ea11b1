//! Configuration loading and discovery for `hqscale.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::HqConfig;
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery.
pub const CONFIG_FILE: &str = "hqscale.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse hqscale.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub luma_threshold: Option<u16>,
    pub chroma_u_threshold: Option<u16>,
    pub chroma_v_threshold: Option<u16>,
    /// Force sequential (`Some(false)`) or parallel filtering
    pub parallel: Option<bool>,
    /// Override output directory
    pub out_dir: Option<PathBuf>,
}

/// Find hqscale.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for hqscale.toml
/// 2. Check XDG_CONFIG_HOME/hqscale/hqscale.toml (or ~/.config/hqscale/hqscale.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find hqscale.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("hqscale").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find hqscale.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            debug!("found config at {}", config_path.display());
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an explicit path, or from the discovered
/// hqscale.toml, or fall back to defaults when there is none.
///
/// Relative `output.dir` values are resolved against the directory holding
/// the config file.
pub fn load_config(path: Option<&Path>) -> Result<HqConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(default_config())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<HqConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: HqConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let (Some(root), Some(dir)) = (project_root(path), config.output.dir.as_ref()) {
        config.output.dir = Some(resolve_path(root, dir));
    }

    debug!("loaded config from {}", path.display());
    Ok(config)
}

/// The configuration used when no hqscale.toml is found.
pub fn default_config() -> HqConfig {
    HqConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut HqConfig, overrides: &CliOverrides) {
    if let Some(luma) = overrides.luma_threshold {
        config.filter.luma_threshold = luma;
    }
    if let Some(u) = overrides.chroma_u_threshold {
        config.filter.chroma_u_threshold = u;
    }
    if let Some(v) = overrides.chroma_v_threshold {
        config.filter.chroma_v_threshold = v;
    }
    if let Some(parallel) = overrides.parallel {
        config.filter.parallel = parallel;
    }
    if let Some(ref dir) = overrides.out_dir {
        config.output.dir = Some(dir.clone());
    }
}

/// Get the directory holding a config file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
