//! Configuration: where the catalog and profiles live, and the log level.
//!
//! ```toml
//! [data]
//! catalog = "data/distros.json"
//! profiles = "data/profiles.json"
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Lookup order: explicit path, `DISTRO_MATCH_CONFIG`, the user config
//! directory (`~/.config/distro-match/config.toml`), then built-in defaults.
//! Relative data paths resolve against the config file's directory.
//!
//! Built-in defaults use the first of the current directory, the
//! executable's directory and the source checkout that holds
//! `data/distros.json`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DISTRO_MATCH_CONFIG";
pub const CONFIG_DIR_NAME: &str = "distro-match";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_CATALOG: &str = "data/distros.json";
pub const DEFAULT_PROFILES: &str = "data/profiles.json";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub catalog_path: PathBuf,
    pub profiles_path: Option<PathBuf>,
    pub log_level: String,
    /// File the settings came from; `None` for built-in defaults.
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    data: Option<DataToml>,
    logging: Option<LoggingToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DataToml {
    catalog: String,
    profiles: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingToml {
    level: Option<String>,
}

impl MatchConfig {
    /// Built-in defaults relative to `base_dir`.
    pub fn defaults(base_dir: &Path) -> Self {
        Self {
            catalog_path: base_dir.join(DEFAULT_CATALOG),
            profiles_path: Some(base_dir.join(DEFAULT_PROFILES)),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            source: None,
        }
    }
}

/// Resolve configuration using the standard lookup order.
pub fn resolve_config(explicit: Option<&Path>) -> Result<MatchConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if let Ok(raw) = env::var(CONFIG_ENV) {
        if !raw.trim().is_empty() {
            return load_config(Path::new(&raw))
                .with_context(|| format!("loading config named by {CONFIG_ENV}"));
        }
    }
    if let Some(path) = user_config_path() {
        if path.is_file() {
            return load_config(&path);
        }
    }

    let cwd = env::current_dir().context("resolving current directory")?;
    let candidates = default_base_candidates(cwd.clone());
    let base = bundled_data_base(&candidates).unwrap_or(cwd.as_path());
    Ok(MatchConfig::defaults(base))
}

/// Directories that may hold the bundled `data/`, in lookup order.
fn default_base_candidates(cwd: PathBuf) -> Vec<PathBuf> {
    let mut candidates = vec![cwd];
    if let Some(exe_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir);
    }
    candidates.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    candidates
}

/// First candidate that contains the default catalog.
pub fn bundled_data_base(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|base| base.join(DEFAULT_CATALOG).is_file())
}

/// `<config_dir>/distro-match/config.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load a config file. A missing or malformed file is an error.
pub fn load_config(path: &Path) -> Result<MatchConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config '{}'", path.display()))?;
    let parsed: ConfigToml =
        toml::from_str(&raw).with_context(|| format!("parsing config '{}'", path.display()))?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut config = MatchConfig::defaults(base_dir);
    config.source = Some(path.to_path_buf());

    if let Some(data) = parsed.data {
        config.catalog_path = resolve_data_path(base_dir, &data.catalog);
        config.profiles_path = data
            .profiles
            .as_deref()
            .map(|profiles| resolve_data_path(base_dir, profiles));
    }

    if let Some(level) = parsed.logging.and_then(|logging| logging.level) {
        config.log_level = parse_log_level(&level).with_context(|| {
            format!("invalid config '{}'", path.display())
        })?;
    }

    Ok(config)
}

pub fn resolve_data_path(base_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

fn parse_log_level(raw: &str) -> Result<String> {
    let level = raw.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        return Ok(level);
    }
    bail!(
        "unsupported logging.level '{}'; expected one of: {}",
        raw,
        LOG_LEVELS.join(", ")
    )
}
