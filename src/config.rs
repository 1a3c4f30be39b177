//! Configuration for brainlink.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (BRAINLINK_HOME, BRAINLINK_API_URL, BRAINLINK_SHARE_ORIGIN)
//! 2. Config file (.brainlink/config.yaml)
//! 3. Defaults (~/.brainlink, local development servers)
//!
//! Config file discovery:
//! - Searches current directory and parents for .brainlink/config.yaml
//! - Paths in config file are relative to the .brainlink/ directory

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub share: Option<ShareConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory holding the session token (relative to .brainlink/)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    /// Origin of the web client that serves shared collections
    pub origin: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the brainlink home (session state)
    pub home: PathBuf,
    /// Remote store settings
    pub api: ApiSettings,
    /// Origin used to build share URLs
    pub share_origin: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Find config file by searching a directory and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".brainlink").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Environment overrides, read once per load
#[derive(Debug, Default)]
struct EnvOverrides {
    home: Option<String>,
    api_url: Option<String>,
    share_origin: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("BRAINLINK_HOME").ok(),
            api_url: std::env::var("BRAINLINK_API_URL").ok(),
            share_origin: std::env::var("BRAINLINK_SHARE_ORIGIN").ok(),
        }
    }
}

/// Merge the config file, environment and defaults
fn resolve(
    config_file: Option<PathBuf>,
    file: Option<ConfigFile>,
    env: EnvOverrides,
    default_home: PathBuf,
) -> ResolvedConfig {
    let file_api = file.as_ref().and_then(|f| f.api.clone());
    let file_share = file.as_ref().and_then(|f| f.share.clone());

    let home = if let Some(env_home) = env.home {
        PathBuf::from(env_home)
    } else if let (Some(path), Some(home)) = (
        config_file.as_ref(),
        file.as_ref().and_then(|f| f.paths.home.as_ref()),
    ) {
        let brainlink_dir = path.parent().unwrap_or(Path::new("."));
        resolve_path(brainlink_dir, home)
    } else {
        default_home
    };

    let api = ApiSettings {
        base_url: env
            .api_url
            .or_else(|| file_api.as_ref().and_then(|a| a.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        timeout_seconds: file_api
            .as_ref()
            .and_then(|a| a.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
    };

    let share_origin = env
        .share_origin
        .or_else(|| file_share.and_then(|s| s.origin))
        .unwrap_or_else(|| DEFAULT_SHARE_ORIGIN.to_string());

    ResolvedConfig {
        home,
        api,
        share_origin,
        config_file,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".brainlink");

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file_from(&cwd);
    let file = config_file.as_deref().map(load_config_file).transpose()?;

    Ok(resolve(config_file, file, EnvOverrides::from_env(), default_home))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the brainlink home directory
pub fn brainlink_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}
