//! Configuration for shelfkeeper.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SHELFKEEPER_HOME, SHELFKEEPER_DATA)
//! 2. Config file (.shelfkeeper/config.yaml)
//! 3. Defaults (~/.shelfkeeper/library_data.json)
//!
//! Config file discovery:
//! - Searches current directory and parents for .shelfkeeper/config.yaml
//! - Paths in config file are relative to the directory containing .shelfkeeper/

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{Library, DEFAULT_DATA_FILE};
use crate::domain::{Role, User};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to project root)
    pub home: Option<String>,
    /// Data file (relative to project root)
    pub data_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub users: Vec<BootstrapUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapUser {
    pub user_id: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub password: Option<String>,
}

fn default_role() -> Role {
    Role::Member
}

impl From<BootstrapUser> for User {
    fn from(u: BootstrapUser) -> Self {
        User {
            user_id: u.user_id,
            name: u.name,
            role: u.role,
            password: u.password,
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Library data file
    pub data_file: PathBuf,
    /// Users seeded into a fresh data file
    pub bootstrap_users: Vec<User>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".shelfkeeper").join("config.yaml");
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

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merge environment, config file and defaults
fn resolve(
    default_home: PathBuf,
    config: Option<(&Path, ConfigFile)>,
    env_home: Option<String>,
    env_data: Option<String>,
) -> ResolvedConfig {
    let (config_file, paths, bootstrap) = match config {
        Some((config_path, file)) => {
            // Base directory is the parent of .shelfkeeper/
            let base_dir = config_path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."))
                .to_path_buf();
            (Some((config_path.to_path_buf(), base_dir)), file.paths, file.bootstrap)
        }
        None => (None, PathsConfig::default(), None),
    };
    let base_dir = config_file.as_ref().map(|(_, base)| base.as_path());

    let home = match (env_home, base_dir, paths.home.as_deref()) {
        (Some(env), _, _) => PathBuf::from(env),
        (None, Some(base), Some(home)) => resolve_path(base, home),
        _ => default_home,
    };

    let data_file = match (env_data, base_dir, paths.data_file.as_deref()) {
        (Some(env), _, _) => PathBuf::from(env),
        (None, Some(base), Some(data)) => resolve_path(base, data),
        _ => home.join(DEFAULT_DATA_FILE),
    };

    let bootstrap_users = match bootstrap {
        Some(b) if !b.users.is_empty() => b.users.into_iter().map(User::from).collect(),
        _ => Library::default_users(),
    };

    ResolvedConfig {
        home,
        data_file,
        bootstrap_users,
        config_file: config_file.map(|(path, _)| path),
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".shelfkeeper");

    let config_path = find_config_file();
    let file = config_path.as_deref().map(load_config_file).transpose()?;

    Ok(resolve(
        default_home,
        config_path.as_deref().zip(file),
        std::env::var("SHELFKEEPER_HOME").ok(),
        std::env::var("SHELFKEEPER_DATA").ok(),
    ))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the configured data file
pub fn data_file() -> Result<PathBuf> {
    Ok(config()?.data_file.clone())
}
