// Runtime configuration
//
// Loaded from an optional `course-registry.toml`, then overridden by
// environment variables. A missing file means defaults everywhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ADDR_ENV: &str = "COURSE_REGISTRY_ADDR";
pub const NAME_POLICY_ENV: &str = "COURSE_REGISTRY_NAME_POLICY";

/// Whether the store itself rejects blank names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Empty or whitespace-only names fail with `StoreError::EmptyName`
    #[default]
    Strict,
    /// Any string is accepted; callers are trusted to check
    Permissive,
}

impl FromStr for NamePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(NamePolicy::Strict),
            "permissive" => Ok(NamePolicy::Permissive),
            other => anyhow::bail!("unknown name policy: {}", other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub name_policy: NamePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub store: StoreConfig,
    pub server: ServerConfig,
    /// tracing-subscriber filter directive; `RUST_LOG` wins when set
    pub log_filter: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            store: StoreConfig::default(),
            server: ServerConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("course-registry.toml")
}

/// Parse a config document
pub fn parse_config(contents: &str) -> anyhow::Result<RegistryConfig> {
    let config: RegistryConfig = toml::from_str(contents)?;
    Ok(config)
}

/// Load config from `path` (or the default path), then apply env overrides
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RegistryConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        parse_config(&contents)?
    } else {
        RegistryConfig::default()
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply overrides from a key lookup (the environment in production)
pub fn apply_overrides<F>(config: &mut RegistryConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(addr) = lookup(ADDR_ENV) {
        config.server.addr = addr;
    }
    if let Some(policy) = lookup(NAME_POLICY_ENV) {
        config.store.name_policy = policy.parse()?;
    }
    if let Some(filter) = lookup("RUST_LOG") {
        config.log_filter = filter;
    }
    Ok(())
}
