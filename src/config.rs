use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub rescore: RescoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

fn default_search_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct RescoreConfig {
    /// Number of listings shown in the rescore summary's leaderboard.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RescoreConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

/// Environment variable that overrides `[db].path`.
///
/// Lets a scheduler point a command (typically `rescore`) at a target
/// database without editing the config file.
pub const DB_ENV_VAR: &str = "TOOLDEX_DB";

pub fn load_config(path: &Path) -> Result<Config> {
    let env_db = std::env::var(DB_ENV_VAR).ok().filter(|v| !v.is_empty());

    // With the env override set, the config file becomes optional.
    let mut config: Config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).with_context(|| "Failed to parse config file")?,
        Err(e) => {
            if let Some(db_path) = &env_db {
                Config {
                    db: DbConfig {
                        path: PathBuf::from(db_path),
                    },
                    search: SearchConfig::default(),
                    rescore: RescoreConfig::default(),
                }
            } else {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to read config file: {} (set {} to run without one)",
                        path.display(),
                        DB_ENV_VAR
                    )
                });
            }
        }
    };

    if let Some(db_path) = env_db {
        config.db.path = PathBuf::from(db_path);
    }

    if config.search.limit < 1 {
        anyhow::bail!("search.limit must be >= 1");
    }
    if config.rescore.top_n == 0 {
        anyhow::bail!("rescore.top_n must be >= 1");
    }

    Ok(config)
}
