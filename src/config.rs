// Configuration loading and parsing (board.toml, aliases.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub refresh: RefreshConfig,
    pub rankings: Vec<RankingSource>,
    /// Raw alias pairs from aliases.toml, in display form. Normalized into
    /// an `AliasTable` at startup.
    pub aliases: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// board.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire board.toml file.
#[derive(Debug, Clone, Deserialize)]
struct BoardFile {
    draft: DraftConfig,
    refresh: RefreshConfig,
    rankings: Vec<RankingSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Sleeper league ID or draft ID; which one is detected at runtime.
    pub id: String,
    /// Sport key for the player directory endpoint.
    #[serde(default = "default_sport")]
    pub sport: String,
}

fn default_sport() -> String {
    "nfl".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refresh cycles.
    pub interval_secs: u64,
    /// Fixed timeout applied to every upstream HTTP call.
    pub http_timeout_secs: u64,
    /// How long a fetched player directory stays fresh. The directory is
    /// large and changes rarely; Sleeper asks clients to fetch it sparingly.
    pub directory_ttl_secs: u64,
    /// How long parsed ranking files stay fresh.
    pub rankings_ttl_secs: u64,
}

/// One ranking section: a tag plus the CSV file it is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct RankingSource {
    pub name: String,
    pub path: String,
}

// ---------------------------------------------------------------------------
// aliases.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
struct AliasesFile {
    #[serde(default)]
    aliases: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/board.toml` and
/// (optionally) `config/aliases.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- board.toml (required) ---
    let board_path = config_dir.join("board.toml");
    let board_text = read_file(&board_path)?;
    let board_file: BoardFile =
        toml::from_str(&board_text).map_err(|e| ConfigError::ParseError {
            path: board_path.clone(),
            source: e,
        })?;

    // --- aliases.toml (optional) ---
    let aliases_path = config_dir.join("aliases.toml");
    let aliases = if aliases_path.exists() {
        let alias_text = read_file(&aliases_path)?;
        let alias_file: AliasesFile =
            toml::from_str(&alias_text).map_err(|e| ConfigError::ParseError {
                path: aliases_path.clone(),
                source: e,
            })?;
        alias_file.aliases
    } else {
        HashMap::new()
    };

    let config = Config {
        draft: board_file.draft,
        refresh: board_file.refresh,
        rankings: board_file.rankings,
        aliases,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying default config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "draft.id".into(),
            message: "must be a Sleeper league or draft ID".into(),
        });
    }

    if config.draft.sport.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "draft.sport".into(),
            message: "must not be empty".into(),
        });
    }

    let refresh_fields: &[(&str, u64)] = &[
        ("refresh.interval_secs", config.refresh.interval_secs),
        ("refresh.http_timeout_secs", config.refresh.http_timeout_secs),
        ("refresh.directory_ttl_secs", config.refresh.directory_ttl_secs),
        ("refresh.rankings_ttl_secs", config.refresh.rankings_ttl_secs),
    ];
    for (name, val) in refresh_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.rankings.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "rankings".into(),
            message: "at least one [[rankings]] section is required".into(),
        });
    }
    for (i, source) in config.rankings.iter().enumerate() {
        if source.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("rankings[{i}].name"),
                message: "must not be empty".into(),
            });
        }
        if source.path.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("rankings[{i}].path"),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
