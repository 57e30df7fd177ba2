// Configuration loading and parsing (contest.toml, providers.toml,
// credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::odds::resolve::BookPreference;

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
    pub contest: ContestConfig,
    pub odds: OddsConfig,
    pub player_pool: EndpointConfig,
    pub optimizer: EndpointConfig,
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Bookmaker preference pair for the resolution cascade.
    pub fn book_preference(&self) -> BookPreference {
        BookPreference {
            preferred: self.odds.preferred_book.clone(),
            fallback: self.odds.fallback_book.clone(),
        }
    }

    /// Per-batch timeout for odds provider calls.
    pub fn odds_timeout(&self) -> Duration {
        Duration::from_secs(self.odds.timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// contest.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[contest]` table in contest.toml.
#[derive(Debug, Clone, Deserialize)]
struct ContestFile {
    contest: ContestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContestConfig {
    pub name: String,
    pub week: u16,
    pub salary_cap: u32,
}

// ---------------------------------------------------------------------------
// providers.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire providers.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ProvidersFile {
    odds: OddsConfig,
    player_pool: EndpointConfig,
    optimizer: EndpointConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    pub base_url: String,
    pub preferred_book: String,
    pub fallback_book: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub odds_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/contest.toml`,
/// `config/providers.toml`, and (optionally) `config/credentials.toml`,
/// all relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- contest.toml (required) ---
    let contest_path = config_dir.join("contest.toml");
    let contest_text = read_file(&contest_path)?;
    let contest_file: ContestFile =
        toml::from_str(&contest_text).map_err(|e| ConfigError::ParseError {
            path: contest_path.clone(),
            source: e,
        })?;

    // --- providers.toml (required) ---
    let providers_path = config_dir.join("providers.toml");
    let providers_text = read_file(&providers_path)?;
    let providers_file: ProvidersFile =
        toml::from_str(&providers_text).map_err(|e| ConfigError::ParseError {
            path: providers_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        contest: contest_file.contest,
        odds: providers_file.odds,
        player_pool: providers_file.player_pool,
        optimizer: providers_file.optimizer,
        credentials,
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

        // Skip .example template files
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
                // File already exists in config/, skip it
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
/// directory. Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.contest.salary_cap == 0 {
        return Err(ConfigError::ValidationError {
            field: "contest.salary_cap".to_string(),
            message: "salary cap must be positive".to_string(),
        });
    }
    if !(1..=18).contains(&config.contest.week) {
        return Err(ConfigError::ValidationError {
            field: "contest.week".to_string(),
            message: format!("week {} outside 1..=18", config.contest.week),
        });
    }
    if config.odds.preferred_book.is_empty() || config.odds.fallback_book.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "odds.preferred_book".to_string(),
            message: "both preferred_book and fallback_book must be set".to_string(),
        });
    }
    if config.odds.preferred_book == config.odds.fallback_book {
        return Err(ConfigError::ValidationError {
            field: "odds.fallback_book".to_string(),
            message: "fallback_book must differ from preferred_book".to_string(),
        });
    }
    if config.odds.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "odds.timeout_secs".to_string(),
            message: "timeout must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEST_TOML: &str = r#"
[contest]
name = "Sunday Main Slate"
week = 9
salary_cap = 50000
"#;

    const PROVIDERS_TOML: &str = r#"
[odds]
base_url = "http://localhost:9100"
preferred_book = "bookA"
fallback_book = "bookB"
timeout_secs = 5

[player_pool]
base_url = "http://localhost:9101"

[optimizer]
base_url = "http://localhost:9102"
"#;

    fn write_config(dir: &Path, contest: &str, providers: &str) {
        let config_dir = dir.join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("contest.toml"), contest).unwrap();
        std::fs::write(config_dir.join("providers.toml"), providers).unwrap();
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lineup-config-test-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_valid_config() {
        let dir = temp_dir("valid");
        write_config(&dir, CONTEST_TOML, PROVIDERS_TOML);

        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.contest.name, "Sunday Main Slate");
        assert_eq!(config.contest.week, 9);
        assert_eq!(config.contest.salary_cap, 50_000);
        assert_eq!(config.odds.preferred_book, "bookA");
        assert_eq!(config.odds_timeout(), Duration::from_secs(5));
        assert!(config.credentials.odds_api_key.is_none());

        let prefs = config.book_preference();
        assert_eq!(prefs.preferred, "bookA");
        assert_eq!(prefs.fallback, "bookB");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_contest_file_errors() {
        let dir = temp_dir("missing");
        std::fs::create_dir_all(dir.join("config")).unwrap();
        std::fs::write(dir.join("config/providers.toml"), PROVIDERS_TOML).unwrap();

        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_toml_errors() {
        let dir = temp_dir("malformed");
        write_config(&dir, "[contest\nname = ", PROVIDERS_TOML);

        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_cap_fails_validation() {
        let dir = temp_dir("zerocap");
        let contest = CONTEST_TOML.replace("salary_cap = 50000", "salary_cap = 0");
        write_config(&dir, &contest, PROVIDERS_TOML);

        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "contest.salary_cap"
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn out_of_range_week_fails_validation() {
        let dir = temp_dir("week");
        let contest = CONTEST_TOML.replace("week = 9", "week = 19");
        write_config(&dir, &contest, PROVIDERS_TOML);

        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn identical_books_fail_validation() {
        let dir = temp_dir("books");
        let providers = PROVIDERS_TOML.replace("fallback_book = \"bookB\"", "fallback_book = \"bookA\"");
        write_config(&dir, CONTEST_TOML, &providers);

        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "odds.fallback_book"
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn optional_credentials_loaded_when_present() {
        let dir = temp_dir("creds");
        write_config(&dir, CONTEST_TOML, PROVIDERS_TOML);
        std::fs::write(
            dir.join("config/credentials.toml"),
            "odds_api_key = \"test-key-123\"\n",
        )
        .unwrap();

        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.credentials.odds_api_key.as_deref(), Some("test-key-123"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn ensure_config_files_copies_defaults() {
        let dir = temp_dir("defaults");
        let defaults_dir = dir.join("defaults");
        std::fs::create_dir_all(&defaults_dir).unwrap();
        std::fs::write(defaults_dir.join("contest.toml"), CONTEST_TOML).unwrap();
        std::fs::write(defaults_dir.join("providers.toml"), PROVIDERS_TOML).unwrap();
        std::fs::write(defaults_dir.join("credentials.toml.example"), "# template").unwrap();

        let copied = ensure_config_files(&dir).unwrap();
        assert_eq!(copied.len(), 2, ".example files must be skipped");
        assert!(dir.join("config/contest.toml").exists());
        assert!(!dir.join("config/credentials.toml.example").exists());

        // Second run copies nothing.
        let copied = ensure_config_files(&dir).unwrap();
        assert!(copied.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn ensure_config_files_errors_without_defaults_or_config() {
        let dir = temp_dir("nodirs");
        let err = ensure_config_files(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
