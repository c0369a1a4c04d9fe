//! Configuration for the persona community tool
//!
//! Sources, highest precedence first:
//! 1. CLI arguments
//! 2. Environment variables (PERSONA_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::community::GenerationConfig;
use crate::error::{Error, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where records are persisted
    pub storage: StorageSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Defaults for `community generate`
    pub generation: GenerationSettings,
}

/// Storage location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Base data directory
    pub data_dir: String,

    /// Store file name, relative to `data_dir` unless absolute
    pub store_file: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (unset = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Generation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Member count when `--size` is not given
    pub default_size: usize,

    /// Generation profile used when no `--profile` file is given
    pub defaults: GenerationConfig,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.persona-community".to_string(),
            store_file: "store.json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_size: 10,
            defaults: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match Self::find_config_file(config_path)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration file");
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })?;
        info!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(Error::ConfigNotFound { path })
            };
        }

        let search_paths = [
            Some(PathBuf::from("persona-community.toml")),
            dirs::config_dir().map(|p| p.join("persona-community").join("config.toml")),
            dirs::home_dir().map(|p| p.join(".persona-community").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PERSONA_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("PERSONA_STORE_FILE") {
            self.storage.store_file = val;
        }

        if let Ok(val) = std::env::var("PERSONA_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PERSONA_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("PERSONA_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("PERSONA_DEFAULT_SIZE") {
            if let Ok(n) = val.parse() {
                self.generation.default_size = n;
            }
        }
    }

    fn expand_paths(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);
        self.storage.store_file = expand_path(&self.storage.store_file);
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.store_file.trim().is_empty() {
            return Err(Error::config_field_invalid("storage.store_file", "store file name cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        if self.generation.default_size == 0 {
            return Err(Error::config_field_invalid(
                "generation.default_size",
                "default size must be greater than zero",
            ));
        }

        self.generation.defaults.validate().map_err(|e| match e {
            Error::Validation { message, field } => Error::ConfigValidation {
                message,
                field: field.map(|f| format!("generation.defaults.{}", f)),
            },
            other => other,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    /// Full path of the JSON store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.store_file)
    }
}

/// Read a standalone generation profile (the `--profile` file of `community generate`).
pub fn load_generation_config(path: &str) -> Result<GenerationConfig> {
    let path = PathBuf::from(expand_path(path));
    if !path.exists() {
        return Err(Error::ConfigNotFound { path });
    }
    let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
        path: path.clone(),
        source: e,
    })?;
    let config: GenerationConfig = toml::from_str(&content).map_err(|e| Error::ConfigParse {
        message: format!("{}: {}", path.display(), e.message()),
        source: Some(e),
    })?;
    config.validate()?;
    Ok(config)
}

fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or(std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".persona-community")
        .join("config.toml")
}

/// Write a commented default configuration file, returning its path
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(Error::ConfigValidation {
            message: format!(
                "configuration file already exists: {}. Use --force to overwrite.",
                config_path.display()
            ),
            field: None,
        });
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# Persona Community Configuration

[storage]
# Base data directory
data_dir = "~/.persona-community"

# JSON store file, relative to data_dir unless absolute
store_file = "store.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.persona-community/logs/persona-community.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[generation]
# Members generated when --size is omitted
default_size = 10

[generation.defaults]
# Spread of political leaning around the center (0.0 - 1.0)
political_spread = 0.5

# Breadth of interests per member (0.0 - 1.0)
interest_spread = 0.5

# Upper bound of the socioeconomic draw (0.0 - 1.0)
socioeconomic_range = 0.5

# Mean activity level (0.0 - 1.0)
activity_level = 0.5

[generation.defaults.persona_weights]
# Relative selection weight per persona id; unlisted personas weigh 1.0
# "<persona-id>" = 2.0

[generation.defaults.age_distribution]
mean = 35.0
std_dev = 12.0
min_age = 18
max_age = 80
skewness = 0.0

[generation.defaults.location_constraint]
# city, region, country or global
type = "city"

# Candidate places; empty uses the built-in city list
locations = []

# Force every member urban (true) or rural (false)
# urban = true
"#
    .to_string()
}
