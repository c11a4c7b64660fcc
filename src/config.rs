//! Configuration management for toolharvest
//!
//! Settings come from a YAML file (default `toolharvest.yaml`) and are then
//! overridden by environment variables. The result is an [`AppConfig`] value
//! that is loaded once at startup and passed down explicitly.
//!
//! # File layout
//!
//! ```yaml
//! providers:
//!   deepseek:
//!     env_key: DEEPSEEK_API_KEY
//!     default_base_url: https://api.deepseek.com/v1/
//!     default_model: deepseek-chat
//!     adapter: openai
//!     temperature: 0.7
//!     max_tokens: 2000
//! crawler:
//!   max_content_length: 15000
//!   request_timeout: 120
//!   log_level: warn
//! data:
//!   data_dir: data
//!   tools_file: tools.json
//! ```
//!
//! Provider order is preserved; the first available provider is the default
//! backend for AI-assisted merging.
//!
//! # Environment Variables
//!
//! - `TOOLHARVEST_CONFIG`: config file path - default: `toolharvest.yaml`
//! - `TOOLHARVEST_MAX_CONTENT_LENGTH`: merge prompt truncation (chars) - default: 15000
//! - `TOOLHARVEST_REQUEST_TIMEOUT`: per-request timeout in seconds - default: 120
//! - `TOOLHARVEST_LOG_LEVEL`: logging level - default: "warn"
//! - `TOOLHARVEST_DATA_DIR`: dataset directory - default: `data` next to the config file
//! - `TOOLHARVEST_TOOLS_FILE`: dataset file name - default: `tools.json`
//!
//! API keys are read from the variable named by each provider's `env_key`.

use crate::llm::BackendError;
use genai::adapter::AdapterKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "toolharvest.yaml";
pub const CONFIG_PATH_ENV: &str = "TOOLHARVEST_CONFIG";

const DEFAULT_MAX_CONTENT_LENGTH: usize = 15_000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LOG_LEVEL: &str = "warn";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TOOLS_FILE: &str = "tools.json";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Unknown provider: {name}. Configured providers: {known}")]
    UnknownProvider { name: String, known: String },

    #[error("Provider {name} is not configured. Set the {env_key} environment variable")]
    ProviderNotConfigured { name: String, env_key: String },

    #[error("Unsupported adapter '{adapter}' for provider {name}")]
    UnsupportedAdapter { name: String, adapter: String },

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// One `providers.<name>` block of the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub env_key: Option<String>,
    pub default_base_url: Option<String>,
    pub default_model: Option<String>,
    pub adapter: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    pub max_content_length: usize,
    pub request_timeout: u64,
    pub log_level: String,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub data_dir: PathBuf,
    pub tools_file: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            tools_file: DEFAULT_TOOLS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    providers: serde_yaml::Mapping,
    #[serde(default)]
    crawler: CrawlerSettings,
    #[serde(default)]
    data: DataSettings,
}

/// A provider with its credential present and every default filled in
#[derive(Clone)]
pub struct ResolvedProvider {
    pub name: String,
    pub adapter: AdapterKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("name", &self.name)
            .field("adapter", &self.adapter)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Providers in file order
    pub providers: Vec<(String, ProviderSettings)>,
    pub crawler: CrawlerSettings,
    pub data: DataSettings,
    /// Config file this was loaded from, if any
    pub source: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            crawler: CrawlerSettings::default(),
            data: DataSettings::default(),
            source: None,
        }
    }
}

impl AppConfig {
    /// Loads the config file and applies environment overrides
    ///
    /// With no explicit path, `TOOLHARVEST_CONFIG` and then
    /// `toolharvest.yaml` are tried; a missing default file yields defaults
    /// with no providers. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)?
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    warn!(
                        "Config file {} not found, using defaults with no providers",
                        path.display()
                    );
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a config file; relative data paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut config = Self::from_yaml_str(&content, base_dir)?;
        config.source = Some(path.to_path_buf());
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        let mut providers = Vec::with_capacity(raw.providers.len());
        for (key, value) in raw.providers {
            let name = key
                .as_str()
                .ok_or_else(|| {
                    ConfigError::ValidationFailed("provider names must be strings".to_string())
                })?
                .to_lowercase();
            let settings: ProviderSettings = if value.is_null() {
                ProviderSettings::default()
            } else {
                serde_yaml::from_value(value)?
            };
            providers.push((name, settings));
        }

        let mut data = raw.data;
        if data.data_dir.is_relative() && !base_dir.as_os_str().is_empty() {
            data.data_dir = base_dir.join(&data.data_dir);
        }

        Ok(Self {
            providers,
            crawler: raw.crawler,
            data,
            source: None,
        })
    }

    /// Applies `TOOLHARVEST_*` overrides on top of file values
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = env::var("TOOLHARVEST_MAX_CONTENT_LENGTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.crawler.max_content_length = v;
        }

        if let Some(v) = env::var("TOOLHARVEST_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.crawler.request_timeout = v;
        }

        if let Ok(v) = env::var("TOOLHARVEST_LOG_LEVEL") {
            self.crawler.log_level = v;
        }

        if let Ok(v) = env::var("TOOLHARVEST_DATA_DIR") {
            self.data.data_dir = PathBuf::from(v);
        }

        if let Ok(v) = env::var("TOOLHARVEST_TOOLS_FILE") {
            self.data.tools_file = v;
        }

        self.crawler.log_level = normalize_level(&self.crawler.log_level);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawler.request_timeout == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.crawler.request_timeout > 3600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 1 hour".to_string(),
            ));
        }

        if self.crawler.max_content_length < 100 {
            return Err(ConfigError::ValidationFailed(
                "Max content length must be at least 100 characters".to_string(),
            ));
        }

        match self.crawler.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.crawler.log_level
                )))
            }
        }

        if self.data.tools_file.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "data.tools_file cannot be empty".to_string(),
            ));
        }

        for (name, settings) in &self.providers {
            if let Some(t) = settings.temperature {
                if !(0.0..=2.0).contains(&t) {
                    return Err(ConfigError::ValidationFailed(format!(
                        "temperature for {} must be between 0.0 and 2.0",
                        name
                    )));
                }
            }
            if settings.max_tokens == Some(0) {
                return Err(ConfigError::ValidationFailed(format!(
                    "max_tokens for {} must be positive",
                    name
                )));
            }
        }

        Ok(())
    }

    pub fn data_file(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.tools_file)
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn provider_settings(&self, name: &str) -> Option<&ProviderSettings> {
        let name = name.to_lowercase();
        self.providers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| s)
    }

    /// Resolves one provider, failing if it is unknown or lacks a credential
    pub fn resolve_provider(&self, name: &str) -> Result<ResolvedProvider, ConfigError> {
        let name = name.trim().to_lowercase();
        let settings =
            self.provider_settings(&name)
                .ok_or_else(|| ConfigError::UnknownProvider {
                    name: name.clone(),
                    known: self.provider_names().join(", "),
                })?;

        let env_key = settings
            .env_key
            .clone()
            .ok_or_else(|| ConfigError::ValidationFailed(format!("{} has no env_key", name)))?;

        let api_key = env::var(&env_key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::ProviderNotConfigured {
                name: name.clone(),
                env_key: env_key.clone(),
            })?;

        let adapter_name = settings
            .adapter
            .clone()
            .unwrap_or_else(|| "openai".to_string())
            .to_lowercase();
        let adapter = AdapterKind::from_lower_str(&adapter_name).ok_or_else(|| {
            ConfigError::UnsupportedAdapter {
                name: name.clone(),
                adapter: adapter_name.clone(),
            }
        })?;

        let model = settings.default_model.clone().ok_or_else(|| {
            ConfigError::ValidationFailed(format!("{} has no default_model", name))
        })?;

        Ok(ResolvedProvider {
            name,
            adapter,
            api_key,
            base_url: settings.default_base_url.clone(),
            model,
            temperature: settings.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }

    /// Providers that resolve cleanly, in file order; the rest are skipped
    ///
    /// A missing API key is the normal way to switch a provider off and is
    /// only logged at debug. Any other resolution error is a broken provider
    /// block and gets a warning.
    pub fn available_providers(&self) -> Vec<ResolvedProvider> {
        self.providers
            .iter()
            .filter_map(|(name, _)| match self.resolve_provider(name) {
                Ok(resolved) => Some(resolved),
                Err(e @ ConfigError::ProviderNotConfigured { .. }) => {
                    debug!("Skipping provider {}: {}", name, e);
                    None
                }
                Err(e) => {
                    warn!("Skipping misconfigured provider {}: {}", name, e);
                    None
                }
            })
            .collect()
    }

    pub fn is_provider_available(&self, name: &str) -> bool {
        self.resolve_provider(name).is_ok()
    }

    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert(
            "config_file".to_string(),
            self.source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<defaults>".to_string()),
        );
        map.insert("providers".to_string(), self.provider_names().join(", "));
        map.insert(
            "max_content_length".to_string(),
            self.crawler.max_content_length.to_string(),
        );
        map.insert(
            "request_timeout_secs".to_string(),
            self.crawler.request_timeout.to_string(),
        );
        map.insert("log_level".to_string(), self.crawler.log_level.clone());
        map.insert(
            "data_file".to_string(),
            self.data_file().display().to_string(),
        );

        map
    }
}

fn normalize_level(level: &str) -> String {
    match level.trim().to_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" => "error".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Toolharvest Configuration:")?;
        match &self.source {
            Some(path) => writeln!(f, "  Config File: {}", path.display())?,
            None => writeln!(f, "  Config File: <defaults>")?,
        }
        writeln!(f, "  Providers: {}", self.provider_names().join(", "))?;
        writeln!(
            f,
            "  Max Content Length: {} chars",
            self.crawler.max_content_length
        )?;
        writeln!(f, "  Request Timeout: {}s", self.crawler.request_timeout)?;
        writeln!(f, "  Log Level: {}", self.crawler.log_level)?;
        writeln!(f, "  Data File: {}", self.data_file().display())?;
        Ok(())
    }
}
