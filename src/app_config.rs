use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language settings for both documents of a pair
    #[serde(default)]
    pub languages: LanguagesConfig,

    /// Link validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Reconciliation policy
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// Compute and report changes without writing documents
    #[serde(default)]
    pub dry_run: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Table variant, selecting the reconciliation rules
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    // @variant: Forms tables, rows without links become "not applicable"
    #[default]
    Forms,
    // @variant: Publications tables, alternate file names are tried
    Publications,
}

impl Variant {
    // @returns: Lowercase variant identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Forms => "forms".to_string(),
            Self::Publications => "publications".to_string(),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "forms" => Ok(Self::Forms),
            "publications" => Ok(Self::Publications),
            _ => Err(anyhow!("Invalid variant: {}", s)),
        }
    }
}

/// Settings for one language of the pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageSettings {
    // @field: Language code used in document file names
    pub code: String,

    // @field: Visible text of the "unavailable" placeholder
    pub unavailable_text: String,

    // @field: Visible text of the "not applicable" placeholder
    pub not_applicable_text: String,
}

/// Both languages of a document pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguagesConfig {
    /// Primary language (defaults to English)
    #[serde(default = "default_primary_language")]
    pub primary: LanguageSettings,

    /// Secondary language (defaults to French)
    #[serde(default = "default_secondary_language")]
    pub secondary: LanguageSettings,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_language(),
            secondary: default_secondary_language(),
        }
    }
}

/// Link validation configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Timeout budget of one probe (HEAD and GET fallback together), in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum probes in flight overall
    #[serde(default = "default_max_concurrent_probes")]
    pub max_concurrent_probes: usize,

    /// Maximum probes in flight against one host
    #[serde(default = "default_max_probes_per_host")]
    pub max_probes_per_host: usize,

    /// User-Agent header sent with probes
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL for relative links (optional)
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_concurrent_probes: default_max_concurrent_probes(),
            max_probes_per_host: default_max_probes_per_host(),
            user_agent: default_user_agent(),
            base_url: None,
        }
    }
}

impl ValidationConfig {
    /// Probe timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parsed base URL, if configured
    pub fn parsed_base_url(&self) -> Result<Option<Url>, ConfigError> {
        match self.base_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string())),
        }
    }
}

/// Reconciliation policy configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Table variant
    #[serde(default)]
    pub variant: Variant,

    /// Element wrapping placeholder text
    #[serde(default = "default_placeholder_element")]
    pub placeholder_element: String,

    /// Class marking placeholders as muted
    #[serde(default = "default_placeholder_class")]
    pub placeholder_class: String,

    /// Override: leave cells without links untouched
    #[serde(default)]
    pub skip_cells_without_links: Option<bool>,

    /// Override: try alternate publication URLs
    #[serde(default)]
    pub resolve_alternates: Option<bool>,

    /// Override: demote rows without live links to "not applicable"
    #[serde(default)]
    pub demote_empty_rows: Option<bool>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            placeholder_element: default_placeholder_element(),
            placeholder_class: default_placeholder_class(),
            skip_cells_without_links: None,
            resolve_alternates: None,
            demote_empty_rows: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_primary_language() -> LanguageSettings {
    LanguageSettings {
        code: "en".to_string(),
        unavailable_text: "Not available".to_string(),
        not_applicable_text: "Not applicable".to_string(),
    }
}

fn default_secondary_language() -> LanguageSettings {
    LanguageSettings {
        code: "fr".to_string(),
        unavailable_text: "Non disponible".to_string(),
        not_applicable_text: "Sans objet".to_string(),
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_probes() -> usize {
    8
}

fn default_max_probes_per_host() -> usize {
    4
}

fn default_user_agent() -> String {
    format!("tablecheck/{}", env!("CARGO_PKG_VERSION"))
}

fn default_placeholder_element() -> String {
    "span".to_string()
}

fn default_placeholder_class() -> String {
    "text-muted".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validation.timeout_secs == 0 {
            return Err(ConfigError::NotPositive("validation.timeout_secs"));
        }
        if self.validation.max_concurrent_probes == 0 {
            return Err(ConfigError::NotPositive("validation.max_concurrent_probes"));
        }
        if self.validation.max_probes_per_host == 0 {
            return Err(ConfigError::NotPositive("validation.max_probes_per_host"));
        }

        let primary = self.languages.primary.code.trim();
        let secondary = self.languages.secondary.code.trim();
        if primary.is_empty() {
            return Err(ConfigError::EmptyLanguageCode("primary"));
        }
        if secondary.is_empty() {
            return Err(ConfigError::EmptyLanguageCode("secondary"));
        }
        if primary.eq_ignore_ascii_case(secondary) {
            return Err(ConfigError::SameLanguageCodes(primary.to_string()));
        }

        self.validation.parsed_base_url()?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            languages: LanguagesConfig::default(),
            validation: ValidationConfig::default(),
            reconcile: ReconcileConfig::default(),
            dry_run: false,
            log_level: LogLevel::default(),
        }
    }
}
