use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Language codes tried in order when none are given on the command line
    #[serde(default = "default_languages")]
    pub default_languages: Vec<String>,

    /// Keep inline formatting tags in fetched segments
    #[serde(default)]
    pub preserve_formatting: bool,

    /// Output format of fetched transcripts
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Maximum number of videos processed at once
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// HTTP transport configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HttpConfig {
    // @field: Accept-Language header value
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    // @field: User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept_language: default_accept_language(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Output format of fetched transcripts
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Compact JSON
    Json,
    // @format: Indented JSON
    Pretty,
    // @format: One line per segment
    #[default]
    Text,
    // @format: SubRip
    Srt,
    // @format: Web Video Text Tracks
    WebVtt,
}

impl OutputFormat {
    // @returns: Lowercase format identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Json => "json".to_string(),
            Self::Pretty => "pretty".to_string(),
            Self::Text => "text".to_string(),
            Self::Srt => "srt".to_string(),
            Self::WebVtt => "webvtt".to_string(),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "text" => Ok(Self::Text),
            "srt" => Ok(Self::Srt),
            "webvtt" | "vtt" => Ok(Self::WebVtt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
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

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_accept_language() -> String {
    "en-US".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.default_languages.is_empty() {
            return Err(anyhow!("At least one default language is required"));
        }
        if let Some(code) = self.default_languages.iter().find(|code| code.trim().is_empty()) {
            return Err(anyhow!("Invalid empty language code in default languages: {:?}", code));
        }

        if self.http.accept_language.trim().is_empty() {
            return Err(anyhow!("The Accept-Language header value must not be empty"));
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("The request timeout must be at least one second"));
        }

        if self.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        Ok(())
    }

    /// Load the configuration from `path`, writing the defaults there if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration to `path` as pretty printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            http: HttpConfig::default(),
            default_languages: default_languages(),
            preserve_formatting: false,
            output_format: OutputFormat::default(),
            concurrent_requests: default_concurrent_requests(),
            log_level: LogLevel::default(),
        }
    }
}
