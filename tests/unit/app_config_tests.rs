/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::str::FromStr;
use tempfile::TempDir;
use ytcaptions::app_config::{Config, LogLevel, OutputFormat};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.http.accept_language, "en-US");
    assert_eq!(config.http.timeout_secs, 30);
    assert!(!config.http.user_agent.is_empty());
    assert_eq!(config.default_languages, vec!["en".to_string()]);
    assert!(!config.preserve_formatting);
    assert_eq!(config.output_format, OutputFormat::Text);
    assert_eq!(config.concurrent_requests, 4);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.default_languages = vec![];
    assert!(config.validate().is_err());
    config.default_languages = vec!["de".to_string(), " ".to_string()];
    assert!(config.validate().is_err());
    config.default_languages = vec!["de".to_string(), "en".to_string()];
    assert!(config.validate().is_ok());

    config.http.accept_language = "".to_string();
    assert!(config.validate().is_err());
    config.http.accept_language = "de-DE".to_string();

    config.http.timeout_secs = 0;
    assert!(config.validate().is_err());
    config.http.timeout_secs = 10;

    config.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.concurrent_requests = 1;

    assert!(config.validate().is_ok());
}

/// Test that a missing file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert_eq!(config, Config::default());
    assert!(path.exists());
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, config);
    Ok(())
}

/// Test that saved values survive a reload
#[test]
fn test_save_thenLoad_shouldKeepValues() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.default_languages = vec!["de".to_string(), "en".to_string()];
    config.output_format = OutputFormat::WebVtt;
    config.preserve_formatting = true;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

/// Test that omitted fields fall back to their defaults
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, r#"{"default_languages":["fr"],"output_format":"srt","http":{"timeout_secs":5}}"#)?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.default_languages, vec!["fr".to_string()]);
    assert_eq!(config.output_format, OutputFormat::Srt);
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.http.accept_language, "en-US");
    assert_eq!(config.concurrent_requests, 4);
    Ok(())
}

/// Test that an unreadable file is reported
#[test]
fn test_load_withInvalidJson_shouldFail() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    let result = Config::load_or_create(&path);
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_outputFormat_fromStr_shouldAcceptKnownNames() {
    assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
    assert_eq!(OutputFormat::from_str("PRETTY").unwrap(), OutputFormat::Pretty);
    assert_eq!(OutputFormat::from_str("vtt").unwrap(), OutputFormat::WebVtt);
    assert_eq!(OutputFormat::from_str("webvtt").unwrap(), OutputFormat::WebVtt);
    assert!(OutputFormat::from_str("docx").is_err());
}

#[test]
fn test_outputFormat_display_shouldRoundTripThroughFromStr() {
    for format in [OutputFormat::Json, OutputFormat::Pretty, OutputFormat::Text, OutputFormat::Srt, OutputFormat::WebVtt] {
        assert_eq!(OutputFormat::from_str(&format.to_string()).unwrap(), format);
    }
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
