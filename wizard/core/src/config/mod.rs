//! TOML Configuration File Support
//!
//! Configuration for the wizard and its content client, loaded from
//! `~/.config/adwizard/config.toml` and the environment.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! api_key = "sk-..."
//! completions_url = "https://api.openai.com/v1/engines/davinci/completions"
//! images_url = "https://api.openai.com/v1/images/generations"
//! image_model = "dall-e-3"
//! image_size = "1024x1024"
//! timeout_secs = 120
//!
//! [wizard]
//! template = "story"
//! ```
//!
//! # Environment Variables
//!
//! - `ADWIZARD_API_KEY` (falls back to `OPENAI_API_KEY`): bearer credential
//! - `ADWIZARD_COMPLETIONS_URL`, `ADWIZARD_IMAGES_URL`: endpoint overrides
//! - `ADWIZARD_COMPLETION_MODEL`, `ADWIZARD_IMAGE_MODEL`: model overrides
//! - `ADWIZARD_TIMEOUT_SECS`: per-request timeout
//! - `ADWIZARD_TEMPLATE`: initial template (`instagram`, `twitter`, `story`)

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::template::TemplateVariant;

/// Default text completion endpoint
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/engines/davinci/completions";

/// Default image generation endpoint
pub const DEFAULT_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where a configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[service]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceToml {
    /// Bearer credential
    pub api_key: Option<String>,
    /// Text completion endpoint
    pub completions_url: Option<String>,
    /// Image generation endpoint
    pub images_url: Option<String>,
    /// Model sent with completion requests (omitted when unset)
    pub completion_model: Option<String>,
    /// Image model
    pub image_model: Option<String>,
    /// Image size, e.g. "1024x1024"
    pub image_size: Option<String>,
    /// Image quality
    pub image_quality: Option<String>,
    /// Image style
    pub image_style: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// `[wizard]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardToml {
    /// Initially selected template
    pub template: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdWizardToml {
    /// Generative service section
    pub service: ServiceToml,
    /// Wizard section
    pub wizard: WizardToml,
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Settings for the HTTP content client
///
/// Injected into the client at construction; nothing is read from the
/// process environment after that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bearer credential (not validated locally)
    pub api_key: Option<String>,
    /// Text completion endpoint
    pub completions_url: String,
    /// Image generation endpoint
    pub images_url: String,
    /// Model sent with completion requests (omitted when `None`)
    pub completion_model: Option<String>,
    /// Image model
    pub image_model: String,
    /// Image size
    pub image_size: String,
    /// Image quality
    pub image_quality: String,
    /// Image style
    pub image_style: String,
    /// Images requested per call
    pub image_count: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            images_url: DEFAULT_IMAGES_URL.to_string(),
            completion_model: None,
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
            image_style: "vivid".to_string(),
            image_count: 1,
            timeout: Duration::from_secs(120),
        }
    }
}

impl ServiceConfig {
    /// Defaults pointed at a different host (keeps the default paths)
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            completions_url: format!("{base}/v1/engines/davinci/completions"),
            images_url: format!("{base}/v1/images/generations"),
            ..Self::default()
        }
    }

    /// Set the bearer credential
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Complete wizard configuration
#[derive(Clone, Debug)]
pub struct AdWizardConfig {
    /// Content client settings
    pub service: ServiceConfig,
    /// Initially selected template
    pub template: TemplateVariant,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for AdWizardConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            template: TemplateVariant::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl AdWizardConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/adwizard/config.toml` or
/// `~/.config/adwizard/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("adwizard").join("config.toml"))
}

/// Load configuration from the default path and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<AdWizardConfig, ConfigError> {
    load_config_with_env(default_config_path(), |key| std::env::var(key).ok())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AdWizardConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a value
/// (template name, timeout) is invalid.
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<AdWizardConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = AdWizardConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: AdWizardToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AdWizardConfig, toml: &AdWizardToml) -> Result<(), ConfigError> {
    let service = &mut config.service;
    let section = &toml.service;

    if let Some(ref key) = section.api_key {
        service.api_key = Some(key.clone());
    }
    if let Some(ref url) = section.completions_url {
        service.completions_url = url.clone();
    }
    if let Some(ref url) = section.images_url {
        service.images_url = url.clone();
    }
    if let Some(ref model) = section.completion_model {
        service.completion_model = Some(model.clone());
    }
    if let Some(ref model) = section.image_model {
        service.image_model = model.clone();
    }
    if let Some(ref size) = section.image_size {
        service.image_size = size.clone();
    }
    if let Some(ref quality) = section.image_quality {
        service.image_quality = quality.clone();
    }
    if let Some(ref style) = section.image_style {
        service.image_style = style.clone();
    }
    if let Some(secs) = section.timeout_secs {
        service.timeout = timeout_from_secs(secs)?;
    }

    if let Some(ref template) = toml.wizard.template {
        config.template = template
            .parse()
            .map_err(ConfigError::ValidationError)?;
    }

    Ok(())
}

/// Apply environment overrides (overrides file values)
fn apply_env_config<F>(config: &mut AdWizardConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut touched = false;
    let mut var = |key: &str| {
        let value = env(key).filter(|v| !v.trim().is_empty());
        touched |= value.is_some();
        value
    };

    if let Some(key) = var("ADWIZARD_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
        config.service.api_key = Some(key);
    }
    if let Some(url) = var("ADWIZARD_COMPLETIONS_URL") {
        config.service.completions_url = url;
    }
    if let Some(url) = var("ADWIZARD_IMAGES_URL") {
        config.service.images_url = url;
    }
    if let Some(model) = var("ADWIZARD_COMPLETION_MODEL") {
        config.service.completion_model = Some(model);
    }
    if let Some(model) = var("ADWIZARD_IMAGE_MODEL") {
        config.service.image_model = model;
    }
    if let Some(secs) = var("ADWIZARD_TIMEOUT_SECS") {
        let secs: u64 = secs.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!("ADWIZARD_TIMEOUT_SECS is not a number: {secs}"))
        })?;
        config.service.timeout = timeout_from_secs(secs)?;
    }
    if let Some(template) = var("ADWIZARD_TEMPLATE") {
        config.template = template.parse().map_err(ConfigError::ValidationError)?;
    }

    if touched {
        config.source = ConfigSource::Env;
    }
    Ok(())
}

fn timeout_from_secs(secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationError(
            "timeout must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::assert_ok;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AdWizardConfig::default();
        assert_eq!(config.service.api_key, None);
        assert_eq!(config.service.completions_url, DEFAULT_COMPLETIONS_URL);
        assert_eq!(config.service.images_url, DEFAULT_IMAGES_URL);
        assert_eq!(config.service.image_model, "dall-e-3");
        assert_eq!(config.service.image_size, "1024x1024");
        assert_eq!(config.service.image_quality, "standard");
        assert_eq!(config.service.image_style, "vivid");
        assert_eq!(config.service.image_count, 1);
        assert_eq!(config.template, TemplateVariant::Instagram);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("adwizard/config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = write_toml(
            r#"
[service]
api_key = "file-key"
images_url = "http://localhost:9000/images"
image_size = "512x512"
timeout_secs = 30

[wizard]
template = "story"
"#,
        );

        let config = assert_ok!(load_config_with_env(Some(file.path().to_path_buf()), no_env));
        assert_eq!(config.service.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.service.images_url, "http://localhost:9000/images");
        assert_eq!(config.service.completions_url, DEFAULT_COMPLETIONS_URL);
        assert_eq!(config.service.image_size, "512x512");
        assert_eq!(config.service.timeout, Duration::from_secs(30));
        assert_eq!(config.template, TemplateVariant::Story);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_missing_file_graceful() {
        let config = load_config_with_env(
            Some(PathBuf::from("/nonexistent/adwizard/config.toml")),
            no_env,
        )
        .unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_toml("[service\napi_key = ");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_template_rejected() {
        let file = write_toml("[wizard]\ntemplate = \"billboard\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[service]\napi_key = \"file-key\"\n\n[wizard]\ntemplate = \"story\"\n");
        let env = env_from(&[
            ("ADWIZARD_API_KEY", "env-key"),
            ("ADWIZARD_TEMPLATE", "twitter"),
        ]);

        let config = assert_ok!(load_config_with_env(Some(file.path().to_path_buf()), env));
        assert_eq!(config.service.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.template, TemplateVariant::Twitter);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_openai_key_fallback() {
        let env = env_from(&[("OPENAI_API_KEY", "sk-fallback")]);
        let config = assert_ok!(load_config_with_env(None, env));
        assert_eq!(config.service.api_key.as_deref(), Some("sk-fallback"));

        let env = env_from(&[("OPENAI_API_KEY", "sk-fallback"), ("ADWIZARD_API_KEY", "sk-own")]);
        let config = assert_ok!(load_config_with_env(None, env));
        assert_eq!(config.service.api_key.as_deref(), Some("sk-own"));
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let env = env_from(&[("ADWIZARD_API_KEY", "  ")]);
        let config = assert_ok!(load_config_with_env(None, env));
        assert_eq!(config.service.api_key, None);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_bad_timeout_env() {
        let env = env_from(&[("ADWIZARD_TIMEOUT_SECS", "soon")]);
        assert!(matches!(
            load_config_with_env(None, env),
            Err(ConfigError::ValidationError(_))
        ));

        let env = env_from(&[("ADWIZARD_TIMEOUT_SECS", "0")]);
        assert!(load_config_with_env(None, env).is_err());
    }

    #[test]
    fn test_with_base_url() {
        let service = ServiceConfig::with_base_url("http://127.0.0.1:8080/").with_api_key("k");
        assert_eq!(
            service.completions_url,
            "http://127.0.0.1:8080/v1/engines/davinci/completions"
        );
        assert_eq!(service.images_url, "http://127.0.0.1:8080/v1/images/generations");
        assert_eq!(service.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
