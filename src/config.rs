use crate::cli::{Cli, OutputFormat, VerbosityLevel};
use crate::submit::TransportConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which reply shape to expect from the validation service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Structured XML/SOAP reply
    Soap,
    /// Scraped HTML report page
    Report,
    /// Sniff the reply body, preferring the structured form
    #[default]
    Auto,
}

impl ResponseFormat {
    /// True when the upload form should ask the service for the structured
    /// reply
    pub fn requests_structured(&self) -> bool {
        matches!(self, ResponseFormat::Soap | ResponseFormat::Auto)
    }
}

impl FromStr for ResponseFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "soap" => Ok(ResponseFormat::Soap),
            "report" => Ok(ResponseFormat::Report),
            "auto" => Ok(ResponseFormat::Auto),
            other => Err(ConfigError::Validation(format!(
                "Unknown response format: {other} (expected soap, report, or auto)"
            ))),
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseFormat::Soap => "soap",
            ResponseFormat::Report => "report",
            ResponseFormat::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Targets to validate, in submission order
    pub targets: Vec<String>,
    /// Message substrings to suppress
    pub ignore: Vec<String>,
    pub service: ServiceConfig,
    pub network: NetworkConfig,
    pub output: OutputConfig,
}

/// Validation service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Validator endpoint URL; empty means unset
    pub endpoint: String,
    /// Which reply shape to expect
    pub response_format: ResponseFormat,
    /// Fixed pause between submissions in milliseconds
    pub delay_ms: u64,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// Optional HTTP proxy host
    pub proxy_host: Option<String>,
    /// Optional HTTP proxy port
    pub proxy_port: Option<u16>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormatConfig,
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (failures only)
    pub quiet: bool,
}

/// Output format configuration (serializable version of CLI OutputFormat)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatConfig {
    Human,
    Json,
    Summary,
}

impl From<OutputFormat> for OutputFormatConfig {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputFormatConfig::Human,
            OutputFormat::Json => OutputFormatConfig::Json,
            OutputFormat::Summary => OutputFormatConfig::Summary,
        }
    }
}

impl From<OutputFormatConfig> for OutputFormat {
    fn from(format: OutputFormatConfig) -> Self {
        match format {
            OutputFormatConfig::Human => OutputFormat::Human,
            OutputFormatConfig::Json => OutputFormat::Json,
            OutputFormatConfig::Summary => OutputFormat::Summary,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            response_format: ResponseFormat::Auto,
            delay_ms: 1000,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            proxy_host: None,
            proxy_port: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormatConfig::Human,
            verbose: false,
            quiet: false,
        }
    }
}

impl OutputConfig {
    /// Effective verbosity level from the merged flags
    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        // Load from configuration file if specified
        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else {
            // Try to find configuration files in standard locations
            if let Some(found_config) = Self::find_config_file().await? {
                config = Self::merge_configs(config, found_config);
            }
        }

        // Apply environment variable overrides
        config = Self::apply_environment_overrides(config)?;

        // Apply CLI argument overrides (highest precedence)
        config = Self::merge_with_cli(config, cli);

        // Validate the final configuration
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let config: Config = toml::from_str(&content)?;
                Ok(config)
            }
            Some("json") => {
                let config: Config = serde_json::from_str(&content)?;
                Ok(config)
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    let config: Config = serde_json::from_str(&content)?;
                    Ok(config)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub async fn find_config_file() -> Result<Option<Config>> {
        let config_names = [
            "validate-markup.toml",
            "validate-markup.json",
            ".validate-markup.toml",
            ".validate-markup.json",
        ];

        // Check current directory first
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("validate-markup");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> Result<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        // Service settings
        if let Some(endpoint) = env.get("VALIDATE_MARKUP_ENDPOINT") {
            config.service.endpoint = endpoint;
        }

        if let Some(format) = env.get("VALIDATE_MARKUP_RESPONSE_FORMAT") {
            config.service.response_format = format.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid VALIDATE_MARKUP_RESPONSE_FORMAT value: {}",
                    format
                ))
            })?;
        }

        if let Some(delay) = env.get("VALIDATE_MARKUP_DELAY_MS") {
            config.service.delay_ms = delay.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid VALIDATE_MARKUP_DELAY_MS value: {}", delay))
            })?;
        }

        // Network settings
        if let Some(timeout) = env.get("VALIDATE_MARKUP_TIMEOUT") {
            config.network.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid VALIDATE_MARKUP_TIMEOUT value: {}", timeout))
            })?;
        }

        if let Some(proxy_host) = env.get("VALIDATE_MARKUP_PROXY_HOST") {
            config.network.proxy_host = Some(proxy_host);
        }

        if let Some(proxy_port) = env.get("VALIDATE_MARKUP_PROXY_PORT") {
            config.network.proxy_port = Some(proxy_port.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid VALIDATE_MARKUP_PROXY_PORT value: {}",
                    proxy_port
                ))
            })?);
        }

        // Output settings
        if let Some(verbose) = env.get("VALIDATE_MARKUP_VERBOSE") {
            config.output.verbose = verbose.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid VALIDATE_MARKUP_VERBOSE value: {}", verbose))
            })?;
        }

        if let Some(quiet) = env.get("VALIDATE_MARKUP_QUIET") {
            config.output.quiet = quiet.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid VALIDATE_MARKUP_QUIET value: {}", quiet))
            })?;
        }

        if let Some(format) = env.get("VALIDATE_MARKUP_FORMAT") {
            config.output.format = match format.to_lowercase().as_str() {
                "human" => OutputFormatConfig::Human,
                "json" => OutputFormatConfig::Json,
                "summary" => OutputFormatConfig::Summary,
                _ => {
                    return Err(ConfigError::Environment(format!(
                        "Invalid VALIDATE_MARKUP_FORMAT value: {}",
                        format
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence).
    /// Positional targets and `--ignore` patterns append to the configured
    /// lists rather than replacing them.
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if !cli.targets.is_empty() {
            config.targets.extend(cli.targets.iter().cloned());
        }
        if !cli.ignore.is_empty() {
            config.ignore.extend(cli.ignore.iter().cloned());
        }

        if let Some(endpoint) = &cli.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(format) = cli.response_format {
            config.service.response_format = format;
        }
        if let Some(delay_ms) = cli.delay_ms {
            config.service.delay_ms = delay_ms;
        }

        if let Some(timeout) = cli.timeout {
            config.network.timeout_seconds = timeout;
        }
        if let Some(proxy_host) = &cli.proxy_host {
            config.network.proxy_host = Some(proxy_host.clone());
        }
        if let Some(proxy_port) = cli.proxy_port {
            config.network.proxy_port = Some(proxy_port);
        }

        if let Some(format) = &cli.format {
            config.output.format = format.clone().into();
        }
        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }

        config
    }

    /// Merge two configurations (second takes precedence; empty lists and
    /// unset options in the override leave the base untouched)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        if !override_config.targets.is_empty() {
            base.targets = override_config.targets;
        }
        if !override_config.ignore.is_empty() {
            base.ignore = override_config.ignore;
        }

        if !override_config.service.endpoint.is_empty() {
            base.service.endpoint = override_config.service.endpoint;
        }
        base.service.response_format = override_config.service.response_format;
        base.service.delay_ms = override_config.service.delay_ms;

        base.network.timeout_seconds = override_config.network.timeout_seconds;
        if override_config.network.proxy_host.is_some() {
            base.network.proxy_host = override_config.network.proxy_host;
        }
        if override_config.network.proxy_port.is_some() {
            base.network.proxy_port = override_config.network.proxy_port;
        }

        base.output = override_config.output;

        base
    }

    /// Validate configuration values. An empty endpoint is allowed here; the
    /// runner reports it as the run's single error finding.
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.network.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if config.network.proxy_host.is_some() != config.network.proxy_port.is_some() {
            return Err(ConfigError::Validation(
                "Proxy host and port must be configured together".to_string(),
            ));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert configuration to Duration for the inter-request delay
    pub fn get_delay_duration(config: &Config) -> Duration {
        Duration::from_millis(config.service.delay_ms)
    }

    /// Convert configuration to Duration for network timeout
    pub fn get_timeout_duration(config: &Config) -> Duration {
        Duration::from_secs(config.network.timeout_seconds)
    }

    /// Transport settings for the submitter, taken from the network section
    pub fn get_transport_config(config: &Config) -> TransportConfig {
        TransportConfig {
            timeout_seconds: config.network.timeout_seconds,
            proxy_host: config.network.proxy_host.clone(),
            proxy_port: config.network.proxy_port,
            ..TransportConfig::default()
        }
    }
}
