use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main import configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-agent strings rotated across fetch attempts
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
    /// Video pipeline configuration
    #[serde(default)]
    pub video: VideoConfig,
}

/// Configuration for the video transcript/chapter pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct VideoConfig {
    /// Base URL for the watch-page host and its transcript endpoints.
    /// Overridable so tests can stand in a local server.
    #[serde(default = "default_video_api_base")]
    pub api_base: String,
    /// Number of attempts against the transcript endpoint before falling
    /// back to the next acquisition method
    #[serde(default = "default_transcript_retries")]
    pub transcript_retries: u32,
    /// Base delay between transcript retries in milliseconds; the delay
    /// increases linearly with the attempt number
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Client identification sent to the transcript endpoint
    #[serde(default = "default_client_name")]
    pub client_name: String,
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            api_base: default_video_api_base(),
            transcript_retries: default_transcript_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agents: default_user_agents(),
            video: VideoConfig::default(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15".to_string(),
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
    ]
}

fn default_video_api_base() -> String {
    "https://www.youtube.com".to_string()
}

fn default_transcript_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_client_name() -> String {
    "WEB".to_string()
}

fn default_client_version() -> String {
    "2.20240101.00.00".to_string()
}

impl ImportConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MISE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MISE__VIDEO__API_BASE
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: MISE__VIDEO__API_BASE
            .add_source(
                Environment::with_prefix("MISE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
