use serde::Deserialize;

/// Main configuration structure for Stacksight
///
/// Every section has defaults, so a missing or partial config file still
/// yields a runnable service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub lookup: LookupConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port the API listens on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Analysis behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fixed delay before background work starts (milliseconds)
    #[serde(rename = "pacing-delay-ms")]
    pub pacing_delay_ms: u64,

    /// Upper bound on the link-counting page fetch (seconds)
    #[serde(rename = "link-timeout-secs")]
    pub link_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: 1000,
            link_timeout_secs: 10,
        }
    }
}

/// Technology lookup API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the technology lookup API
    pub endpoint: String,

    /// API key; when empty, mock technology data is served instead
    #[serde(rename = "api-key")]
    pub api_key: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.builtwith.com/free1/api.json".to_string(),
            api_key: String::new(),
        }
    }
}
