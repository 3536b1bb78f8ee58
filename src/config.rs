use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Groq API key used for chat completions
    ///
    /// Optional at startup so the server can still come up; requests fail with a
    /// configuration error until it is set.
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_completion_api_url")]
    pub completion_api_url: String,

    /// Model identifier sent with every completion request
    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds a completion request may take before it is abandoned
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,

    /// Seconds a session may sit idle before it is evicted
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: i64,

    /// Most sessions held in memory at once
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_completion_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_completion_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_completion_timeout_secs() -> u64 {
    60
}

fn default_session_ttl_secs() -> i64 {
    crate::api::state::DEFAULT_SESSION_TTL_SECS
}

fn default_max_sessions() -> usize {
    crate::api::state::DEFAULT_MAX_SESSIONS
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The API key, treating a blank value as unset
    pub fn api_key(&self) -> Option<String> {
        self.groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }
}
