use serde::Deserialize;

/// Which callbacks the result endpoint accepts.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallbackPolicy {
    /// Accept a callback for any well-formed job id.
    #[default]
    Open,
    /// Only accept callbacks for ids minted by this service, which records a
    /// `queued` result for every submission.
    Reserved,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Automation webhook that performs the generation work. Required.
    #[serde(alias = "n8n_webhook_url")]
    pub webhook_url: String,

    /// Timeout for the outbound webhook call, in seconds.
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,

    /// PostgreSQL connection string. Enables the relational result tier.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Directory holding one `<job_id>.json` file per result.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    #[serde(default = "default_true")]
    pub file_store_enabled: bool,

    /// Base URL of a read-only result host serving `<job_id>.json`.
    #[serde(default)]
    pub result_base_url: Option<String>,

    #[serde(default)]
    pub callback_policy: CallbackPolicy,

    /// Request body cap; reference images arrive inline as data URLs.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_webhook_timeout_secs() -> u64 {
    30
}

fn default_results_dir() -> String {
    "public/results".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config: Self = envy::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from explicit `(NAME, value)` pairs instead of the process environment.
    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url(&self.webhook_url)?;
        if let Some(base) = &self.result_base_url {
            check_http_url(base)?;
        }
        Ok(())
    }
}

fn check_http_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let url = reqwest::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other:?}"))),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment configuration error: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
