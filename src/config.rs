//! Configuration for reaching the remote points API.

/// The default base URL of the remote points API.
pub const DEFAULT_REMOTE_API_URL: &str = "http://localhost:5140";

/// Settings for the reqwest-backed store adapters.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteApiConfig {
    /// The base URL of the remote API, without a trailing slash.
    pub base_url: String,
    /// The bearer token attached to every request, if the remote API
    /// requires one.
    pub bearer_token: Option<String>,
}

impl Default for RemoteApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_API_URL.to_owned(),
            bearer_token: None,
        }
    }
}

impl RemoteApiConfig {
    /// Create a config pointing at `base_url`. A trailing slash is trimmed
    /// so endpoint paths can be appended directly.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();

        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Read the config from the environment.
    ///
    /// `LUKA_API_URL` overrides the base URL and `LUKA_API_TOKEN` supplies
    /// the bearer token; both fall back to the defaults when unset.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("LUKA_API_URL") {
            Ok(base_url) => Self::new(base_url),
            Err(_) => Self::default(),
        };

        if let Ok(token) = std::env::var("LUKA_API_TOKEN") {
            config.bearer_token = Some(token);
        }

        config
    }
}
