//! Client configuration for the hosted flow service.
//!
//! A [`FlowConfig`] is loaded once at startup, from a YAML file and the
//! environment, and never changes afterwards.  The application token is the
//! only secret; it is read from `FLOWCHAT_APPLICATION_TOKEN` or, failing that,
//! from the file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Tweaks;

/// Default host of the hosted flow service.
pub const DEFAULT_BASE_URL: &str = "https://api.langflow.astra.datastax.com";

/// Default versioned path between the base URL and the endpoint id.
pub const DEFAULT_RUN_PATH: &str = "api/v1/run";

/// Default transport timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable holding the application token.
pub const TOKEN_ENV: &str = "FLOWCHAT_APPLICATION_TOKEN";

/// Environment variable overriding `base_url`.
pub const BASE_URL_ENV: &str = "FLOWCHAT_BASE_URL";

/// Environment variable overriding `endpoint`.
pub const ENDPOINT_ENV: &str = "FLOWCHAT_ENDPOINT";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_run_path() -> String {
    DEFAULT_RUN_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration for talking to one hosted flow.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Scheme and host of the flow service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Versioned service path, e.g. `lf/<project-id>/api/v1/run`.
    #[serde(default = "default_run_path")]
    pub run_path: String,

    /// Endpoint id (or flow id) of the flow to run.
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token used to authenticate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_token: Option<String>,

    /// Fixed overrides sent with every request.
    #[serde(default)]
    pub tweaks: Tweaks,

    /// Transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for FlowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowConfig")
            .field("base_url", &self.base_url)
            .field("run_path", &self.run_path)
            .field("endpoint", &self.endpoint)
            .field(
                "application_token",
                &self.application_token.as_ref().map(|_| "<redacted>"),
            )
            .field("tweaks", &self.tweaks)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl FlowConfig {
    /// Creates a configuration for `endpoint` with every other value defaulted.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            run_path: default_run_path(),
            endpoint: endpoint.into(),
            application_token: None,
            tweaks: Tweaks::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::io(
                format!("failed to read configuration file {}", path.display()),
                err,
            )
        })?;
        Self::from_yaml(&content)
    }

    /// Applies overrides from a variable lookup (normally the process environment).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(token) = non_empty(TOKEN_ENV) {
            self.application_token = Some(token);
        }
        if let Some(base_url) = non_empty(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(endpoint) = non_empty(ENDPOINT_ENV) {
            self.endpoint = endpoint;
        }
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the versioned run path.
    pub fn with_run_path(mut self, run_path: impl Into<String>) -> Self {
        self.run_path = run_path.into();
        self
    }

    /// Sets the endpoint id.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the application token.
    pub fn with_application_token(mut self, token: impl Into<String>) -> Self {
        self.application_token = Some(token.into());
        self
    }

    /// Sets the fixed tweak set.
    pub fn with_tweaks(mut self, tweaks: Tweaks) -> Self {
        self.tweaks = tweaks;
        self
    }

    /// Sets the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// The transport timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The application token, or an authentication error when it is absent.
    pub fn token(&self) -> Result<&str> {
        self.application_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::authentication(format!(
                    "application token not configured; set {TOKEN_ENV} or application_token"
                ))
            })
    }

    /// Checks that everything needed to contact the service is present.
    pub fn validated(self) -> Result<Self> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::configuration(
                format!("no flow endpoint configured; set {ENDPOINT_ENV} or endpoint"),
                Some("endpoint".to_string()),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration(
                "base_url must not be empty",
                Some("base_url".to_string()),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration(
                "timeout_secs must be positive",
                Some("timeout_secs".to_string()),
            ));
        }
        self.token()?;
        Ok(self)
    }
}
