use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde_json::Value;
use url::Url;

use crate::client_logger::FlowLogger;
use crate::config::FlowConfig;
use crate::error::{Error, Result};
use crate::observability::{
    FLOW_PARSE_ERRORS, FLOW_REQUEST_DURATION, FLOW_REQUESTS, FLOW_STATUS_ERRORS,
    FLOW_TRANSPORT_ERRORS,
};
use crate::types::{FlowRequest, IoType, Tweaks};

/// Something that can run one message through a hosted flow.
///
/// [`FlowClient`] is the real implementation; the chat session only depends
/// on this trait.
#[async_trait::async_trait]
pub trait FlowRunner: Send + Sync {
    /// Run `message` through the flow with the given tweaks and return the raw
    /// JSON response.
    async fn run(&self, message: &str, tweaks: Option<&Tweaks>) -> Result<Value>;

    /// The endpoint this runner targets, for display.
    fn endpoint(&self) -> &str;
}

/// Client for a hosted flow-execution service.
///
/// Each call is a single POST: no retries, no caching.
#[derive(Clone)]
pub struct FlowClient {
    application_token: String,
    client: ReqwestClient,
    base_url: String,
    run_path: String,
    endpoint: String,
    timeout: Duration,
    logger: Option<Arc<dyn FlowLogger>>,
}

impl fmt::Debug for FlowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowClient")
            .field("base_url", &self.base_url)
            .field("run_path", &self.run_path)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl FlowClient {
    /// Create a new client from a loaded configuration.
    ///
    /// Fails with an authentication error when the configuration carries no
    /// application token.
    pub fn new(config: &FlowConfig) -> Result<Self> {
        Self::with_timeout(config, config.timeout())
    }

    /// Create a new client with a transport timeout other than the configured one.
    pub fn with_timeout(config: &FlowConfig, timeout: Duration) -> Result<Self> {
        let application_token = config.token()?.to_string();
        HeaderValue::from_str(&format!("Bearer {application_token}")).map_err(|_| {
            Error::authentication("application token contains characters not allowed in a header")
        })?;

        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            application_token,
            client,
            base_url: config.base_url.clone(),
            run_path: config.run_path.clone(),
            endpoint: config.endpoint.clone(),
            timeout,
            logger: None,
        })
    }

    /// Install a logger that observes every request.
    pub fn with_logger(mut self, logger: Arc<dyn FlowLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The transport timeout in effect.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the run URL for `endpoint`.
    ///
    /// Each non-empty piece of the run path is appended to the base URL's
    /// path, followed by the endpoint as a single percent-encoded segment.
    /// A base URL with a query or fragment is rejected.
    pub fn run_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.base_url.trim();
        let mut url = Url::parse(base)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::url(
                format!("unsupported URL scheme {:?} in {base}", url.scheme()),
                None,
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::url(
                format!("base URL must not carry a query or fragment: {base}"),
                None,
            ));
        }
        let endpoint = endpoint.trim().trim_matches('/');
        if endpoint.is_empty() {
            return Err(Error::url("endpoint id must not be empty", None));
        }

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::url(format!("base URL cannot carry a path: {base}"), None))?;
            segments.pop_if_empty();
            for piece in self.run_path.split('/').map(str::trim) {
                if !piece.is_empty() {
                    segments.push(piece);
                }
            }
            segments.push(endpoint);
        }
        Ok(url)
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.application_token))
            .map_err(|_| Error::authentication("application token is not a valid header value"))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Convert a non-success response into an error.
    ///
    /// The message is taken from a JSON body's `detail`, `message` or `error`
    /// field when one is present, and from the raw body otherwise.
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed = serde_json::from_str::<Value>(&error_body).ok();
        let from_json = parsed.as_ref().and_then(|body| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| body.get(*key))
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
        });
        let message = match from_json {
            Some(message) => message,
            None if !error_body.trim().is_empty() => error_body,
            None => status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string(),
        };

        Error::api(status_code, message)
    }

    /// Run a flow with a given message and optional tweaks.
    ///
    /// `tweaks` is only sent when present and non-empty.
    pub async fn run_flow(
        &self,
        message: &str,
        endpoint: &str,
        output_type: IoType,
        input_type: IoType,
        tweaks: Option<&Tweaks>,
    ) -> Result<Value> {
        let request = FlowRequest::new(message)
            .with_output_type(output_type)
            .with_input_type(input_type)
            .with_tweaks(tweaks.cloned());
        self.send(endpoint, &request).await
    }

    /// Send a prepared request to `endpoint` and return the parsed JSON body.
    pub async fn send(&self, endpoint: &str, request: &FlowRequest) -> Result<Value> {
        let url = self.run_url(endpoint)?;
        if let Some(logger) = &self.logger {
            logger.log_request(url.as_str(), request);
        }

        FLOW_REQUESTS.click();
        let start = Instant::now();
        let result = self.post(url, request).await;
        FLOW_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(body) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(body);
                }
            }
            Err(err) => {
                if err.is_transport() {
                    FLOW_TRANSPORT_ERRORS.click();
                } else if err.is_status() {
                    FLOW_STATUS_ERRORS.click();
                } else if err.is_serialization() {
                    FLOW_PARSE_ERRORS.click();
                }
                if let Some(logger) = &self.logger {
                    logger.log_error(err);
                }
            }
        }
        result
    }

    async fn post(&self, url: Url, request: &FlowRequest) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(e.to_string(), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Timed out reading response: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else {
                Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
            }
        })?;

        serde_json::from_str::<Value>(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl FlowRunner for FlowClient {
    async fn run(&self, message: &str, tweaks: Option<&Tweaks>) -> Result<Value> {
        self.run_flow(message, &self.endpoint, IoType::Chat, IoType::Chat, tweaks)
            .await
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FlowConfig {
        FlowConfig::new("mark_cristalli").with_application_token("test-token")
    }

    #[test]
    fn test_client_creation() {
        let client = FlowClient::new(&config()).unwrap();
        assert_eq!(client.application_token, "test-token");
        assert_eq!(client.endpoint, "mark_cristalli");
        assert_eq!(client.timeout(), Duration::from_secs(60));

        let client = FlowClient::with_timeout(&config(), Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn creation_requires_token() {
        let err = FlowClient::new(&FlowConfig::new("flow")).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let config = FlowConfig::new("flow").with_application_token("bad\ntoken");
        let err = FlowClient::new(&config).unwrap_err();
        assert!(err.is_authentication());
    }

    #[test]
    fn run_url_default_path() {
        let client = FlowClient::new(&config()).unwrap();
        assert_eq!(
            client.run_url("mark_cristalli").unwrap().as_str(),
            "https://api.langflow.astra.datastax.com/api/v1/run/mark_cristalli"
        );
    }

    #[test]
    fn run_url_normalizes_slashes() {
        let config = config()
            .with_base_url("https://flows.example.com/")
            .with_run_path("/lf/cd71f509-33bf-4839-9b28-c8ecef44c7ee/api/v1/run/");
        let client = FlowClient::new(&config).unwrap();
        assert_eq!(
            client.run_url("/my_flow").unwrap().as_str(),
            "https://flows.example.com/lf/cd71f509-33bf-4839-9b28-c8ecef44c7ee/api/v1/run/my_flow"
        );
    }

    #[test]
    fn run_url_with_empty_run_path() {
        let config = config()
            .with_base_url("http://127.0.0.1:7860/run")
            .with_run_path("");
        let client = FlowClient::new(&config).unwrap();
        assert_eq!(
            client.run_url("flow").unwrap().as_str(),
            "http://127.0.0.1:7860/run/flow"
        );
    }

    #[test]
    fn run_url_rejects_bad_base() {
        let client = FlowClient::new(&config().with_base_url("not a url")).unwrap();
        assert!(matches!(client.run_url("flow"), Err(Error::Url { .. })));

        let client = FlowClient::new(&config().with_base_url("ftp://example.com")).unwrap();
        assert!(matches!(client.run_url("flow"), Err(Error::Url { .. })));
    }

    #[test]
    fn run_url_escapes_endpoint() {
        let client = FlowClient::new(&config()).unwrap();
        assert_eq!(
            client.run_url("a#b").unwrap().as_str(),
            "https://api.langflow.astra.datastax.com/api/v1/run/a%23b"
        );
        let url = client.run_url("a?b").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.langflow.astra.datastax.com/api/v1/run/a%3Fb"
        );
        assert!(url.query().is_none());
    }

    #[test]
    fn run_url_rejects_base_with_query_or_fragment() {
        let client = FlowClient::new(&config().with_base_url("https://h.example.com/?x=1")).unwrap();
        assert!(matches!(client.run_url("flow"), Err(Error::Url { .. })));

        let client = FlowClient::new(&config().with_base_url("https://h.example.com/#top")).unwrap();
        assert!(matches!(client.run_url("flow"), Err(Error::Url { .. })));
    }

    #[test]
    fn run_url_rejects_empty_endpoint() {
        let client = FlowClient::new(&config()).unwrap();
        assert!(matches!(client.run_url(" / "), Err(Error::Url { .. })));
    }

    #[test]
    fn headers_carry_bearer_token() {
        let client = FlowClient::new(&config()).unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer test-token");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn runner_reports_endpoint() {
        let client = FlowClient::new(&config()).unwrap();
        assert_eq!(FlowRunner::endpoint(&client), "mark_cristalli");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let config = config().with_base_url("http://127.0.0.1:1");
        let client = FlowClient::new(&config).unwrap();
        let err = client.run("Hello", None).await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
        let text = err.to_string();
        assert!(text.matches("Connection error:").count() <= 1, "{text}");
    }
}
