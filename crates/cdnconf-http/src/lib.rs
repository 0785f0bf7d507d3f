// # HTTP Transport
//
// This crate provides the reqwest-backed `Transport` for the cdnconf client.
//
// ## Behavior
//
// - ✅ One HTTP request per `send` call
// - ✅ API key sent in the `Fastly-Key` header
// - ✅ Create/update fields sent as `application/x-www-form-urlencoded`
// - ✅ HTTP timeout configured from `ClientConfig` (default 30 seconds)
// - ✅ Every response returned as-is; status decoding happens in `cdnconf-core`
// - ❌ NO retry logic
// - ❌ NO backoff logic
// - ❌ NO caching
//
// ## Security Requirements
//
// - API key NEVER appears in logs or Debug output
// - Error bodies are truncated and stripped of control characters before logging
// - Construction fails fast if the key is empty

use async_trait::async_trait;
use cdnconf_core::{
    ApiRequest, ApiResponse, Client, ClientConfig, Error, Method, Result, Transport,
    TransportFactory,
};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Header carrying the API key (header names are case-insensitive)
pub const API_KEY_HEADER: &str = "fastly-key";

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters for logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!(
            "{}... [truncated, {} bytes total]",
            &body[..cut],
            body.len()
        ),
        None => body.to_string(),
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP transport for the configuration API
pub struct HttpTransport {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client with the key, Accept header and timeout baked in
    client: reqwest::Client,

    timeout: Duration,
}

// Custom Debug implementation; the key lives only inside the client's default headers
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid or the key cannot be
    /// sent as a header value.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::config("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
            timeout,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::transport(format!("request timed out after {:?}", self.timeout))
        } else if err.is_connect() {
            Error::transport(format!("connection failed: {}", err))
        } else {
            Error::transport(format!("HTTP request failed: {}", err))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e)))?;

        if !(200..300).contains(&status) {
            tracing::debug!(
                "{} {} -> {}: {}",
                request.method,
                request.path,
                status,
                sanitize_for_log(&body)
            );
        }

        Ok(ApiResponse::new(status, body))
    }

    fn transport_name(&self) -> &'static str {
        "http"
    }
}

/// Factory for creating HTTP transports
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    fn create(&self, config: &ClientConfig) -> Result<Box<dyn Transport>> {
        Ok(Box::new(HttpTransport::new(config)?))
    }
}

/// Build a `Client` talking HTTP with the given configuration
pub fn connect(config: &ClientConfig) -> Result<Client> {
    Ok(Client::new(HttpTransport::new(config)?))
}
