// # Transport Trait
//
// Defines the seam between request construction and the wire.
//
// ## Implementations
//
// - HTTP (reqwest): `cdnconf-http` crate
// - Test doubles: `tests/common` in this crate
//
// ## Contract
//
// A transport sends exactly one request per call and returns the response
// whatever its status. Decoding the status and body is the caller's job.
// Connection failures and timeouts are returned as `Error::Transport`.
// Transports never retry.

use async_trait::async_trait;

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against the API, relative to the configured base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute path, already percent-encoded (e.g. `/service/abc/version/1/domain`)
    pub path: String,
    /// Form fields sent as `application/x-www-form-urlencoded` (empty = no body)
    pub form: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request without a body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            form: Vec::new(),
        }
    }

    /// Attach form fields
    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }

    /// Value of a form field, if present
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
/// A single transport is shared by every resource client of a `Client`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the response
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: A response was received (any status)
    /// - `Err(Error::Transport)`: No response was received
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}

/// Helper trait for constructing transports from configuration
pub trait TransportFactory: Send + Sync {
    /// Create a Transport instance from configuration
    fn create(
        &self,
        config: &crate::config::ClientConfig,
    ) -> Result<Box<dyn Transport>, crate::Error>;
}
