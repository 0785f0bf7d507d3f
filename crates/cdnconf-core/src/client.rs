//! Client facade
//!
//! A [`Client`] owns one shared [`Transport`] and hands out typed clients for
//! each resource kind. It is cheap to clone and safe to share across tasks;
//! it holds no state besides the transport.
//!
//! ```rust,ignore
//! let client = Client::new(transport);
//! let version = client.versions().create("svc").await?;
//! let domains = client.domains().list("svc", &version.key()).await?;
//! ```

use crate::kinds::{Domain, S3};
use crate::resource::ResourceClient;
use crate::traits::{Resource, Transport};
use crate::version::VersionClient;
use std::sync::Arc;

/// Entry point for every API operation
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl Client {
    /// Create a client over a transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client from a boxed transport (as returned by a factory)
    pub fn from_boxed(transport: Box<dyn Transport>) -> Self {
        Self {
            transport: Arc::from(transport),
        }
    }

    /// Create a client sharing an existing transport
    pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Operations for any resource kind
    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(Arc::clone(&self.transport))
    }

    /// Domain operations
    pub fn domains(&self) -> ResourceClient<Domain> {
        self.resource()
    }

    /// S3 logging endpoint operations
    pub fn s3s(&self) -> ResourceClient<S3> {
        self.resource()
    }

    /// Version operations
    pub fn versions(&self) -> VersionClient {
        VersionClient::new(Arc::clone(&self.transport))
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }
}
