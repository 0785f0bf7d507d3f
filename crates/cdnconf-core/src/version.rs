//! Service versions
//!
//! Every resource lives inside a version, and a version must exist before
//! anything can be created under it. Resource operations never create or
//! delete versions; this module is the explicit way to do so.
//!
//! ## Concurrency
//!
//! The remote service does not cope with concurrent version creation for the
//! same service. Callers that create versions from several tasks must
//! serialize those calls themselves (a `tokio::sync::Mutex` is enough).

use crate::error::Result;
use crate::resource::codec::{lenient_u32, string_or_null};
use crate::resource::{decode, execute, path};
use crate::traits::{ApiRequest, Method, Transport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A configuration snapshot of a service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Version number, unique within the service
    #[serde(default, deserialize_with = "lenient_u32")]
    pub number: u32,

    #[serde(default, deserialize_with = "string_or_null")]
    pub service_id: String,

    /// Whether this version is serving traffic
    #[serde(default)]
    pub active: bool,

    /// Locked versions can no longer be edited
    #[serde(default)]
    pub locked: bool,

    #[serde(default, deserialize_with = "string_or_null")]
    pub comment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Version {
    /// The number in the string form used to address resources
    pub fn key(&self) -> String {
        self.number.to_string()
    }
}

/// Version operations for a service
#[derive(Clone)]
pub struct VersionClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for VersionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionClient")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl VersionClient {
    /// Create a version client over a shared transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// List every version of a service
    pub async fn list(&self, service: &str) -> Result<Vec<Version>> {
        path::require_service(service)?;

        let request = ApiRequest::new(Method::Get, path::versions_path(service));
        let response = execute(self.transport.as_ref(), request).await?;
        decode("version", &response)
    }

    /// Fetch one version
    pub async fn get(&self, service: &str, version: &str) -> Result<Version> {
        path::require_scope(service, version)?;

        let request = ApiRequest::new(Method::Get, path::version_path(service, version));
        let response = execute(self.transport.as_ref(), request).await?;
        decode("version", &response)
    }

    /// Create a new, empty draft version
    pub async fn create(&self, service: &str) -> Result<Version> {
        path::require_service(service)?;

        let request = ApiRequest::new(Method::Post, path::versions_path(service));
        let response = execute(self.transport.as_ref(), request).await?;
        let version: Version = decode("version", &response)?;

        info!("Created version {} of service {}", version.number, service);
        Ok(version)
    }
}
