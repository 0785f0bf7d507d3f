//! Generic CRUD client for resources nested under a service version
//!
//! Every operation follows the same three steps:
//!
//! 1. Validate the address (service, version, name) locally
//! 2. Build an [`ApiRequest`] and send it through the shared [`Transport`]
//! 3. Decode the JSON response, or the error body into [`Error::Remote`]
//!
//! A failed validation never reaches the transport.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let domains = client.domains();
//! let created = domains
//!     .create("svc", "3", &DomainFields::new("www.example.com"))
//!     .await?;
//! let renamed = domains
//!     .update("svc", "3", &created.name, &DomainChanges::new().rename("example.com"))
//!     .await?;
//! domains.delete("svc", "3", &renamed.name).await?;
//! ```

pub mod codec;
pub(crate) mod path;

use crate::error::{Error, Result};
use crate::traits::{ApiRequest, ApiResponse, Method, Resource, Transport};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CRUD operations for one resource kind
pub struct ResourceClient<R: Resource> {
    transport: Arc<dyn Transport>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _kind: PhantomData,
        }
    }
}

impl<R: Resource> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("kind", &R::KIND)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    /// Create a resource client over a shared transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _kind: PhantomData,
        }
    }

    /// List every record of this kind in a version, in server order
    ///
    /// # Errors
    ///
    /// `MissingService`, `MissingVersion`, or any remote/transport error.
    pub async fn list(&self, service: &str, version: &str) -> Result<Vec<R>> {
        path::require_scope(service, version)?;

        let request = ApiRequest::new(
            Method::Get,
            path::collection_path(service, version, R::PATH),
        );
        let response = execute(self.transport.as_ref(), request).await?;
        let records: Vec<R> = decode(R::KIND, &response)?;

        debug!("Listed {} {} record(s)", records.len(), R::KIND);
        Ok(records)
    }

    /// Fetch one record by name
    ///
    /// # Errors
    ///
    /// `MissingService`, `MissingVersion`, `MissingName`, or a remote error
    /// (kind `NotFound` when the name does not resolve).
    pub async fn get(&self, service: &str, version: &str, name: &str) -> Result<R> {
        path::require_member(service, version, name)?;

        let request = ApiRequest::new(
            Method::Get,
            path::member_path(service, version, R::PATH, name),
        );
        let response = execute(self.transport.as_ref(), request).await?;
        decode(R::KIND, &response)
    }

    /// Create a record and return it as echoed by the server
    ///
    /// Only the service and version are checked locally; the name inside
    /// `fields` is left to the server.
    pub async fn create(&self, service: &str, version: &str, fields: &R::Fields) -> Result<R> {
        path::require_scope(service, version)?;

        let request = ApiRequest::new(
            Method::Post,
            path::collection_path(service, version, R::PATH),
        )
        .with_form(codec::form_pairs(fields)?);
        let response = execute(self.transport.as_ref(), request).await?;
        let created: R = decode(R::KIND, &response)?;

        info!(
            "Created {} '{}' (service={}, version={})",
            R::KIND,
            created.name(),
            service,
            version
        );
        Ok(created)
    }

    /// Update a record, returning the updated record
    ///
    /// A rename in `changes` moves the record: later calls must use the new
    /// name and the old one no longer resolves.
    pub async fn update(
        &self,
        service: &str,
        version: &str,
        name: &str,
        changes: &R::Changes,
    ) -> Result<R> {
        path::require_member(service, version, name)?;

        let request = ApiRequest::new(
            Method::Put,
            path::member_path(service, version, R::PATH, name),
        )
        .with_form(codec::form_pairs(changes)?);
        let response = execute(self.transport.as_ref(), request).await?;
        let updated: R = decode(R::KIND, &response)?;

        if updated.name() != name {
            info!("Renamed {} '{}' -> '{}'", R::KIND, name, updated.name());
        } else {
            info!("Updated {} '{}'", R::KIND, name);
        }
        Ok(updated)
    }

    /// Delete a record
    ///
    /// Deleting a name that does not exist returns the server's not-found as
    /// a remote error (`Error::is_not_found`), never a validation error.
    pub async fn delete(&self, service: &str, version: &str, name: &str) -> Result<()> {
        path::require_member(service, version, name)?;

        let request = ApiRequest::new(
            Method::Delete,
            path::member_path(service, version, R::PATH, name),
        );
        let response = execute(self.transport.as_ref(), request).await?;
        expect_status_ok(R::KIND, &response)?;

        info!("Deleted {} '{}'", R::KIND, name);
        Ok(())
    }
}

/// Send a request and turn non-success statuses into remote errors
pub(crate) async fn execute(transport: &dyn Transport, request: ApiRequest) -> Result<ApiResponse> {
    let method = request.method;
    let path = request.path.clone();

    debug!("{} {} via {}", method, path, transport.transport_name());

    let response = transport.send(request).await?;

    if !response.is_success() {
        let err = Error::from_response(response.status, &response.body);
        warn!("{} {} failed: {}", method, path, err);
        return Err(err);
    }

    Ok(response)
}

/// Decode a success body
pub(crate) fn decode<T: DeserializeOwned>(kind: &str, response: &ApiResponse) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        Error::unexpected(format!("failed to decode {} response: {}", kind, e))
    })
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

/// Check a `{"status": "ok"}` acknowledgement
///
/// An empty body (204) counts as success.
fn expect_status_ok(kind: &str, response: &ApiResponse) -> Result<()> {
    if response.body.trim().is_empty() {
        return Ok(());
    }

    let body: StatusBody = decode(kind, response)?;
    if body.status != "ok" {
        return Err(Error::unexpected(format!(
            "{} delete was not acknowledged: status {:?}",
            kind, body.status
        )));
    }
    Ok(())
}
