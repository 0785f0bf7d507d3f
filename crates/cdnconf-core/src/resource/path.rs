//! Addressing rules shared by every resource request
//!
//! Validation is local and ordered: service, then version, then name. A
//! caller missing several fields always gets the first one in that order.

use crate::error::{Error, Result};

/// Require a non-empty service
pub(crate) fn require_service(service: &str) -> Result<()> {
    if service.is_empty() {
        return Err(Error::MissingService);
    }
    Ok(())
}

/// Require a non-empty service and version
pub(crate) fn require_scope(service: &str, version: &str) -> Result<()> {
    require_service(service)?;
    if version.is_empty() {
        return Err(Error::MissingVersion);
    }
    Ok(())
}

/// Require a non-empty service, version and name
pub(crate) fn require_member(service: &str, version: &str, name: &str) -> Result<()> {
    require_scope(service, version)?;
    if name.is_empty() {
        return Err(Error::MissingName);
    }
    Ok(())
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// `/service/{service}/version`
pub(crate) fn versions_path(service: &str) -> String {
    format!("/service/{}/version", segment(service))
}

/// `/service/{service}/version/{version}`
pub(crate) fn version_path(service: &str, version: &str) -> String {
    format!("{}/{}", versions_path(service), segment(version))
}

/// `/service/{service}/version/{version}/{kind}`
pub(crate) fn collection_path(service: &str, version: &str, kind_path: &str) -> String {
    format!("{}/{}", version_path(service, version), kind_path)
}

/// `/service/{service}/version/{version}/{kind}/{name}`
pub(crate) fn member_path(service: &str, version: &str, kind_path: &str, name: &str) -> String {
    format!(
        "{}/{}",
        collection_path(service, version, kind_path),
        segment(name)
    )
}
