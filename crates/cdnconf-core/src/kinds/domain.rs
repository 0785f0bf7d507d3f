// # Domain
//
// A hostname attached to a service version. The name is the identifier for
// get/update/delete and is unique within the version.
//
// ## API Reference
//
// - List: GET `/service/:service/version/:version/domain`
// - Create: POST `/service/:service/version/:version/domain`
// - Get / Update / Delete: GET, PUT, DELETE `/service/:service/version/:version/domain/:name`

use crate::resource::codec::{lenient_u32, string_or_null};
use crate::traits::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A domain record as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Owning service
    #[serde(default, deserialize_with = "string_or_null")]
    pub service_id: String,

    /// Owning version number
    #[serde(default, deserialize_with = "lenient_u32")]
    pub version: u32,

    /// Hostname
    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,

    /// Free-text comment
    #[serde(default, deserialize_with = "string_or_null")]
    pub comment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields sent when creating a domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainFields {
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl DomainFields {
    /// Create fields for a domain with the given hostname
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
        }
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Fields sent when updating a domain; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainChanges {
    /// New hostname (sent as `name`)
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl DomainChanges {
    /// No changes
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the domain
    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    /// Replace the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl Resource for Domain {
    const KIND: &'static str = "domain";
    const PATH: &'static str = "domain";

    type Fields = DomainFields;
    type Changes = DomainChanges;

    fn name(&self) -> &str {
        &self.name
    }
}
