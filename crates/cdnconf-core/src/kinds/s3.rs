// # S3 Logging Endpoint
//
// Streams a version's access logs to an S3 bucket. Addressed like every
// other resource by `(service, version, name)`.
//
// ## API Reference
//
// - List: GET `/service/:service/version/:version/logging/s3`
// - Create: POST `/service/:service/version/:version/logging/s3`
// - Get / Update / Delete: GET, PUT, DELETE `/service/:service/version/:version/logging/s3/:name`
//
// ## Security
//
// `access_key` and `secret_key` are credentials. The Debug implementations
// below redact them; never log them.

use crate::resource::codec::{lenient_u8, lenient_u32, string_or_null};
use crate::traits::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An S3 logging endpoint as returned by the API
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3 {
    #[serde(default, deserialize_with = "string_or_null")]
    pub service_id: String,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub version: u32,

    #[serde(default, deserialize_with = "string_or_null")]
    pub name: String,

    /// Target bucket
    #[serde(default, deserialize_with = "string_or_null")]
    pub bucket_name: String,

    /// S3 host, when not the AWS default
    #[serde(default, deserialize_with = "string_or_null")]
    pub domain: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub access_key: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub secret_key: String,

    /// Key prefix inside the bucket
    #[serde(default, deserialize_with = "string_or_null")]
    pub path: String,

    /// Seconds between log file rotations
    #[serde(default, deserialize_with = "lenient_u32")]
    pub period: u32,

    /// Gzip compression level, 0 (off) to 9
    #[serde(default, deserialize_with = "lenient_u8")]
    pub gzip_level: u8,

    /// Log line template
    #[serde(default, deserialize_with = "string_or_null")]
    pub format: String,

    /// strftime pattern used in file names
    #[serde(default, deserialize_with = "string_or_null")]
    pub timestamp_format: String,

    /// Condition gating which responses are logged
    #[serde(default, deserialize_with = "string_or_null")]
    pub response_condition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for S3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3")
            .field("service_id", &self.service_id)
            .field("version", &self.version)
            .field("name", &self.name)
            .field("bucket_name", &self.bucket_name)
            .field("domain", &self.domain)
            .field("access_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("path", &self.path)
            .field("period", &self.period)
            .field("gzip_level", &self.gzip_level)
            .field("format", &self.format)
            .field("timestamp_format", &self.timestamp_format)
            .field("response_condition", &self.response_condition)
            .finish()
    }
}

/// Fields sent when creating an S3 endpoint
///
/// Empty strings and unset numbers are not sent, so the server applies its
/// own defaults.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct S3Fields {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bucket_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub access_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_level: Option<u8>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timestamp_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_condition: String,
}

impl std::fmt::Debug for S3Fields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Fields")
            .field("name", &self.name)
            .field("bucket_name", &self.bucket_name)
            .field("access_key", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("path", &self.path)
            .field("period", &self.period)
            .field("gzip_level", &self.gzip_level)
            .finish_non_exhaustive()
    }
}

impl S3Fields {
    /// Create fields for an endpoint with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = bucket_name.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set both halves of the AWS credential
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = access_key.into();
        self.secret_key = secret_key.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_gzip_level(mut self, gzip_level: u8) -> Self {
        self.gzip_level = Some(gzip_level);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_timestamp_format(mut self, timestamp_format: impl Into<String>) -> Self {
        self.timestamp_format = timestamp_format.into();
        self
    }

    pub fn with_response_condition(mut self, condition: impl Into<String>) -> Self {
        self.response_condition = condition.into();
        self
    }
}

/// Fields sent when updating an S3 endpoint; unset fields are left untouched
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct S3Changes {
    /// New endpoint name (sent as `name`)
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_condition: Option<String>,
}

impl std::fmt::Debug for S3Changes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<REDACTED>");
        f.debug_struct("S3Changes")
            .field("new_name", &self.new_name)
            .field("bucket_name", &self.bucket_name)
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("path", &self.path)
            .field("period", &self.period)
            .field("gzip_level", &self.gzip_level)
            .finish_non_exhaustive()
    }
}

impl S3Changes {
    /// No changes
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the endpoint
    pub fn rename(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    pub fn with_bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_period(mut self, period: u32) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_gzip_level(mut self, gzip_level: u8) -> Self {
        self.gzip_level = Some(gzip_level);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_timestamp_format(mut self, timestamp_format: impl Into<String>) -> Self {
        self.timestamp_format = Some(timestamp_format.into());
        self
    }

    pub fn with_response_condition(mut self, condition: impl Into<String>) -> Self {
        self.response_condition = Some(condition.into());
        self
    }
}

impl Resource for S3 {
    const KIND: &'static str = "s3";
    const PATH: &'static str = "logging/s3";

    type Fields = S3Fields;
    type Changes = S3Changes;

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::codec::form_pairs;

    fn sample_fields() -> S3Fields {
        S3Fields::new("test-s3")
            .with_bucket_name("bucket-name")
            .with_credentials("access_key", "secret_key")
            .with_path("/path")
            .with_period(12)
            .with_gzip_level(9)
            .with_format("format")
            .with_timestamp_format("%Y")
    }

    #[test]
    fn test_fields_wire_names() {
        let mut pairs = form_pairs(&sample_fields()).unwrap();
        pairs.sort();

        let expected: Vec<(String, String)> = [
            ("access_key", "access_key"),
            ("bucket_name", "bucket-name"),
            ("format", "format"),
            ("gzip_level", "9"),
            ("name", "test-s3"),
            ("path", "/path"),
            ("period", "12"),
            ("secret_key", "secret_key"),
            ("timestamp_format", "%Y"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_decode_string_numbers() {
        let s3: S3 = serde_json::from_str(
            r#"{
                "name": "test-s3",
                "bucket_name": "bucket-name",
                "period": "3600",
                "gzip_level": "9",
                "format": "%h %l %u %t %r %>s",
                "timestamp_format": "%Y-%m-%dT%H:%M:%S.000",
                "response_condition": null
            }"#,
        )
        .unwrap();

        assert_eq!(s3.period, 3600);
        assert_eq!(s3.gzip_level, 9);
        assert_eq!(s3.response_condition, "");
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let fields = sample_fields().with_credentials("AKIAEXAMPLE", "very-secret");
        let changes = S3Changes::new().with_credentials("AKIAEXAMPLE", "very-secret");
        let record = S3 {
            access_key: "AKIAEXAMPLE".to_string(),
            secret_key: "very-secret".to_string(),
            ..S3::default()
        };

        for debug_str in [
            format!("{:?}", fields),
            format!("{:?}", changes),
            format!("{:?}", record),
        ] {
            assert!(!debug_str.contains("AKIAEXAMPLE"));
            assert!(!debug_str.contains("very-secret"));
        }
    }

    #[test]
    fn test_changes_rename_only() {
        let pairs = form_pairs(&S3Changes::new().rename("new-test-s3")).unwrap();
        assert_eq!(pairs, vec![("name".to_string(), "new-test-s3".to_string())]);
    }

    #[test]
    fn test_changes_domain_and_condition() {
        let mut pairs = form_pairs(
            &S3Changes::new()
                .with_domain("s3.eu-west-1.amazonaws.com")
                .with_response_condition("errors only"),
        )
        .unwrap();
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("domain".to_string(), "s3.eu-west-1.amazonaws.com".to_string()),
                ("response_condition".to_string(), "errors only".to_string()),
            ]
        );
    }
}
