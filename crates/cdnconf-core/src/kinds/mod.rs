//! Resource kinds
//!
//! - [`Domain`]: Hostnames served by a service version
//! - [`S3`]: S3 log-streaming endpoints

pub mod domain;
pub mod s3;

pub use domain::{Domain, DomainChanges, DomainFields};
pub use s3::{S3, S3Changes, S3Fields};
