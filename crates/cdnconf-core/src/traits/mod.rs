//! Core traits for the cdnconf client
//!
//! - [`Transport`]: Carry one request to the API and return the raw response
//! - [`Resource`]: Describe a resource kind nested under a service version

pub mod resource;
pub mod transport;

pub use resource::Resource;
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportFactory};
