// # cdnconf-core
//
// Core library for the cdnconf CDN configuration API client.
//
// ## Architecture Overview
//
// - **Transport**: Trait carrying one request to the API (HTTP lives in `cdnconf-http`)
// - **Resource**: Trait describing a resource kind nested under a service version
// - **ResourceClient**: Generic list/get/create/update/delete, implemented once
// - **VersionClient**: List, get and create service versions
// - **Client**: Facade sharing one transport across every resource client
//
// ## Design Principles
//
// 1. **Validate before I/O**: Missing service, version or name fails locally, in that order
// 2. **One request per call**: No retries, batching or caching
// 3. **Typed errors by kind**: Errors compare by `ErrorKind`, not identity
// 4. **Explicit construction**: No global client; configuration is passed in

pub mod client;
pub mod config;
pub mod error;
pub mod kinds;
pub mod resource;
pub mod traits;
pub mod version;

// Re-export core types for convenience
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use kinds::{Domain, DomainChanges, DomainFields, S3, S3Changes, S3Fields};
pub use resource::ResourceClient;
pub use traits::{ApiRequest, ApiResponse, Method, Resource, Transport, TransportFactory};
pub use version::{Version, VersionClient};
