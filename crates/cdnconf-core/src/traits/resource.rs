// # Resource Trait
//
// Describes one kind of named record that lives inside a service version
// (a domain, an S3 logging endpoint, ...). The generic
// [`ResourceClient`](crate::resource::ResourceClient) is implemented once
// against this trait and instantiated per kind.
//
// ## Adding a kind
//
// ```rust,ignore
// impl Resource for Backend {
//     const KIND: &'static str = "backend";
//     const PATH: &'static str = "backend";
//     type Fields = BackendFields;
//     type Changes = BackendChanges;
//
//     fn name(&self) -> &str {
//         &self.name
//     }
// }
// ```

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A resource kind addressed by `(service, version, name)`
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind, used in logs
    const KIND: &'static str;

    /// Path segment(s) under `/service/{service}/version/{version}/`
    const PATH: &'static str;

    /// Fields sent on create (the name travels inside these)
    type Fields: Serialize + Send + Sync;

    /// Fields sent on update; unset fields must not serialize
    type Changes: Serialize + Send + Sync;

    /// The identifying name of this record
    fn name(&self) -> &str;
}
