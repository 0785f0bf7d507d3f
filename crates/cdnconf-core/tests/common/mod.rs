//! Test doubles and common utilities for client contract tests
//!
//! - [`RecordingTransport`]: counts calls and answers every request with a
//!   fixed response. Used to prove validation never reaches the wire.
//! - [`FakeService`]: an in-memory stand-in for the remote API that keeps
//!   versions and records, supports rename-on-update, and answers 404 for
//!   names that do not resolve.

#![allow(dead_code)]

use cdnconf_core::{ApiRequest, ApiResponse, Client, Method, Result, Transport};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Service ID used throughout the contract tests
pub const TEST_SERVICE_ID: &str = "7i6HN3TK9wS159v2gPAZ8A";

/// A transport that records requests and always returns the same response
pub struct RecordingTransport {
    response: ApiResponse,
    call_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl RecordingTransport {
    pub fn new(response: ApiResponse) -> Self {
        Self {
            response,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a transport sharing counters with another one
    pub fn sharing_counters_with(other: &RecordingTransport) -> Self {
        Self {
            response: other.response.clone(),
            call_count: other.call_count.clone(),
            requests: other.requests.clone(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

/// Build a client over a recording transport, returning a handle to its counters
pub fn recording_client() -> (Client, RecordingTransport) {
    let transport = RecordingTransport::new(ApiResponse::new(200, "[]"));
    let handle = RecordingTransport::sharing_counters_with(&transport);
    (Client::new(transport), handle)
}

#[derive(Default)]
struct ServiceState {
    /// Version numbers per service, in creation order
    versions: HashMap<String, Vec<u32>>,
    /// Records keyed by (service, version, kind path), in creation order
    records: HashMap<(String, u32, String), Vec<Map<String, Value>>>,
}

/// In-memory fake of the configuration API
#[derive(Default)]
pub struct FakeService {
    state: Mutex<ServiceState>,
    call_count: AtomicUsize,
    version_creates_in_flight: AtomicUsize,
}

const KIND_PATHS: &[&str] = &["domain", "logging/s3"];

fn json_response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn not_found(detail: String) -> ApiResponse {
    json_response(404, json!({ "msg": "Record not found", "detail": detail }))
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Build a client whose transport is this fake
    pub fn client(self: &Arc<Self>) -> Client {
        Client::from_shared(self.clone())
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of records of a kind currently stored in a version
    pub fn record_count(&self, service: &str, version: u32, kind_path: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .records
            .get(&(service.to_string(), version, kind_path.to_string()))
            .map_or(0, Vec::len)
    }

    async fn create_version(&self, service: &str) -> ApiResponse {
        // The real API falls over on concurrent version creation; mimic that.
        let in_flight = self.version_creates_in_flight.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let response = if in_flight > 0 {
            json_response(
                500,
                json!({ "msg": "Version creation failed", "detail": "concurrent request" }),
            )
        } else {
            let mut state = self.state.lock().unwrap();
            let numbers = state.versions.entry(service.to_string()).or_default();
            let number = numbers.last().copied().unwrap_or(0) + 1;
            numbers.push(number);
            json_response(
                200,
                json!({
                    "number": number,
                    "service_id": service,
                    "active": false,
                    "locked": false,
                    "comment": ""
                }),
            )
        };

        self.version_creates_in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    fn version_json(service: &str, number: u32) -> Value {
        json!({ "number": number, "service_id": service, "active": false, "locked": false })
    }

    fn route_versions(&self, method: Method, service: &str, version: Option<&str>) -> ApiResponse {
        let state = self.state.lock().unwrap();
        let numbers = state.versions.get(service).cloned().unwrap_or_default();

        match (method, version) {
            (Method::Get, None) => json_response(
                200,
                Value::Array(
                    numbers
                        .iter()
                        .map(|n| Self::version_json(service, *n))
                        .collect(),
                ),
            ),
            (Method::Get, Some(v)) => match v.parse::<u32>() {
                Ok(n) if numbers.contains(&n) => json_response(200, Self::version_json(service, n)),
                _ => not_found(format!("Couldn't find version '{}'", v)),
            },
            _ => json_response(405, json!({ "msg": "Method not allowed" })),
        }
    }

    fn route_records(
        &self,
        request: &ApiRequest,
        service: &str,
        version: &str,
        kind_path: &str,
        name: Option<&str>,
    ) -> ApiResponse {
        let mut state = self.state.lock().unwrap();

        let number = match version.parse::<u32>() {
            Ok(n) if state.versions.get(service).is_some_and(|v| v.contains(&n)) => n,
            _ => return not_found(format!("Couldn't find version '{}'", version)),
        };

        let records = state
            .records
            .entry((service.to_string(), number, kind_path.to_string()))
            .or_default();
        let position = |records: &[Map<String, Value>], name: &str| {
            records
                .iter()
                .position(|r| r.get("name").and_then(Value::as_str) == Some(name))
        };

        match (request.method, name) {
            (Method::Get, None) => json_response(
                200,
                Value::Array(records.iter().cloned().map(Value::Object).collect()),
            ),
            (Method::Post, None) => {
                let Some(new_name) = request.form_value("name") else {
                    return json_response(400, json!({ "msg": "Name is required" }));
                };
                if position(records.as_slice(), new_name).is_some() {
                    return json_response(409, json!({ "msg": "Duplicate record" }));
                }

                let mut record = Map::new();
                record.insert("service_id".into(), json!(service));
                record.insert("version".into(), json!(number));
                for (key, value) in &request.form {
                    record.insert(key.clone(), json!(value));
                }
                records.push(record.clone());
                json_response(200, Value::Object(record))
            }
            (Method::Get, Some(name)) => match position(records.as_slice(), name) {
                Some(i) => json_response(200, Value::Object(records[i].clone())),
                None => not_found(format!("Couldn't find {} '{}'", kind_path, name)),
            },
            (Method::Put, Some(name)) => {
                let Some(i) = position(records.as_slice(), name) else {
                    return not_found(format!("Couldn't find {} '{}'", kind_path, name));
                };
                if let Some(new_name) = request.form_value("name")
                    && new_name != name
                    && position(records.as_slice(), new_name).is_some()
                {
                    return json_response(409, json!({ "msg": "Duplicate record" }));
                }
                for (key, value) in &request.form {
                    records[i].insert(key.clone(), json!(value));
                }
                json_response(200, Value::Object(records[i].clone()))
            }
            (Method::Delete, Some(name)) => match position(records.as_slice(), name) {
                Some(i) => {
                    records.remove(i);
                    json_response(200, json!({ "status": "ok" }))
                }
                None => not_found(format!("Couldn't find {} '{}'", kind_path, name)),
            },
            _ => json_response(405, json!({ "msg": "Method not allowed" })),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeService {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let segments: Vec<String> = request
            .path
            .trim_start_matches('/')
            .split('/')
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        let response = match segments.as_slice() {
            ["service", service, "version"] if request.method == Method::Post => {
                self.create_version(service).await
            }
            ["service", service, "version"] => self.route_versions(request.method, service, None),
            ["service", service, "version", version] => {
                self.route_versions(request.method, service, Some(version))
            }
            ["service", service, "version", version, rest @ ..] => {
                let joined = rest.join("/");
                let matched = KIND_PATHS.iter().find_map(|kind| {
                    if joined == *kind {
                        Some((*kind, None))
                    } else {
                        joined
                            .strip_prefix(kind)
                            .and_then(|tail| tail.strip_prefix('/'))
                            .filter(|name| !name.contains('/'))
                            .map(|name| (*kind, Some(name.to_string())))
                    }
                });
                match matched {
                    Some((kind, name)) => {
                        self.route_records(&request, service, version, kind, name.as_deref())
                    }
                    None => json_response(404, json!({ "msg": "Unknown path" })),
                }
            }
            _ => json_response(404, json!({ "msg": "Unknown path" })),
        };

        Ok(response)
    }

    fn transport_name(&self) -> &'static str {
        "fake-service"
    }
}
