// # Domain and S3 lifecycle against a live API
//
// Walks a domain and an S3 logging endpoint through create, list, get,
// rename and delete on a fresh service version.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default): read-only listing of the latest version
// CDNCONF_API_KEY=your_key \
// CDNCONF_SERVICE_ID=your_service \
// cargo run -p demos --bin domain_lifecycle
//
// # Live mode (creates two versions and mutates them!)
// DEMO_MODE=live \
// CDNCONF_API_KEY=your_key \
// CDNCONF_SERVICE_ID=your_service \
// cargo run -p demos --bin domain_lifecycle
// ```
//
// ## Environment Variables
//
// Required:
// - `CDNCONF_API_KEY`: API key
// - `CDNCONF_SERVICE_ID`: Service to work on
//
// Optional:
// - `CDNCONF_API_URL`, `CDNCONF_TIMEOUT_SECS`: see `ClientConfig::from_env`
// - `DEMO_MODE`: "dry-run" or "live" (default: dry-run)

use anyhow::{Context, Result, bail};
use cdnconf_core::{
    Client, ClientConfig, DomainChanges, DomainFields, Resource, ResourceClient, S3Changes,
    S3Fields, Version,
};
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = ClientConfig::from_env().context("loading client configuration")?;
    let service = env::var("CDNCONF_SERVICE_ID").context("CDNCONF_SERVICE_ID is required")?;
    let mode = env::var("DEMO_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = mode.to_lowercase() != "live";

    let client = cdnconf_http::connect(&config)?;
    tracing::info!("Client ready: {:?}", config);

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
        return inspect(&client, &service).await;
    }

    tracing::warn!("Running in LIVE mode - new versions will be created");

    // Version creation is not safe to run concurrently on one service.
    let version_lock = Arc::new(Mutex::new(()));

    let (domain_version, s3_version) = tokio::try_join!(
        domain_scenario(client.clone(), &service, version_lock.clone()),
        s3_scenario(client.clone(), &service, version_lock.clone()),
    )?;

    tracing::info!("=== Lifecycle complete ===");
    tracing::info!("  Domain scenario ran on version {}", domain_version);
    tracing::info!("  S3 scenario ran on version {}", s3_version);
    Ok(())
}

/// List what the latest version holds without changing anything
async fn inspect(client: &Client, service: &str) -> Result<()> {
    let versions = client.versions().list(service).await?;
    let Some(latest) = versions.iter().max_by_key(|v| v.number) else {
        tracing::info!("Service {} has no versions", service);
        return Ok(());
    };

    let key = latest.key();
    let domains = client.domains().list(service, &key).await?;
    let s3s = client.s3s().list(service, &key).await?;

    tracing::info!("Version {} (active: {})", key, latest.active);
    for domain in &domains {
        tracing::info!("  domain {}", domain.name);
    }
    for endpoint in &s3s {
        tracing::info!("  s3 {} -> {}", endpoint.name, endpoint.bucket_name);
    }
    Ok(())
}

async fn new_version(client: &Client, service: &str, lock: &Mutex<()>) -> Result<Version> {
    let _guard = lock.lock().await;
    let version = client.versions().create(service).await?;
    tracing::info!("Created version {}", version.number);
    Ok(version)
}

const DOMAIN_NAME: &str = "integ-test.example.com";
const RENAMED_DOMAIN_NAME: &str = "new-integ-test.example.com";
const S3_NAME: &str = "test-s3";
const RENAMED_S3_NAME: &str = "new-test-s3";

async fn domain_scenario(client: Client, service: &str, lock: Arc<Mutex<()>>) -> Result<u32> {
    let version = new_version(&client, service, &lock).await?;
    let key = version.key();

    let outcome = domain_steps(&client, service, &key).await;

    // Either name may exist depending on where the steps stopped
    for name in [DOMAIN_NAME, RENAMED_DOMAIN_NAME] {
        cleanup(&client.domains(), service, &key, name).await;
    }
    outcome.map(|()| version.number)
}

async fn domain_steps(client: &Client, service: &str, key: &str) -> Result<()> {
    let domains = client.domains();

    let created = domains
        .create(
            service,
            key,
            &DomainFields::new(DOMAIN_NAME).with_comment("comment"),
        )
        .await?;
    if created.comment != "comment" {
        bail!("created domain has comment {:?}", created.comment);
    }

    let listed = domains.list(service, key).await?;
    if !listed.iter().any(|d| d.name == created.name) {
        bail!("created domain missing from list");
    }

    let renamed = domains
        .update(
            service,
            key,
            &created.name,
            &DomainChanges::new().rename(RENAMED_DOMAIN_NAME),
        )
        .await?;
    tracing::info!("Renamed {} -> {}", created.name, renamed.name);

    match domains.get(service, key, &created.name).await {
        Err(e) if e.is_not_found() => tracing::info!("Old name no longer resolves"),
        Err(e) => return Err(e.into()),
        Ok(_) => bail!("old domain name still resolves after rename"),
    }
    Ok(())
}

async fn s3_scenario(client: Client, service: &str, lock: Arc<Mutex<()>>) -> Result<u32> {
    let version = new_version(&client, service, &lock).await?;
    let key = version.key();

    let outcome = s3_steps(&client, service, &key).await;

    for name in [S3_NAME, RENAMED_S3_NAME] {
        cleanup(&client.s3s(), service, &key, name).await;
    }
    outcome.map(|()| version.number)
}

async fn s3_steps(client: &Client, service: &str, key: &str) -> Result<()> {
    let s3s = client.s3s();

    let created = s3s
        .create(
            service,
            key,
            &S3Fields::new(S3_NAME)
                .with_bucket_name("bucket-name")
                .with_domain("s3.amazonaws.com")
                .with_credentials("AKIAEXAMPLE", "example-secret")
                .with_path("/path")
                .with_period(12)
                .with_gzip_level(9)
                .with_format("format")
                .with_timestamp_format("%Y"),
        )
        .await?;
    tracing::info!("Created S3 endpoint {} (period {})", created.name, created.period);

    let updated = s3s
        .update(service, key, &created.name, &S3Changes::new().rename(RENAMED_S3_NAME))
        .await?;
    tracing::info!("Renamed {} -> {}", created.name, updated.name);
    Ok(())
}

/// Best-effort delete; a missing record is not an error here
async fn cleanup<R: Resource>(
    records: &ResourceClient<R>,
    service: &str,
    version: &str,
    name: &str,
) {
    match records.delete(service, version, name).await {
        Ok(()) => tracing::info!("Deleted {} {}", R::KIND, name),
        Err(e) if e.is_not_found() => tracing::debug!("{} {} already gone", R::KIND, name),
        Err(e) => tracing::warn!("Failed to delete {} {}: {}", R::KIND, name, e),
    }
}
