// # cdnconf - CDN configuration CLI
//
// Thin command-line layer over `cdnconf-core`. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Installing the tracing subscriber
// 3. Building a `Client` over the HTTP transport
// 4. Running one operation and printing the result as JSON
//
// No validation or request logic lives here; every check happens in the
// client so that the CLI and library behave the same way.
//
// ## Configuration
//
// - `CDNCONF_API_KEY`: API key (required)
// - `CDNCONF_API_URL`: API endpoint (default `https://api.fastly.com`)
// - `CDNCONF_TIMEOUT_SECS`: Request timeout in seconds (default 30)
// - `CDNCONF_USER_AGENT`: User-Agent override
// - `CDNCONF_LOG_LEVEL`: trace, debug, info, warn, error (default warn)
//
// ## Example
//
// ```bash
// export CDNCONF_API_KEY=your_key
//
// cdnconf version create 7i6HN3TK9wS159v2gPAZ8A
// cdnconf domain create 7i6HN3TK9wS159v2gPAZ8A 2 www.example.com --comment edge
// cdnconf domain update 7i6HN3TK9wS159v2gPAZ8A 2 www.example.com --new-name example.com
// cdnconf s3 list 7i6HN3TK9wS159v2gPAZ8A 2
// ```

use anyhow::Context;
use cdnconf_core::{
    Client, ClientConfig, DomainChanges, DomainFields, Error, S3Changes, S3Fields,
    TransportFactory,
};
use cdnconf_http::HttpTransportFactory;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the CLI
///
/// - 0: Operation succeeded
/// - 1: Configuration or local validation error
/// - 2: Remote or transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliExitCode {
    /// Operation succeeded
    Success = 0,
    /// Bad configuration, or a request rejected before it was sent
    ConfigError = 1,
    /// The API or the network failed the request
    RemoteError = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&Error> for CliExitCode {
    fn from(err: &Error) -> Self {
        if err.is_validation() || matches!(err, Error::Config(_)) {
            CliExitCode::ConfigError
        } else {
            CliExitCode::RemoteError
        }
    }
}

/// Command-line client for the CDN configuration API
#[derive(Parser, Debug)]
#[command(name = "cdnconf", version, about, long_about = None)]
struct Cli {
    /// Log level (logs go to stderr)
    #[arg(long, env = "CDNCONF_LOG_LEVEL", value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Service versions
    Version {
        #[command(subcommand)]
        action: VersionAction,
    },
    /// Domains attached to a service version
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// S3 logging endpoints attached to a service version
    S3 {
        #[command(subcommand)]
        action: S3Action,
    },
}

#[derive(Subcommand, Debug)]
enum VersionAction {
    /// List every version of a service
    List { service: String },
    /// Show one version
    Get { service: String, version: String },
    /// Create a new version
    Create { service: String },
}

/// Service and version a record lives under
#[derive(Args, Debug)]
struct Scope {
    service: String,
    version: String,
}

/// Scope plus the record name
#[derive(Args, Debug)]
struct Member {
    #[command(flatten)]
    scope: Scope,
    name: String,
}

#[derive(Subcommand, Debug)]
enum DomainAction {
    /// List domains
    List(Scope),
    /// Show one domain
    Get(Member),
    /// Create a domain
    Create {
        #[command(flatten)]
        member: Member,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Update or rename a domain
    Update {
        #[command(flatten)]
        member: Member,
        #[arg(long)]
        new_name: Option<String>,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete a domain
    Delete(Member),
}

/// Optional S3 endpoint settings shared by create and update
#[derive(Args, Debug, Default)]
struct S3Options {
    #[arg(long)]
    bucket_name: Option<String>,
    #[arg(long)]
    domain: Option<String>,
    #[arg(long)]
    access_key: Option<String>,
    #[arg(long)]
    secret_key: Option<String>,
    #[arg(long)]
    path: Option<String>,
    /// Seconds between log file rotations
    #[arg(long)]
    period: Option<u32>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    gzip_level: Option<u8>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    timestamp_format: Option<String>,
    #[arg(long)]
    response_condition: Option<String>,
}

impl S3Options {
    fn into_fields(self, name: String) -> S3Fields {
        S3Fields {
            name,
            bucket_name: self.bucket_name.unwrap_or_default(),
            domain: self.domain.unwrap_or_default(),
            access_key: self.access_key.unwrap_or_default(),
            secret_key: self.secret_key.unwrap_or_default(),
            path: self.path.unwrap_or_default(),
            period: self.period,
            gzip_level: self.gzip_level,
            format: self.format.unwrap_or_default(),
            timestamp_format: self.timestamp_format.unwrap_or_default(),
            response_condition: self.response_condition.unwrap_or_default(),
        }
    }

    fn into_changes(self, new_name: Option<String>) -> S3Changes {
        S3Changes {
            new_name,
            bucket_name: self.bucket_name,
            domain: self.domain,
            access_key: self.access_key,
            secret_key: self.secret_key,
            path: self.path,
            period: self.period,
            gzip_level: self.gzip_level,
            format: self.format,
            timestamp_format: self.timestamp_format,
            response_condition: self.response_condition,
        }
    }
}

#[derive(Subcommand, Debug)]
enum S3Action {
    /// List S3 endpoints
    List(Scope),
    /// Show one S3 endpoint
    Get(Member),
    /// Create an S3 endpoint
    Create {
        #[command(flatten)]
        member: Member,
        #[command(flatten)]
        options: S3Options,
    },
    /// Update or rename an S3 endpoint
    Update {
        #[command(flatten)]
        member: Member,
        #[arg(long)]
        new_name: Option<String>,
        #[command(flatten)]
        options: S3Options,
    },
    /// Delete an S3 endpoint
    Delete(Member),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CliExitCode::ConfigError.into();
    }

    let config = match ClientConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CliExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CliExitCode::ConfigError.into();
    }

    debug!("Configuration loaded: {:?}", config);

    let client = match HttpTransportFactory.create(&config) {
        Ok(transport) => Client::from_boxed(transport),
        Err(e) => {
            eprintln!("Failed to create HTTP transport: {}", e);
            return CliExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CliExitCode::RemoteError.into();
        }
    };

    let outcome = rt.block_on(run(&client, cli.command));

    match outcome {
        Ok(value) => match render(&value) {
            Ok(text) => {
                println!("{}", text);
                CliExitCode::Success.into()
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                CliExitCode::RemoteError.into()
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            CliExitCode::from(&e).into()
        }
    }
}

/// Run one command and return its result as JSON
async fn run(client: &Client, command: Command) -> cdnconf_core::Result<Value> {
    match command {
        Command::Version { action } => run_version(client, action).await,
        Command::Domain { action } => run_domain(client, action).await,
        Command::S3 { action } => run_s3(client, action).await,
    }
}

async fn run_version(client: &Client, action: VersionAction) -> cdnconf_core::Result<Value> {
    let versions = client.versions();
    let value = match action {
        VersionAction::List { service } => serde_json::to_value(versions.list(&service).await?)?,
        VersionAction::Get { service, version } => {
            serde_json::to_value(versions.get(&service, &version).await?)?
        }
        VersionAction::Create { service } => {
            serde_json::to_value(versions.create(&service).await?)?
        }
    };
    Ok(value)
}

async fn run_domain(client: &Client, action: DomainAction) -> cdnconf_core::Result<Value> {
    let domains = client.domains();
    let value = match action {
        DomainAction::List(Scope { service, version }) => {
            serde_json::to_value(domains.list(&service, &version).await?)?
        }
        DomainAction::Get(Member { scope, name }) => {
            serde_json::to_value(domains.get(&scope.service, &scope.version, &name).await?)?
        }
        DomainAction::Create {
            member: Member { scope, name },
            comment,
        } => {
            let fields = DomainFields::new(name).with_comment(comment.unwrap_or_default());
            serde_json::to_value(domains.create(&scope.service, &scope.version, &fields).await?)?
        }
        DomainAction::Update {
            member: Member { scope, name },
            new_name,
            comment,
        } => {
            let changes = DomainChanges {
                new_name,
                comment,
            };
            serde_json::to_value(
                domains
                    .update(&scope.service, &scope.version, &name, &changes)
                    .await?,
            )?
        }
        DomainAction::Delete(Member { scope, name }) => {
            domains.delete(&scope.service, &scope.version, &name).await?;
            json!({ "status": "ok" })
        }
    };
    Ok(value)
}

async fn run_s3(client: &Client, action: S3Action) -> cdnconf_core::Result<Value> {
    let s3s = client.s3s();
    let value = match action {
        S3Action::List(Scope { service, version }) => {
            serde_json::to_value(s3s.list(&service, &version).await?)?
        }
        S3Action::Get(Member { scope, name }) => {
            serde_json::to_value(s3s.get(&scope.service, &scope.version, &name).await?)?
        }
        S3Action::Create {
            member: Member { scope, name },
            options,
        } => {
            let fields = options.into_fields(name);
            serde_json::to_value(s3s.create(&scope.service, &scope.version, &fields).await?)?
        }
        S3Action::Update {
            member: Member { scope, name },
            new_name,
            options,
        } => {
            let changes = options.into_changes(new_name);
            serde_json::to_value(
                s3s.update(&scope.service, &scope.version, &name, &changes)
                    .await?,
            )?
        }
        S3Action::Delete(Member { scope, name }) => {
            s3s.delete(&scope.service, &scope.version, &name).await?;
            json!({ "status": "ok" })
        }
    };
    Ok(value)
}

fn render(value: &Value) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format response as JSON")
}
