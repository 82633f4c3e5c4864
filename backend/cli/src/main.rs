mod api;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use docsight_config::{
    load_and_prepare, process_env, redacted_snapshot, validate, DocsightConfig, LogFormat,
};
use docsight_handler::{HandlerConfig, OcrHandler};
use docsight_infra::{build_client, token_source_from_config};
use docsight_logging::{init_logger, LoggerOptions};
use docsight_storage::GcsObjectStore;
use docsight_understanding::CloudVisionClient;

use api::AppState;

#[derive(Parser)]
#[command(name = "docsight")]
#[command(about = "Extracts document text from uploaded images and stores it as JSON")]
#[command(version)]
struct Cli {
    /// Optional YAML config file
    #[arg(long, global = true, env = "DOCSIGHT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Receive storage events over HTTP (default)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Validate the effective configuration and print it with secrets masked
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_and_prepare(cli.config.as_deref(), &process_env).await?;

    init_logger(&LoggerOptions {
        level: config.log_level().to_string(),
        json: config.log_format() == LogFormat::Json,
        dir: config.log_dir().map(PathBuf::from),
        stderr: matches!(cli.command, Some(Commands::CheckConfig)),
    });

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            ensure_valid(&config)?;
            run_server(config, port).await
        }
        Commands::CheckConfig => {
            let checked = ensure_valid(&config);
            println!("{}", serde_json::to_string_pretty(&redacted_snapshot(&config))?);
            checked
        }
    }
}

/// Log every finding; fail when any of them is an error.
fn ensure_valid(config: &DocsightConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    for err in &report.errors {
        error!(path = %err.path, "{}", err.message);
    }
    if !report.is_valid() {
        bail!("configuration has {} error(s)", report.errors.len());
    }
    Ok(())
}

async fn run_server(config: DocsightConfig, port: Option<u16>) -> Result<()> {
    let client = build_client(&config.http())?;
    let credentials = token_source_from_config(&config.auth(), &client);
    info!(config = %redacted_snapshot(&config), "Effective configuration");
    info!(credentials = credentials.name(), "Credentials configured");

    let annotator = CloudVisionClient::new(client.clone(), Arc::clone(&credentials))
        .with_base_url(config.vision_endpoint());
    let store = GcsObjectStore::new(client, credentials).with_base_url(config.storage_endpoint());

    let handler = OcrHandler::new(
        HandlerConfig {
            result_bucket: config.result_bucket().unwrap_or_default().to_string(),
        },
        Arc::new(annotator),
        Arc::new(store),
    )?;

    let app = api::build_router(Arc::new(AppState { handler })).layer(TraceLayer::new_for_http());
    let addr = format!("{}:{}", config.bind_address(), port.unwrap_or(config.port()));
    let listener = TcpListener::bind(&addr).await?;

    info!(
        addr = %addr,
        result_bucket = config.result_bucket().unwrap_or_default(),
        vision = %config.vision_endpoint(),
        "Starting docsight event receiver"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight events");
}
