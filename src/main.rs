use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vin_cache::{
    config::Config,
    database::Database,
    decoder::NhtsaVinDecoder,
    web::{AppState, WebServer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human readable, coloured output
    Pretty,
    /// One JSON object per line
    Json,
}

#[derive(Parser)]
#[command(name = "vin-cache")]
#[command(version)]
#[command(about = "Caching VIN decoding service backed by the NHTSA vPIC API")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_format);

    info!("Starting VIN cache service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    info!("Using database: {}", config.database.url);

    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database connection established and migrations applied");

    let decoder = NhtsaVinDecoder::new(&config.decoder).context("Failed to build VIN decoder client")?;
    info!(
        base_url = %config.decoder.base_url,
        timeout = %humantime::format_duration(config.decoder.timeout),
        "VIN decoder initialized"
    );

    let state = AppState::new(database, config, Arc::new(decoder));
    let web_server = WebServer::new(state)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    let cancellation_token = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancellation_token.clone()));

    // Create a channel to signal when the server is ready or fails to bind
    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();

    let server_token = cancellation_token.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server
            .serve_with_cancellation(server_ready_tx, server_token)
            .await
        {
            tracing::error!("Web server failed: {}", e);
        }
    });

    match server_ready_rx.await {
        Ok(Ok(())) => {
            info!("Web server is now listening");
        }
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    // Wait for the server to complete (this will block until shutdown)
    server_handle.await?;

    info!("VIN cache service stopped");
    Ok(())
}

fn init_logging(log_level: &str, format: LogFormat) {
    let log_filter = if log_level == "trace" {
        format!("vin_cache={log_level},tower_http=trace")
    } else {
        format!("vin_cache={log_level}")
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

/// Cancel `token` on SIGINT or SIGTERM
async fn cancel_on_shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                    _ = sigint.recv() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
                }
            }
            _ => {
                tracing::warn!("Failed to install unix signal handlers, falling back to Ctrl+C");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;

    token.cancel();
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            // Without a signal handler the service can only be stopped externally
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
