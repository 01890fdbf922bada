//! Prometheus exporter for Skupper service networks.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use skupper_exporter_prometheus::config::LogFormat;
use skupper_exporter_prometheus::{
    ControllerClient, ExporterConfig, HttpServer, SkupperCli, SkupperCollector,
};

/// Prometheus exporter for Skupper service networks.
#[derive(Parser, Debug)]
#[command(name = "skupper-exporter-prometheus")]
#[command(about = "Export Skupper site, service, and link state as Prometheus metrics")]
#[command(version)]
struct Args {
    /// HTTP listen port (overrides spc_port).
    #[arg(long)]
    port: Option<u16>,

    /// Log level (overrides spc_log_level).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration from the environment, with CLI overrides.
    let mut config = ExporterConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(log_level) = args.log_level {
        config.log_level = log_level;
    }

    // Initialize logging.
    let log_level = config.log_level.parse().unwrap_or(Level::INFO);
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("skupper_exporter_prometheus={}", log_level).parse()?);

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    info!("Starting Skupper Prometheus exporter");

    // Wire up the collector.
    let controller = ControllerClient::new(
        config.service_controller.clone(),
        Duration::from_secs(config.service_controller_timeout),
    )?;
    let probe = SkupperCli::new(
        &config.skupper_binary,
        Duration::from_secs(config.skupper_binary_timeout),
    );
    let collector = Arc::new(SkupperCollector::new(controller, probe));

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let http_server = HttpServer::new(collector, listen_addr);

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Start HTTP server
    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(shutdown_rx).await {
            error!("HTTP server error: {}", e);
        }
    });

    info!("Serving metrics on http://0.0.0.0:{}/metrics", config.port);

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = tokio::signal::unix::signal(
                    tokio::signal::unix::SignalKind::terminate()
                ).unwrap();
                sigterm.recv().await;
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    // Signal shutdown
    shutdown_tx.send(true)?;

    let _ = tokio::time::timeout(Duration::from_secs(5), http_task).await;

    info!("Exporter stopped");
    Ok(())
}
