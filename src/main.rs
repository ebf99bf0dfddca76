use anyhow::{Context, Result};
use std::sync::Arc;

use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use phy_fake::{
    config::{Cli, Command, Config},
    engine::Engine,
    fixtures::sample_dataset,
    http::{build_router, serve},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cmd = cli.command.clone().unwrap_or(Command::Run);

    match cmd {
        Command::Run => run_server(cli.config).await,
        Command::Sample => print_sample(),
    }
}

fn print_sample() -> Result<()> {
    let json = sample_dataset()
        .to_json_pretty()
        .context("serialize sample dataset")?;
    println!("{json}");
    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let dataset = config.load_dataset().with_context(|| match &config.data {
        Some(path) => format!("load dataset from {}", path.display()),
        None => "load dataset".to_string(),
    })?;
    let servers = dataset.servers.len();
    let engine = Engine::with_action_interval(dataset, config.action_interval());

    let router = build_router(Arc::new(engine))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let shutdown = shutdown_signal().context("install signal handlers")?;
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    let local_addr = listener.local_addr().context("listener local_addr")?;
    info!(
        addr = %local_addr,
        servers,
        action_interval_ms = config.action_interval_ms,
        "phy-fake-server listening"
    );
    serve(listener, router, shutdown).await.context("serve")?;
    info!("phy-fake-server stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout is reserved for command output such as `sample`
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Resolves on Ctrl-C or SIGTERM. The SIGTERM handler is registered before
/// this returns.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send + 'static> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received ctrl-c, shutting down"),
            _ = terminate.recv() => info!("received SIGTERM, shutting down"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}
