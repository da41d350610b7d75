//! Ambient entrypoint (§6): loads configuration, wires up logging, builds
//! the tool registry and backend client factory once, then hands them to
//! whichever transport `transport.mode` selects.
//!
//! `serve` is the default subcommand — running the binary with no
//! arguments starts the server, matching how an MCP server is normally
//! launched from a client's subprocess config. `info`/`version` print
//! static or derived strings with no graph-backend interaction.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emergent_client::{ClientFactory, RequestContext, RetryPolicy};
use emergent_config::{Config, TransportMode};
use emergent_server::{scheduler, transport, Dispatcher, Registry};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "emergent-mcp", version, about = "Spec-driven-development MCP server")]
struct Cli {
    /// Path to a TOML config file. Missing files fall back to defaults.
    #[arg(long, global = true, env = "EMERGENT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the server (stdio or HTTP, per config). Default when no
    /// subcommand is given.
    Serve,
    /// Print the effective configuration and registered tool/prompt/
    /// resource counts, then exit without touching the graph backend.
    Info,
    /// Print the version and exit.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    emergent_config::init_logging(&config.log.level);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Version => {
            println!("emergent-mcp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Info => run_info(&config),
        Command::Serve => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?
            .block_on(run_serve(config)),
    }
}

fn run_info(config: &Config) -> Result<()> {
    let registry = Registry::build();
    println!("emergent-mcp {}", env!("CARGO_PKG_VERSION"));
    println!("backend:    {}", config.emergent.url);
    println!("transport:  {:?}", config.transport.mode);
    println!("janitor:    enabled={}", config.janitor.enabled);
    println!("tools:      {}", registry.tool_count());
    println!("prompts:    {}", registry.prompt_count());
    println!("resources:  {}", registry.resource_count());
    Ok(())
}

async fn run_serve(config: Config) -> Result<()> {
    let cancellation = CancellationToken::new();
    spawn_shutdown_listener(cancellation.clone());

    let retry_policy = RetryPolicy {
        max_retries: config.emergent.max_retries,
        long_outage_threshold: config.emergent.long_outage_threshold,
        long_outage_interval: Duration::from_secs(config.emergent.long_outage_interval_mins * 60),
        ..RetryPolicy::default()
    };
    let client_factory = ClientFactory::new(config.emergent.url.clone(), retry_policy);
    let registry = Arc::new(Registry::build());
    let dispatcher = Dispatcher::new(registry, client_factory.clone());

    info!(
        transport = ?config.transport.mode,
        backend = %config.emergent.url,
        "starting emergent-mcp"
    );

    match config.transport.mode {
        TransportMode::Stdio => run_stdio(dispatcher, client_factory, &config, cancellation).await,
        TransportMode::Http => {
            if config.janitor.enabled {
                warn!("janitor is enabled but HTTP mode never schedules it; background jobs stay single-tenant (§9)");
            }
            transport::http::run(dispatcher, &config.transport, cancellation).await
        }
    }
}

async fn run_stdio(
    dispatcher: Dispatcher,
    client_factory: ClientFactory,
    config: &Config,
    cancellation: CancellationToken,
) -> Result<()> {
    let token = config.emergent.token.clone().unwrap_or_default();

    let janitor_handle = if config.janitor.enabled {
        let ctx = RequestContext::new(token.clone(), &cancellation);
        let client = client_factory
            .client_for(&ctx)
            .context("building janitor backend client")?;
        scheduler::spawn_janitor(client, config.janitor.clone(), cancellation.clone())
    } else {
        None
    };

    let result = transport::stdio::run(dispatcher, token, cancellation.clone())
        .await
        .context("stdio transport");

    cancellation.cancel();
    if let Some(handle) = janitor_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    result
}

/// Cancels `token` on the first of SIGINT or (on Unix) SIGTERM, so both a
/// Ctrl-C and a supervised `kill` trigger the same graceful shutdown path.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    let _ = tokio::signal::ctrl_c().await;
                    token.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
                _ = sigterm.recv() => info!("received SIGTERM"),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
            info!("received ctrl-c");
        }

        token.cancel();
    });
}
