//! catsay server - serves fortune-captioned cat pictures over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use catsay::config::{ServiceConfig, load_config};
use catsay::logging;
use catsay_server::serve;
use catsay_server::state::AppState;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "catsay-server", version)]
#[command(about = "Serve cat pictures captioned with a fortune")]
struct Args {
    /// TOML config file (missing file means defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the server to (overrides config)
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let cfg = resolve_config(&args, |key| std::env::var(key).ok())?;
    info!(
        bind = %cfg.bind,
        port = cfg.port,
        workers = cfg.workers,
        fortune = %cfg.fortune.binary.display(),
        upstream = %cfg.image.base_url,
        "starting catsay-server"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.workers)
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(run_server(cfg))
}

/// Defaults, then the config file, then the environment, then flags.
fn resolve_config<F>(args: &Args, lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    cfg = cfg.resolve_env(lookup);
    if let Some(bind) = &args.bind {
        cfg.bind = bind.clone();
    }
    if let Some(port) = args.port {
        cfg.port = port;
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

async fn run_server(cfg: ServiceConfig) -> Result<()> {
    let state = AppState::from_config(&cfg)?;

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .with_context(|| format!("parse bind address {}:{}", cfg.bind, cfg.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, "listening");

    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
