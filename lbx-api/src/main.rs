//! lbx-api - lesson content REST service
//!
//! Aggregates, hierarchizes and searches the Markdown lesson files of a
//! content directory. Consumed by the Lessonbox client's backend source.

use anyhow::Result;
use clap::Parser;
use lbx_api::config::{ConfigOverrides, ServiceConfig};
use lbx_api::{build_router, AppState, ContentStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lbx-api", version, about = "Markdown lesson content API")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, env = "LBX_API_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the Markdown lessons
    #[arg(long, env = "LBX_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// HTTP listen port
    #[arg(long, env = "LBX_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Lessonbox content API (lbx-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = ServiceConfig::resolve(ConfigOverrides {
        config: args.config,
        content_dir: args.content_dir,
        port: args.port,
    })?;

    let store = ContentStore::new(&config.content_dir);
    info!("Serving lessons from {}", config.content_dir.display());

    let state = AppState::new(store);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("lbx-api listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
