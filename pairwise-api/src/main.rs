//! pairwise-api - PairWise list-matching wizard service
//!
//! Guides a single election official through authentication, file upload,
//! list matching, result download, and final data teardown over a local
//! REST API. Matching and download work are simulated by bounded-delay
//! providers.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use pairwise_api::config::{Args, Config};
use pairwise_api::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting PairWise API (pairwise-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = Config::load(&args)?;
    info!("Registry file: {}", config.data_file.display());

    let bind_address = config.bind_address.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("pairwise-api listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
