//! Tutorhub API server binary.

use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tutorhub_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir: PathBuf = std::env::var("TUTORHUB_DATA_DIR")
        .unwrap_or_else(|_| "data".to_string())
        .into();
    let addr = std::env::var("TUTORHUB_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let state = AppState::open(&data_dir)?;
    let app = tutorhub_api::app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, data_dir = %data_dir.display(), "tutorhub-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
