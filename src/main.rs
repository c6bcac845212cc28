//! Insight Map: mental-health risk stratification API.
//!
//! Main entry point for the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use insightmap::adapters::composite::CompositeRiskModel;
use insightmap::application::AssessmentService;
use insightmap::server::{self, ServerConfig};

#[derive(Parser)]
#[command(name = "insightmap", about = "Mental-health risk stratification API")]
struct Cli {
    /// Listen address (overrides INSIGHTMAP_BIND_ADDR)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Maximum patients per batch request (overrides INSIGHTMAP_MAX_BATCH)
    #[arg(long)]
    max_batch: Option<usize>,

    /// Directory searched for trained model artifacts (overrides INSIGHTMAP_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = insightmap::logging::init()?;

    let mut config = ServerConfig::from_env_or_default();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(max_batch) = cli.max_batch.filter(|&n| n > 0) {
        config.max_batch = max_batch;
    }
    if cli.model_dir.is_some() {
        config.model_dir = cli.model_dir;
    }

    tracing::info!("Starting Insight Map...");

    let model = CompositeRiskModel::load(config.model_dir.as_deref());
    let service = Arc::new(AssessmentService::new(Arc::new(model)));
    server::run(service, config).await?;

    tracing::info!("Insight Map shutdown complete.");
    Ok(())
}
