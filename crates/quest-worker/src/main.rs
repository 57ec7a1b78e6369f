use std::net::SocketAddr;

use clap::Parser;
use quest_worker::WorkerConfig;
use tracing_subscriber::EnvFilter;

/// Read-only guard worker for Cypher Quest
#[derive(Parser, Debug)]
#[command(name = "quest-worker", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "QUEST_WORKER_BIND", default_value = "127.0.0.1:8787")]
    bind: SocketAddr,
}

fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let args = Args::parse();

    let config = WorkerConfig::from_env();
    tracing::info!(
        database = %config.database,
        origins = config.allowed_origins.len(),
        "starting quest-worker"
    );
    quest_worker::serve(config, args.bind).await
}
