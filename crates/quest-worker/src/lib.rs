//! Read-only guard worker for Cypher Quest.
//!
//! Sits between browser clients and the graph database: screens statements
//! against a write/procedure denylist, forwards the survivors to the
//! database's HTTPS query API, and flattens the answer into `{records}`.
//!
//! # Routes
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/health` | `quest-worker ok` |
//! | POST | `/`, `/run` | `{records}` |
//! | POST | `/submit` | `{questId, records}` |
//! | POST | `/seed` | seeds the demo dataset |
//! | POST | `/reset` | deletes everything |
//! | OPTIONS | any | 204 preflight |
//!
//! Everything else is a 404 `{ok:false, error:"Not Found", path}`.
//!
//! # Configuration
//!
//! See [`WorkerConfig::from_env`].

use std::net::SocketAddr;

pub mod config;
pub mod cors;
pub mod error;
pub mod guard;
pub mod maintenance;
pub mod mapping;
pub mod routes;
pub mod upstream;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use routes::{router, AppState};

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(config: WorkerConfig, addr: SocketAddr) -> anyhow::Result<()> {
    let missing = config.missing_secrets();
    if !missing.is_empty() {
        tracing::warn!(?missing, "upstream secrets not set; queries will fail");
    }

    let app = router(AppState::new(config)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "quest-worker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
