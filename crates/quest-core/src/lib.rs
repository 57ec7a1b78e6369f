//! Query execution pipeline for Cypher Quest.
//!
//! This crate implements the client side of the pipeline:
//!
//! - [`Dispatcher`]: tries the direct upstream, then the guard worker
//!   variants, then the mock catalog, recording every attempt
//! - [`normalize`]: converts the known upstream payload shapes into flat rows
//! - [`MockCatalog`]: deterministic demo data used as the last resort
//! - [`DebugTrace`]: the per-dispatch attempt log
//!
//! # Quick Start
//!
//! ```no_run
//! use quest_core::{ClientConfig, Dispatcher, Params};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dispatcher = Dispatcher::new(ClientConfig::from_env())?;
//! let result = dispatcher.run_cypher("MATCH (u:User) RETURN u LIMIT 20", Params::new()).await?;
//! if result.mocked {
//!     eprintln!("showing mock data");
//! }
//! println!("{} row(s)", result.rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `NEO4J_ENDPOINT` | Direct query endpoint (direct path needs all three credentials) |
//! | `NEO4J_USERNAME` | Direct username |
//! | `NEO4J_PASSWORD` | Direct password |
//! | `NEO4J_DATABASE` | Database name (default: `neo4j`) |
//! | `NEO4J_WORKER_URL` | Guard worker URL (default: the public demo worker) |

pub mod config;
pub mod dispatch;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod query;
pub mod trace;

// Re-export main types
pub use config::{ClientConfig, DirectConfig, DEFAULT_DATABASE, DEFAULT_WORKER_URL};
pub use dispatch::{BodyBuilder, Dispatcher, EndpointConfig, DIRECT_LABEL, WORKER_LABEL};
pub use error::{DispatchError, DispatchResult, FailureKind};
pub use mock::{normalize_query, MatchRule, MockCatalog, MockEntry};
pub use normalize::{normalize, recognize, Recognizer};
pub use query::{columns, NormalizedResult, Params, Query, Row};
pub use trace::{AttemptRecord, DebugTrace};
