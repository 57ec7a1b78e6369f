use clap::{Args, Parser, Subcommand};
use quest_core::{ClientConfig, DirectConfig};

#[derive(Parser, Debug)]
#[command(
    name = "quest",
    version,
    about = "Run Cypher Quest queries through the direct upstream, the guard worker, or mock data"
)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dispatch a query and print its rows
    Run(RunArgs),
    /// Print the endpoint trial order for the current configuration
    Candidates,
    /// Show which mock catalog rule resolves a query
    Mock(MockArgs),
}

/// Connection settings. Unset flags fall back to [`ClientConfig::from_env`],
/// which is the only reader of `NEO4J_*` / `VITE_NEO4J_*` variables.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Direct query endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[arg(long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Guard worker URL
    #[arg(long, global = true)]
    pub worker_url: Option<String>,

    /// Direct call budget in milliseconds
    #[arg(long, global = true)]
    pub direct_timeout_ms: Option<u64>,

    /// Per-worker call budget in milliseconds
    #[arg(long, global = true)]
    pub worker_timeout_ms: Option<u64>,
}

impl ClientArgs {
    /// Overlay flags on `base` (normally [`ClientConfig::from_env`]).
    ///
    /// The direct path is replaced only when the flags carry all three
    /// credentials.
    pub fn apply(&self, mut base: ClientConfig) -> ClientConfig {
        if let Some(direct) = DirectConfig::from_parts(
            self.endpoint.clone(),
            self.username.clone(),
            self.password.clone(),
            self.database.clone(),
        ) {
            base.direct = Some(direct);
        } else if let (Some(direct), Some(database)) = (base.direct.as_mut(), &self.database) {
            direct.database = database.clone();
        }
        if let Some(url) = self.worker_url.as_ref().filter(|u| !u.is_empty()) {
            base.worker_url = url.clone();
        }
        if let Some(ms) = self.direct_timeout_ms {
            base.direct_timeout_ms = ms;
        }
        if let Some(ms) = self.worker_timeout_ms {
            base.worker_timeout_ms = ms;
        }
        base
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Cypher statement
    pub cypher: String,

    /// Query parameter as key=JSON (repeatable); non-JSON values are strings
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the request trace after the rows
    #[arg(long)]
    pub trace: bool,
}

#[derive(Args, Debug)]
pub struct MockArgs {
    /// Cypher statement
    pub cypher: String,
}
