//! Headless DropJelly runner (default binary).
//!
//! Reads placement and observation requests as JSON lines on stdin and writes acks,
//! events and observations to stdout. Logs go to stderr (`RUST_LOG`, default
//! `drop_jelly=info`). Grid size, seed and pacing come from `DROP_JELLY_*` variables.

use anyhow::Result;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use drop_jelly::adapter;
use drop_jelly::core::SimConfig;
use drop_jelly::engine::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drop_jelly=info")),
        )
        .init();

    let config = SimConfig::from_env()?;
    info!(
        rows = config.rows,
        columns = config.columns,
        seed = config.seed,
        "starting"
    );

    let mut session = Session::new(config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stats = adapter::run(&mut session, stdin, tokio::io::stdout()).await?;
    info!(placed = session.placed(), events = stats.events, "done");
    Ok(())
}
