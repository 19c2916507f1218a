//! keymapperd: runs the remapping engine behind a JSON-lines protocol.
//!
//! Requests arrive on stdin, one per line. Gestures, events and replies are
//! written to stdout. Logs go to stderr.

mod output;
mod protocol;

use anyhow::{Context, Result};
use clap::Parser;
use keymapper_application::{Engine, EngineConfig, EngineDeps, SystemClock};
use keymapper_bindings::BindingTable;
use keymapper_storage::Database;
use output::JsonLines;
use protocol::{Reply, Request};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keymapperd", version, about = "Remote-control button remapping engine")]
struct Args {
    /// Engine configuration (JSON). Defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Binding table (JSON). The built-in table is used when omitted.
    #[arg(long, value_name = "FILE")]
    bindings: Option<PathBuf>,

    /// Settings database.
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,
}

fn default_db_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("no configuration directory on this platform")?
        .join("keymapper");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir.join("settings.db"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,keymapper=debug")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let table = match &args.bindings {
        Some(path) => BindingTable::load(path)?,
        None => BindingTable::builtin()?,
    };
    let db_path = match args.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let db = Database::open(&db_path)
        .with_context(|| format!("opening settings at {}", db_path.display()))?;

    tracing::info!(db = %db_path.display(), bindings = table.len(), "starting keymapperd");

    let output = Arc::new(JsonLines::new(std::io::stdout(), config.double_tap_interval_ms));
    let (engine, task) = Engine::spawn(
        config,
        EngineDeps {
            table: Arc::new(table),
            sink: output.clone(),
            bus: output.clone(),
            settings: Arc::new(db),
            clock: Arc::new(SystemClock),
        },
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        let line = tokio::select! {
            _ = &mut interrupt => {
                tracing::info!("interrupted");
                break;
            }
            line = lines.next_line() => line.context("reading stdin")?,
        };
        let Some(line) = line else {
            tracing::info!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(request) => match protocol::handle(&engine, request).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!(error = %e, "request failed");
                    Some(Reply::Error {
                        message: e.to_string(),
                    })
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "malformed request");
                Some(Reply::Error {
                    message: e.to_string(),
                })
            }
        };
        if let Some(reply) = reply {
            output.reply(&reply).context("writing reply")?;
        }
    }

    engine.shutdown();
    task.await.context("engine task panicked")?;
    Ok(())
}
