//! kvpouch CLI - drive the low-level storage adapter against a local store.
//!
//! Every command goes through an `AsyncMapLevel` backed by a redb file, the
//! same path a database engine takes when it opens a store through the plugin.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use kvpouch_asyncmap::{AsyncMap, RedbMap};
use kvpouch_level::{AsyncMapLevel, GetOptions, LevelDown, OpenOptions, WriteOptions};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod request;

/// kvpouch - inspect and edit a kvpouch store.
///
/// Configuration is stored in ~/.kvpouch/config.yaml.
#[derive(Parser)]
#[command(name = "kvpouch")]
#[command(about = "Key-value store CLI over the kvpouch storage adapter")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.kvpouch/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Output as JSON instead of YAML
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the value stored under KEY
    Get { key: String },
    /// Store VALUE under KEY
    Put { key: String, value: String },
    /// Delete KEY
    Del { key: String },
    /// Apply a batch of put/del operations from a YAML or JSON file
    Batch { file: PathBuf },
    /// List every entry
    List,
    /// Print the number of entries
    Size,
    /// Remove every entry
    Clear,
    /// Print the adapter descriptor
    Info,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "kvpouch=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print<T: Serialize>(json: bool, value: &T) -> anyhow::Result<()> {
    let output = if json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_yaml::to_string(value)?
    };
    println!("{}", output.trim_end());
    Ok(())
}

#[derive(Serialize)]
struct Entry {
    key: String,
    value: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref())?;
    let store = cfg.store_path(cli.store.as_deref());
    if let Some(parent) = store.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!(config = %cfg.path().display(), store = %store.display(), "kvpouch: opening store");

    let map: Arc<dyn AsyncMap> = Arc::new(RedbMap::open(&store)?);
    let level = AsyncMapLevel::new(Arc::clone(&map), cfg.location());
    level.open(&OpenOptions::default()).await?;

    let write = WriteOptions::default();
    match cli.command {
        Commands::Get { key } => {
            let value = level
                .get(key.into(), &GetOptions::default())
                .await?
                .into_string()?;
            println!("{value}");
        }
        Commands::Put { key, value } => {
            level.put(key.into(), value.into(), &write).await?;
        }
        Commands::Del { key } => {
            level.del(key.into(), &write).await?;
        }
        Commands::Batch { file } => {
            let ops = request::load_batch(&file)?;
            let report = level.batch(ops, &write).await?;
            print(cli.json, &report)?;
            if !report.is_complete() {
                anyhow::bail!("{} batch entries skipped", report.skipped.len());
            }
        }
        Commands::List => {
            let entries: Vec<Entry> = kvpouch_asyncmap::entries(map.as_ref())
                .await?
                .into_iter()
                .map(|(key, value)| Entry { key, value })
                .collect();
            print(cli.json, &entries)?;
        }
        Commands::Size => {
            println!("{}", map.size().await?);
        }
        Commands::Clear => {
            map.clear().await?;
        }
        Commands::Info => {
            print(cli.json, &level.info().await?)?;
        }
    }

    Ok(())
}
