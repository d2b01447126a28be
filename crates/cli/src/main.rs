//! liftlog CLI - inspect and edit persisted app state

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli_lib::system_config::{self, SystemConfig};
use cli_lib::{cmd, util};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::DurableStore;
use tracing::Level;

/// liftlog - debounced persistent state for workout tracking
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store directory (overrides store.path from the config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value stored under a key
    Get {
        /// Store key
        key: String,
    },
    /// Write one or more values to a key through a debounced cell
    Set {
        /// Store key
        key: String,
        /// Values (JSON, or plain text stored as a string)
        #[arg(required = true)]
        values: Vec<String>,
        /// Delay between successive values in milliseconds (default: 0)
        #[arg(long, default_value = "0")]
        interval_ms: u64,
    },
    /// List stored keys
    List,
    /// Remove a key
    Rm {
        /// Store key
        key: String,
    },
    /// View or edit configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    /// List all configuration values
    #[arg(long)]
    list: bool,
    /// Print one value (e.g. sync.cooldown_ms)
    #[arg(long, value_name = "KEY")]
    get: Option<String>,
    /// Set one value
    #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
    set: Option<Vec<String>>,
    /// Print the config file path
    #[arg(long)]
    path: bool,
    /// With --path, create the file if missing
    #[arg(long, requires = "path")]
    create: bool,
    /// Print an example configuration
    #[arg(long)]
    example: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let store_flag = cli.store.as_deref();

    match cli.command {
        Commands::Get { key } => {
            let (_, store) = open(store_flag)?;
            cmd::get::run(store, &key).await
        }
        Commands::Set { key, values, interval_ms } => {
            let (config, store) = open(store_flag)?;
            cmd::set::run(store, &config.sync, &key, &values, interval_ms).await
        }
        Commands::List => {
            let (_, store) = open(store_flag)?;
            cmd::list::run(store).await
        }
        Commands::Rm { key } => {
            let (_, store) = open(store_flag)?;
            cmd::rm::run(store, &key).await
        }
        Commands::Config(args) => run_config(&args).await,
    }
}

/// Load configuration and open the store it (or the flag) points at
fn open(store_flag: Option<&Path>) -> Result<(SystemConfig, Arc<dyn DurableStore>)> {
    let config = system_config::load()?;
    let store_dir = util::resolve_store_dir(store_flag, &config)?;
    let store = util::open_store(&store_dir)?;
    Ok((config, store))
}

async fn run_config(args: &ConfigArgs) -> Result<()> {
    if args.list {
        cmd::config::run_list().await
    } else if let Some(key) = &args.get {
        cmd::config::run_get(key).await
    } else if let Some(pair) = &args.set {
        cmd::config::run_set(&pair[0], &pair[1]).await
    } else if args.path {
        cmd::config::run_path(args.create).await
    } else if args.example {
        cmd::config::run_example().await
    } else {
        cmd::config::run_list().await
    }
}
