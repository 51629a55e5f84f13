//! BANKER — table-side cash ledger for board games
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the saved game (or starts empty), and runs the console until
//! `quit` or end of input.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use banker::config::AppConfig;
use banker::console::Console;
use banker::engine::TransactionEngine;
use banker::ledger::Ledger;
use banker::storage::{JsonFileStore, StateRepository};

const BANNER: &str = r#"
 ____    _    _   _ _  _______ ____
| __ )  / \  | \ | | |/ / ____|  _ \
|  _ \ / _ \ |  \| | ' /|  _| | |_) |
| |_) / ___ \| |\  | . \| |___|  _ <
|____/_/   \_\_| \_|_|\_\_____|_| \_\

  Table-side banker. Type `help` for commands.
"#;

#[derive(Debug, Parser)]
#[command(name = "banker", version, about = "Table-side cash ledger for board games")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// State file (overrides the config)
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Ignore and delete any saved game
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;
    let state_file = cli
        .state_file
        .unwrap_or_else(|| PathBuf::from(&cfg.storage.state_file));

    println!("{BANNER}");
    info!(
        config = %cli.config.display(),
        state_file = %state_file.display(),
        starting_balance = cfg.game.starting_balance,
        "BANKER starting up"
    );

    // -- Restore or create state -----------------------------------------

    let store = JsonFileStore::new(state_file);
    let mut ledger = Ledger::new();
    if cli.fresh {
        store.clear();
    } else if let Some(saved) = store.load() {
        ledger.replace_state(saved);
    }

    // -- Console ---------------------------------------------------------

    let mut console = Console::new(ledger, TransactionEngine::new(), Box::new(store), cfg.game);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    console.run(stdin.lock(), &mut stdout)?;

    info!(state = %console.ledger().state(), "BANKER shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber. Logs go to stderr so they do not
/// mix with console output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("banker=warn"));

    if std::env::var("BANKER_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
