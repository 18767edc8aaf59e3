mod commands;
mod error;
mod session;

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use medtrack_db::{AppConfig, JsonStore};
use tracing::debug;

use crate::session::Session;

#[derive(Debug, Parser)]
#[command(name = "medtrack")]
#[command(about = "Interactive medication tracker", version)]
struct Cli {
    /// Directory holding medications.json and daily.json (overrides the config file).
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Path to a YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log debug output to stderr.
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    debug!(?config, "configuration");

    let store = JsonStore::from_config(&config);
    let manager = store
        .load(Local::now().date_naive())
        .map_err(|err| format!("Failed to load data from '{}': {err}", config.data_dir.display()))?;

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), manager, store, config, now);
    session
        .run()
        .map_err(|err| format!("Console I/O failed: {err}"))
}

fn now() -> chrono::NaiveDateTime {
    Local::now().naive_local()
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        "medtrack_cli=debug,medtrack_core=debug,medtrack_db=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
