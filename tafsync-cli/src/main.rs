//! tafsync: record TeddyCloud audio ids in tonies-json descriptors.
//!
//! # Usage
//!
//! ```text
//! tafsync run [--dry-run] [--json]
//! tafsync prepare
//! tafsync locate <model>
//! ```
//!
//! All connection and repository settings come from flags or the
//! environment (`TEDDYCLOUD_API`, `TONIES_JSON_REPO_PATH`, ...); see
//! `tafsync <command> --help`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use commands::{locate::LocateArgs, prepare::PrepareArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tafsync",
    version,
    about = "Sync audio ids from a TeddyCloud library into tonies-json descriptors",
    long_about = None,
)]
struct Cli {
    /// Log level: error, warn, info, debug, or trace (`warning` and `critical` also work).
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the library, patch descriptors, then commit and push.
    Run(RunArgs),

    /// Clone or reset the descriptor working copy onto the update branch.
    Prepare(PrepareArgs),

    /// Print the descriptor path for a model.
    Locate(LocateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Prepare(args) => args.run(),
        Commands::Locate(args) => args.run(),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let parsed = parse_level(level);
    let filter = EnvFilter::default().add_directive(parsed.unwrap_or(LevelFilter::INFO).into());
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if parsed.is_none() {
        tracing::warn!(level, "unknown log level, falling back to info");
    }
}

/// Parse a level name, accepting `warning` and `critical` as aliases.
fn parse_level(level: &str) -> Option<LevelFilter> {
    let level = level.trim().to_ascii_lowercase();
    let level = match level.as_str() {
        "warning" => "warn",
        "critical" | "fatal" => "error",
        "" => return None,
        other => other,
    };
    level.parse().ok()
}
