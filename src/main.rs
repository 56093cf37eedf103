/// Main entry point for the Habit Stats MCP server
///
/// Sets up logging, picks the database location, and hands control to the
/// JSON-RPC loop on stdin/stdout.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use habit_stats::HabitServer;

/// Command line arguments for the Habit Stats MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, the first writable standard location is used
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Candidate directories for the database, in order of preference:
/// a dotdir in the home directory, then the platform data and config
/// directories, then the working directory
fn candidate_data_dirs() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".habit_stats"));
    }
    if let Some(data) = dirs::data_dir() {
        candidates.push(data.join("habit_stats"));
    }
    if let Some(config) = dirs::config_dir() {
        candidates.push(config.join("habit_stats"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(".habit_stats"));
    }

    candidates
}

/// Whether we can actually create files in this directory
///
/// `create_dir_all` succeeding is not enough on its own (read-only mounts,
/// permission quirks), so probe with a real write.
fn is_writable(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let probe = dir.join(".write_probe");
    let writable = std::fs::write(&probe, b"probe").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}

/// Pick a database path: the first writable candidate, falling back to the
/// temp directory so the server can always come up
fn default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    for dir in candidate_data_dirs() {
        if is_writable(&dir) {
            return Ok(dir.join("habits.db"));
        }
    }

    let fallback = std::env::temp_dir().join("habit_stats");
    std::fs::create_dir_all(&fallback)?;
    tracing::warn!(
        "No standard data directory is writable, using {}",
        fallback.display()
    );
    Ok(fallback.join("habits.db"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // Logs go to stderr; stdout belongs to the JSON-RPC stream
    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_stats={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Habit Stats MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitServer::new(db_path).await?;
    server.run().await?;

    info!("Habit Stats MCP server shutdown complete");
    Ok(())
}
