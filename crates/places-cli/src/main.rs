//! places: command-line access to the places store.
//!
//! Records live in `<data-dir>/places.json` and settings in
//! `<data-dir>/settings.json`. Every command talks to the store through the
//! same correlated client a UI surface would use.

mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use places_core::defaults::{DATA_DIR, ENV_DATA_DIR};

#[derive(Parser)]
#[command(name = "places")]
#[command(author, version, about = "Bookmarks, history, and bookmark backups")]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory (default: $PLACES_DATA_DIR or ./.places)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a Netscape bookmark file
    Import {
        /// Bookmark file to read
        file: PathBuf,
    },

    /// Export bookmarks as a Netscape bookmark file
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List bookmarks, or history with --history
    List {
        /// List history instead of bookmarks
        #[arg(long)]
        history: bool,

        /// Only show entries whose title or URL contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Bookmark a URL
    Add {
        /// URL; https:// is assumed when no scheme is given
        url: String,

        /// Title (default: the URL)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Remove a bookmark, keeping it in history
    Delete {
        url: String,

        /// Delete the record entirely instead
        #[arg(long)]
        history: bool,
    },

    /// Delete all history entries that are not bookmarked
    ClearHistory,

    /// Run one backup check now
    Backup,

    /// Run the backup scheduler until interrupted
    Watch,
}

/// `--data-dir`, then `$PLACES_DATA_DIR`, then the default.
fn resolve_data_dir(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}

/// Initialize tracing on stderr, keeping stdout for command output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "places=warn")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "places=warn".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = Path::new(path);
        let file_dir = path.parent().unwrap_or(Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("places.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir, std::env::var(ENV_DATA_DIR).ok());

    match commands::run(cli.command, &data_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
