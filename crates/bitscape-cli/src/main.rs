//! Bitscape CLI - inspect, sync and manage FM patches from the terminal.

mod commands;

use bitscape_config::{Settings, paths};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::common::Context;

#[derive(Parser)]
#[command(name = "bitscape")]
#[command(author, version, about = "Bitscape FM patch tools", long_about = None)]
struct Cli {
    /// Patch library directory (overrides the settings file)
    #[arg(long, global = true)]
    library_dir: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show operators, routing and mod depths of a patch file
    Info(commands::info::InfoArgs),

    /// Print the engine calls one sync pass would send
    Sync(commands::sync::SyncArgs),

    /// Replay a JSON list of edit actions and print the resulting calls
    Replay(commands::replay::ReplayArgs),

    /// List the reference algorithms
    Algorithms,

    /// Manage the patch library
    Library(commands::library::LibraryArgs),

    /// Inspect or edit the last-session slot
    Session(commands::session::SessionArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.settings.unwrap_or_else(paths::settings_path);
    let settings = Settings::load_or_default(&settings_path)?;
    init_tracing(&settings);

    let library_dir = cli.library_dir.unwrap_or_else(|| settings.library_dir());
    tracing::debug!(
        settings = %settings_path.display(),
        library = %library_dir.display(),
        "resolved paths"
    );
    let ctx = Context {
        settings,
        library_dir,
    };

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Replay(args) => commands::replay::run(&ctx, args),
        Commands::Algorithms => commands::algorithms::run(),
        Commands::Library(args) => commands::library::run(&ctx, args),
        Commands::Session(args) => commands::session::run(&ctx, args),
    }
}

/// Log to stderr. `RUST_LOG` wins over the settings file; default `info`.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            settings
                .log_filter
                .as_deref()
                .and_then(|f| EnvFilter::try_new(f).ok())
        })
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
