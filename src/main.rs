use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use knowitall::storage::SkippedFolder;
use knowitall::{App, Config, FolderStore, Navigator, StorageManager};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "knowitall")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Keep folders, logs and preferences in this directory instead of the platform defaults
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List folders and how many cards each holds
    List,
    /// Report folder files that cannot be loaded
    Check,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = Config::config_path(cli.data_dir.as_deref())?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => Config::data_dir()?,
    };
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // The TUI owns the terminal, so logs go to a file unless asked otherwise
    init_logging(&data_dir, cli.log_stderr || cli.command.is_some())?;

    let config = Config::load_from(&config_path);
    let storage = StorageManager::new(config.resolve_folders_dir(&data_dir));
    info!("Loading folders from {:?}", storage.folders_dir());
    let (store, skipped) = FolderStore::load(storage)?;

    match cli.command {
        Some(Commands::List) => {
            for (i, folder) in store.folders().iter().enumerate() {
                println!("{:>3}. {} ({} cards)", i + 1, folder.name(), folder.len());
            }
            print_skipped(&skipped);
        }
        Some(Commands::Check) => {
            if skipped.is_empty() {
                println!("All {} folders loaded", store.len());
            } else {
                print_skipped(&skipped);
                return Ok(ExitCode::FAILURE);
            }
        }
        None => {
            let mut app = App::new(config, Navigator::new(store))?;
            if !skipped.is_empty() {
                let names: Vec<&str> = skipped.iter().map(|s| s.name.as_str()).collect();
                app.notify(format!("Could not load folders: {}", names.join(", ")), true);
            }
            app.run()?;
            app.config().save_to(&config_path)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(data_dir: &Path, to_stderr: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("knowitall=info"));

    if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    } else {
        let path = data_dir.join("knowitall.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    }
    Ok(())
}

fn print_skipped(skipped: &[SkippedFolder]) {
    for entry in skipped {
        eprintln!("skipped {} ({}): {}", entry.name, entry.path.display(), entry.reason);
    }
}
