mod commands;
mod error;
mod logging;
mod models;
mod paths;
mod store;
mod views;
mod youtube;

use clap::{Parser, Subcommand};
use anyhow::Result;

#[derive(Parser)]
#[command(name = "vidmark", version, about = "Bookmark YouTube videos with notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the collection title
    Home,

    /// Bookmark a video
    #[command(alias = "a")]
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// YouTube watch URL (https://www.youtube.com/watch?v=...)
        #[arg(short, long)]
        url: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List bookmarks, optionally filtered by name
    #[command(alias = "ls")]
    List {
        /// Case-insensitive text to look for in names
        search: Option<String>,
    },

    /// Show every field of one bookmark
    Show {
        id: u64,
    },

    /// Open a bookmarked video in the browser
    Open {
        id: u64,
    },

    Config {
        key: String,
        value: String,
    },

    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = paths::AppPaths::init()?;
    let cfg = store::load_config(&paths.config_file);
    if logging::init_logging(&paths.log_file, &cfg.log_level).is_err() {
        logging::init_logging_stderr();
    }

    match cli.command {
        Commands::Home => commands::home(&paths),
        Commands::Add { name, url, notes } => commands::add(&paths, name, url, notes),
        Commands::List { search } => commands::list(&paths, search.as_deref()),
        Commands::Show { id } => commands::show(&paths, id),
        Commands::Open { id } => commands::open(&paths, id),
        Commands::Config { key, value } => commands::config(&paths, &key, &value),
        Commands::Info => commands::info(&paths),
    }
}
