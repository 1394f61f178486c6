//! JsonDB CLI
//!
//! Command-line tools for inspecting and editing a JsonDB directory.
//!
//! # Commands
//!
//! - `list` - List collections with their shape, size and item count
//! - `show` - Print a whole collection
//! - `get` - Print the value at a dot-notation path
//! - `set` - Write a value at a dot-notation path
//! - `drop` - Remove one collection file
//! - `delete-all` - Remove every collection file

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// JsonDB command-line database tools.
#[derive(Parser)]
#[command(name = "jsondb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List collections
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a whole collection as JSON
    Show {
        /// Collection name
        collection: String,
    },

    /// Print the value at a path, e.g. `settings.theme` or `teams[0].name`
    Get {
        /// Collection name
        collection: String,
        /// Dot-notation path
        key_path: String,
    },

    /// Write a value at a path, creating the collection if needed
    Set {
        /// Collection name
        collection: String,
        /// Dot-notation path
        key_path: String,
        /// JSON value (bare text is stored as a string)
        value: String,
    },

    /// Remove one collection file
    Drop {
        /// Collection name
        collection: String,
    },

    /// Remove every collection file
    DeleteAll {
        /// Dry run - show what would be deleted
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List { format } => {
            let path = cli.path.ok_or("Database path required for list")?;
            commands::list::run(&path, &format)?;
        }
        Commands::Show { collection } => {
            let path = cli.path.ok_or("Database path required for show")?;
            commands::show::run(&path, &collection)?;
        }
        Commands::Get {
            collection,
            key_path,
        } => {
            let path = cli.path.ok_or("Database path required for get")?;
            commands::get::run(&path, &collection, &key_path)?;
        }
        Commands::Set {
            collection,
            key_path,
            value,
        } => {
            let path = cli.path.ok_or("Database path required for set")?;
            commands::set::run(&path, &collection, &key_path, &value)?;
        }
        Commands::Drop { collection } => {
            let path = cli.path.ok_or("Database path required for drop")?;
            commands::delete::drop(&path, &collection)?;
        }
        Commands::DeleteAll { dry_run } => {
            let path = cli.path.ok_or("Database path required for delete-all")?;
            commands::delete::delete_all(&path, dry_run)?;
        }
        Commands::Version => {
            println!("JsonDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("JsonDB Core v{}", jsondb_core::VERSION);
        }
    }

    Ok(())
}
