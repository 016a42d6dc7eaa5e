//! Full Stack Toolkit CLI - Database bootstrap and user management.
//!
//! # Usage
//!
//! ```bash
//! # Create collections, validators, indexes and sample data
//! fs-cli seed
//! fs-cli seed --uri mongodb://localhost:27017 --database fullstack_dev
//!
//! # Manage users through the REST API (FULLSTACK_API_URL)
//! fs-cli users list
//! fs-cli users create -u jdoe -e jdoe@example.com --first-name John
//! fs-cli users count --inactive
//! ```
//!
//! # Commands
//!
//! - `seed` - Bootstrap the `MongoDB` database
//! - `users` - List, look up, create, update, delete and (de)activate users

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::users::UserAction;

#[derive(Parser)]
#[command(name = "fs-cli")]
#[command(author, version, about = "Full Stack Toolkit CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create collections, indexes and sample data (run once)
    Seed {
        /// `MongoDB` connection string (default: `MONGODB_URI`)
        #[arg(long)]
        uri: Option<String>,

        /// Database name (default: `MONGODB_DATABASE` or `fullstack_dev`)
        #[arg(long)]
        database: Option<String>,
    },
    /// Manage users through the REST API
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { uri, database } => commands::seed::run(uri, database).await?,
        Commands::Users { action } => commands::users::run(action).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "fs-cli", "users", "create", "-u", "jdoe", "-e", "jdoe@example.com", "--first-name",
            "John",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Users {
                action: UserAction::Create { .. }
            })
        ));
    }

    #[test]
    fn test_parse_seed_defaults() {
        let cli = Cli::try_parse_from(["fs-cli", "seed"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                uri: None,
                database: None
            })
        ));
    }
}
