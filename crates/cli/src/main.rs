//! Tally CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! tally-cli migrate
//!
//! # Seed the database with demo data
//! tally-cli seed
//!
//! # Create an operator account
//! tally-cli operator create -e admin@example.com -n "Admin Name" -p <password>
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed database with demo operators, customers, and sales
//! - `operator create` - Create operator accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tally-cli")]
#[command(author, version, about = "Tally CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed,
    /// Manage operator accounts
    Operator {
        #[command(subcommand)]
        action: OperatorAction,
    },
}

#[derive(Subcommand)]
enum OperatorAction {
    /// Create a new operator account
    Create {
        /// Operator email address
        #[arg(short, long)]
        email: String,

        /// Operator display name
        #[arg(short, long)]
        name: String,

        /// Operator password
        #[arg(short, long)]
        password: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Operator { action } => match action {
            OperatorAction::Create {
                email,
                name,
                password,
            } => {
                commands::operator::create(&email, &name, &password).await?;
            }
        },
    }
    Ok(())
}
