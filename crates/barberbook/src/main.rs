// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BarberBook operator CLI.
//!
//! Every subcommand works directly on the configured SQLite database.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod account;
mod app;
mod chats;
mod offers;
mod output;
mod shops;

use std::path::PathBuf;

use barberbook_config::BarberBookConfig;
use barberbook_core::BarberError;
use clap::{Parser, Subcommand};

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "barberbook", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or upgrade the database schema.
    Migrate,
    /// Manage shop offers.
    #[command(subcommand)]
    Offers(offers::OffersCommand),
    /// Read and answer customer chats.
    #[command(subcommand)]
    Chats(chats::ChatsCommand),
    /// Shop dashboards.
    #[command(subcommand)]
    Shops(shops::ShopsCommand),
    /// Sign in and out with the local credential cache.
    #[command(subcommand)]
    Account(account::AccountCommand),
}

fn load_config(path: Option<&std::path::Path>) -> Option<BarberBookConfig> {
    let loaded = match path {
        Some(path) => barberbook_config::load_and_validate_path(path),
        None => barberbook_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => Some(config),
        Err(errors) => {
            barberbook_config::render_errors(&errors);
            None
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("barberbook={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: BarberBookConfig) -> Result<(), BarberError> {
    let app = App::open(config).await?;
    let json = cli.json;
    let result = match cli.command {
        Commands::Migrate => {
            output::line(format!(
                "database ready at {}",
                app.config.storage.database_path
            ));
            Ok(())
        }
        Commands::Offers(cmd) => offers::run(&app, cmd, json).await,
        Commands::Chats(cmd) => chats::run(&app, cmd, json).await,
        Commands::Shops(cmd) => shops::run(&app, cmd, json).await,
        Commands::Account(cmd) => account::run(&app, cmd, json).await,
    };
    app.close().await?;
    result
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(config) = load_config(cli.config.as_deref()) else {
        std::process::exit(1);
    };
    init_tracing(&config.app.log_level);

    if let Err(err) = run(cli, config).await {
        tracing::debug!(error = %err, "command failed");
        eprintln!("barberbook: {}", err.user_message());
        std::process::exit(1);
    }
}
