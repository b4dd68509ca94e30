//! Entry point for the 2hire fleet reconciliation tool.
//! Runs reconciliations, manages webhook subscriptions and serves the callback receiver.

mod cli;
mod config;

use clap::Parser;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    cli::run(cli::Cli::parse()).await
}
