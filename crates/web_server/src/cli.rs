use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Result;
use clap::{Parser, Subcommand};
use fleet_reconcile::{
    JsonReporter, LocalClock, LogReporter, ReconcileConfig, ReconcileExecutor, ReportSink,
};
use two_hire::{ApiConfig, TwoHireClient, WebhookConfig, WebhookService};
use web_handlers::{CALLBACK_PATH, configure_callback_routes};

use crate::config::ServerConfig;

/// Reconcile a 2hire site's admin and user fleets and manage its webhooks.
#[derive(Parser, Debug)]
#[clap(
    name = "fleet-reconcile",
    version,
    about = "Compare the operator and end-user views of a 2hire fleet"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one reconciliation for every configured asset type
    Reconcile {
        /// Print one JSON document per line on stdout instead of log lines
        #[clap(long)]
        json: bool,
    },
    /// Start the webhook callback receiver
    Serve {
        /// Address to bind, overrides CALLBACK_HOST
        #[clap(long)]
        host: Option<String>,
        /// Port to listen on, overrides CALLBACK_PORT
        #[clap(long)]
        port: Option<u16>,
    },
    /// Manage webhook subscriptions
    Webhooks {
        #[clap(subcommand)]
        action: WebhookAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookAction {
    /// Register the callback URL for a topic
    Subscribe {
        /// Event topic, e.g. vehicle:status
        #[clap(long)]
        topic: String,
    },
    /// Remove the callback URL from a topic
    Unsubscribe {
        #[clap(long)]
        topic: String,
    },
    /// List the registered webhooks
    List,
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reconcile { json } => reconcile(json).await,
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Webhooks { action } => webhooks(action).await,
    }
}

async fn reconcile(json: bool) -> Result<()> {
    let api_config = ApiConfig::from_env()?;
    let config = ReconcileConfig::from_env()?;
    let client = TwoHireClient::new(&api_config)?;

    let sink: Arc<dyn ReportSink> = if json {
        Arc::new(JsonReporter::new(std::io::stdout()))
    } else {
        Arc::new(LogReporter)
    };

    let executor = ReconcileExecutor::new(config, Arc::new(client), Arc::new(LocalClock), sink);
    let outcomes = executor.run().await?;

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .map(|outcome| outcome.asset_type.as_str())
        .collect();

    if failed.is_empty() {
        log::info!("✅ Reconciled {} asset types", outcomes.len());
    } else {
        log::warn!(
            "⚠️ Reconciled {} of {} asset types, failed: {}",
            outcomes.len() - failed.len(),
            outcomes.len(),
            failed.join(", ")
        );
    }

    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = ServerConfig::from_env()?.with_overrides(host, port);

    log::info!("🚀 Starting 2hire callback receiver...");
    log::info!(
        "🌐 Callbacks will be accepted at: http://{}:{}{}",
        config.host,
        config.port,
        CALLBACK_PATH
    );

    HttpServer::new(|| {
        App::new()
            .wrap(Logger::default())
            .configure(configure_callback_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

async fn webhooks(action: WebhookAction) -> Result<()> {
    let client = TwoHireClient::new(&ApiConfig::from_env()?)?;
    let service = WebhookService::new(client, WebhookConfig::from_env()?);

    let response = match action {
        WebhookAction::Subscribe { topic } => service.subscribe(&topic).await?,
        WebhookAction::Unsubscribe { topic } => service.unsubscribe(&topic).await?,
        WebhookAction::List => service.list().await?,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
