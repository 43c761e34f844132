use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use intake::botcheck::{BotVerifier, TurnstileVerifier};
use intake::routes::AppState;
use intake_notification::{LeadNotifier, ProviderClient};
use intake_store::{NoopStore, SqliteStore, SubmissionStore};
use sqlx::SqlitePool;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;

/// intake - contact/lead pipeline behind the Meridian Advisory site
#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Lead intake service: contact-form validation, storage and email notification", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = intake::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    intake::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: intake::config::Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting intake server...");

    let host = host_override.unwrap_or(config.server.host);
    let port = port_override.unwrap_or(config.server.port);

    // Lead store adapter: durable when a database is bound, log-only otherwise
    let (store, pool): (Arc<dyn SubmissionStore>, Option<SqlitePool>) =
        if config.database.url.is_empty() {
            tracing::info!("no database configured, lead persistence is log-only");
            (Arc::new(NoopStore), None)
        } else {
            let pool = SqlitePoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            let store = SqliteStore::new(pool.clone());
            store.migrate().await?;
            tracing::info!(url = %config.database.url, "lead store ready");
            (Arc::new(store), Some(pool))
        };

    // Notification adapter: disabled entirely without a provider API key
    let notifier = if config.email.api_key.is_empty() {
        tracing::warn!(
            "no email provider API key configured, lead notifications will fail with a 500"
        );
        LeadNotifier::disabled(config.email.from_address, config.email.contact_address)
    } else {
        LeadNotifier::new(
            Arc::new(ProviderClient::new(
                config.email.provider_url,
                config.email.api_key,
            )),
            config.email.from_address,
            config.email.contact_address,
        )
    };

    let bot_verifier: Option<Arc<dyn BotVerifier>> = if config.turnstile.enabled {
        tracing::info!("turnstile verification enabled");
        Some(Arc::new(TurnstileVerifier::new(
            config.turnstile.verify_url,
            config.turnstile.secret_key,
        )))
    } else {
        None
    };

    let state = AppState {
        store,
        notifier,
        bot_verifier,
        pool,
    };

    let app = intake::create_app(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: intake::config::Config) -> Result<()> {
    if config.database.url.is_empty() {
        anyhow::bail!("no database configured, nothing to migrate");
    }

    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    SqliteStore::new(pool).migrate().await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}
