use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use routine_config::{Config, ConfigLoad, ConfigLoader, StorageBackend};
use routine_core::{
    CompanyRepository, CompanyService, InMemoryCompanyRepository,
    PostgresDatabase,
    query::{Paginator, default_registry, mappings},
};
use routine_server::{AppState, build_router};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "routine-server")]
#[command(about = "Company and employee API with sortable, paged listings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        return run_db_migrate(&cli.serve).await;
    }

    run_server(cli.serve).await
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &args.env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

async fn connect_postgres(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config
        .database
        .primary_url
        .as_deref()
        .context("DATABASE_URL is required when storage is postgres")?;
    let max_connections = config
        .database
        .max_connections
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    PostgresDatabase::connect(url, max_connections)
        .await
        .context("failed to connect to PostgreSQL")
}

async fn run_db_migrate(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(args)?;
    let database = connect_postgres(&config).await?;
    database
        .migrate()
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let registry = default_registry().context("failed to build sort mappings")?;
    mappings::self_check(&registry).context("sort mapping self-check failed")?;
    info!(pairs = registry.len(), "sort mappings registered");

    let repository: Arc<dyn CompanyRepository> = match config.storage {
        StorageBackend::Postgres => {
            let database = connect_postgres(&config).await?;
            database
                .migrate()
                .await
                .context("database migration failed")?;
            info!(pool = ?database.pool_stats(), "using PostgreSQL storage");
            Arc::new(database.companies().clone())
        }
        StorageBackend::Memory => {
            warn!("using seeded in-memory storage");
            Arc::new(InMemoryCompanyRepository::seeded())
        }
    };

    let paginator = Paginator::new(config.paging.max_page_size)
        .with_default_page_size(config.paging.default_page_size);
    let service = CompanyService::new(repository, Arc::new(registry), paginator);

    Ok(AppState::new(service, config))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_runtime_config(&args)?;
    let addr = config.bind_address();
    let state = build_state(config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Routine server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
