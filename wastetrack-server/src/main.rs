use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wastetrack_config::{Config, ConfigLoader, db_url::redact_database_url};
use wastetrack_core::database::{CollectionLogRepository, PostgresDatabase};
use wastetrack_server::{
    AppState, create_app,
    infra::startup::{ProdStartupHooks, StartupHooks},
    qr::{self, HouseholdRange},
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "wastetrack-server")]
#[command(about = "Household waste collection scanner and daily log seeder")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Path to a TOML config file
    #[arg(long, env = "WASTETRACK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert today's pending rows for every household and exit
    Seed,
    /// Write a QR code PNG for each household
    Qr(QrArgs),
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(ClapArgs, Debug)]
struct QrArgs {
    /// Directory the `<id>.png` files are written to
    #[arg(long, default_value = "qrcodes")]
    out: PathBuf,

    /// Household numbers such as `1-100` (H001..H100) instead of the
    /// households stored in the database
    #[arg(long)]
    range: Option<HouseholdRange>,
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    let config = load_runtime_config(&cli.serve)?;

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => {
            let database = connect_database(&config).await?;
            database
                .run_migrations()
                .await
                .context("failed to apply migrations")?;
            info!("migrations applied");
            database.close().await;
            Ok(())
        }
        Some(Command::Seed) => {
            let database = prepare_database(&config).await?;
            let state = build_state(config, &database);
            let report = state
                .seeder()
                .seed()
                .await
                .context("daily seeding failed")?;
            info!(day = %report.day, inserted = report.inserted, "seed complete");
            database.close().await;
            Ok(())
        }
        Some(Command::Qr(args)) => export_qr_codes(&config, args).await,
        None => serve(config).await,
    }
}

async fn export_qr_codes(config: &Config, args: QrArgs) -> anyhow::Result<()> {
    let ids = match args.range {
        Some(range) => range.ids(),
        None => {
            let database = connect_database(config).await?;
            let ids = database
                .collection_logs()
                .household_ids()
                .await
                .context("failed to list households")?;
            database.close().await;
            ids
        }
    };

    if ids.is_empty() {
        warn!("no households to encode");
        return Ok(());
    }

    let out = args.out;
    tokio::task::spawn_blocking(move || qr::write_codes(&ids, &out))
        .await
        .context("QR export task panicked")??;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_runtime_config(args: &ServeArgs) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = args.config.clone() {
        loader = loader.with_config_path(path);
    }

    let load = loader.load().context("failed to load configuration")?;
    let mut config = load.config;

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "loaded config file");
    }
    for warning in &load.warnings.items {
        match warning.hint.as_deref() {
            Some(hint) => warn!(hint, "{}", warning.message),
            None => warn!("{}", warning.message),
        }
    }

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }

    Ok(config)
}

async fn connect_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let url = config.database.primary_url.as_deref().ok_or_else(|| {
        anyhow!(
            "database is not configured; set DATABASE_URL or the DB_* variables"
        )
    })?;

    let origin = config
        .metadata
        .database_url_origin
        .map(|origin| origin.to_string());
    info!(
        url = %redact_database_url(url),
        origin = origin.as_deref().unwrap_or("unknown"),
        "connecting to database"
    );
    let database =
        PostgresDatabase::connect(url, config.database.pool_settings())
            .await
            .context("failed to connect to database")?;
    info!("database connection pool established");
    Ok(database)
}

async fn prepare_database(config: &Config) -> anyhow::Result<PostgresDatabase> {
    let database = connect_database(config).await?;
    if config.database.run_migrations {
        database
            .run_migrations()
            .await
            .context("failed to apply migrations")?;
        info!("migrations applied");
    }
    Ok(database)
}

fn build_state(config: Config, database: &PostgresDatabase) -> AppState {
    AppState::new(Arc::new(config), Arc::new(database.collection_logs()))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let database = prepare_database(&config).await?;
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = build_state(config, &database);
    ProdStartupHooks
        .run(&state)
        .await
        .context("startup hooks failed")?;

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
