use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grand_slams::api::state::AppState;
use grand_slams::api::{build_router, cors_layer};
use grand_slams::config::AppConfig;
use grand_slams::ingest::Loader;
use grand_slams::storage::{self, schema};

#[derive(Parser)]
#[command(name = "grand-slams")]
#[command(about = "Tennis tournament statistics: CSV loader and reporting API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// SQLite connection string (overrides the config file)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    InitDb,

    /// Bulk load the CSV files into the database
    Load {
        /// Directory holding Tournament.csv, Players.csv, ...
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting grand-slams v{}", env!("CARGO_PKG_VERSION"));

    let pool = storage::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    schema::create_tables(&pool)
        .await
        .context("Failed to create tables")?;

    match cli.command {
        Commands::InitDb => {
            tracing::info!("Database ready at {}", config.database_url);
        }
        Commands::Load { data_dir } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let loader = Loader::new(data_dir);
            let summary = loader
                .load_all(&pool)
                .await
                .with_context(|| format!("Load from {} failed", loader.data_dir().display()))?;

            tracing::info!(
                "Loaded {} tournaments, {} players, {} matches, {} match stats, {} player matches",
                summary.tournaments,
                summary.players,
                summary.matches,
                summary.match_stats,
                summary.player_matches
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            let app = build_router(AppState::new(pool))
                .layer(cors_layer(&config.server.cors_origin));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
