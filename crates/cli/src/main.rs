mod auth_commands;
mod booking_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Result,
    clap::{Parser, Subcommand},
    sayvai_bookings::BookingsClient,
    sayvai_config::SayvaiConfig,
    sayvai_oauth::TokenManager,
    sayvai_tools::{ToolRegistry, register_booking_tools},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "sayvai", about = "Sayvai: Zoho Bookings tools for LLM agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of discovering `sayvai.{toml,yaml,yml,json}`.
    #[arg(long, global = true, env = "SAYVAI_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Zoho OAuth credential management.
    Auth {
        #[command(subcommand)]
        action: auth_commands::AuthAction,
    },
    /// Call the Bookings API directly.
    Bookings {
        #[command(subcommand)]
        action: booking_commands::BookingAction,
    },
    /// Print the agent tool schemas as JSON.
    Tools,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> Result<SayvaiConfig> {
    match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config from --config");
            sayvai_config::load_config(path)
        },
        None => Ok(sayvai_config::discover_and_load()),
    }
}

/// Token manager and Bookings client sharing one configuration.
pub(crate) fn build_client(config: &SayvaiConfig) -> Result<BookingsClient> {
    let tokens = Arc::new(TokenManager::from_config(config)?);
    BookingsClient::from_config(config, tokens)
}

fn print_tools(config: &SayvaiConfig) -> Result<()> {
    let mut registry = ToolRegistry::new();
    register_booking_tools(&mut registry, Arc::new(build_client(config)?));
    println!(
        "{}",
        serde_json::to_string_pretty(&registry.list_schemas())?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "sayvai starting");
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Auth { action } => auth_commands::handle_auth(action, &config).await,
        Commands::Bookings { action } => booking_commands::handle_bookings(action, &config).await,
        Commands::Tools => print_tools(&config),
    }
}
