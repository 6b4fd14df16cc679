//! # TSMP Server
//!
//! One binary for the website API and the Discord bot's interactions
//! endpoint, plus maintenance subcommands.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tsmp_api::AppState;
use tsmp_bot::role_metadata::{metadata_schema, RoleMetadataUpdater};
use tsmp_bot::BotState;
use tsmp_common::config::AppConfig;
use tsmp_db::Database;
use tsmp_discord::{DiscordClient, InteractionVerifier};
use tsmp_minecraft::{MojangClient, ServerApiClient};

#[derive(Parser)]
#[command(name = "tsmp", version, about = "TSMP website backend and Discord bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and serve HTTP (default)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Register slash commands and the linked-role schema with Discord
    RegisterCommands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = tsmp_common::config::init().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tsmp=debug,tower_http=debug".into()),
        )
        .with_target(true)
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            Database::connect(&config.database).await?.migrate().await
        }
        Command::RegisterCommands => register_commands(config).await,
    }
}

fn discord_client(config: &AppConfig) -> anyhow::Result<DiscordClient> {
    Ok(DiscordClient::new(
        &config.discord.application_id,
        &config.discord.bot_token,
        &config.discord.client_secret,
        Some(&config.discord.api_base),
        Duration::from_secs(config.discord.request_timeout_secs),
    )?)
}

async fn serve(config: &'static AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting TSMP v{}", env!("CARGO_PKG_VERSION"));

    let db = Database::connect(&config.database).await?;
    db.migrate().await?;

    let timeout = Duration::from_secs(config.minecraft.request_timeout_secs);
    let profiles = Arc::new(MojangClient::new(
        &config.minecraft.profile_api_url,
        &config.minecraft.session_api_url,
        timeout,
    )?);
    let minecraft = Arc::new(ServerApiClient::new(
        &config.minecraft.server_api_url,
        &config.minecraft.server_api_token,
        timeout,
    )?);
    let discord = Arc::new(discord_client(config)?);
    let db = Arc::new(db);

    // === Website API ===
    let api_state = AppState {
        users: db.clone(),
        market: db.clone(),
        health: db.clone(),
        profiles: profiles.clone(),
        minecraft,
        auth: config.auth.clone(),
        minecraft_config: config.minecraft.clone(),
        started_at: Instant::now(),
    };

    // === Discord bot ===
    let sync = Arc::new(RoleMetadataUpdater::new(db.clone(), discord.clone(), profiles));
    let bot_state = BotState {
        verifier: InteractionVerifier::from_hex(&config.discord.public_key)
            .context("discord.public_key")?,
        registry: tsmp_bot::default_registry(db, sync),
        responder: discord,
    };

    let router = tsmp_api::build_router(api_state).merge(tsmp_bot::build_router(bot_state));
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

async fn register_commands(config: &AppConfig) -> anyhow::Result<()> {
    let discord = discord_client(config)?;

    let registered = discord
        .bulk_overwrite_global_commands(&tsmp_bot::commands::definitions())
        .await?;
    tracing::info!(count = registered.len(), "Registered slash commands");

    let schema = discord.put_role_connection_metadata(&metadata_schema()).await?;
    tracing::info!(count = schema.len(), "Registered role connection metadata");
    Ok(())
}
