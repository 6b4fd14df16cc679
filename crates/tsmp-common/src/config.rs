//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup. Later calls return the
/// configuration loaded by the first one.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let app_config = load(
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            // Environment variables (TSMP__SERVER__PORT, TSMP__DATABASE__URL, etc.)
            .add_source(
                config::Environment::with_prefix("TSMP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            ),
    )?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Apply defaults on top of `builder` and deserialize.
fn load(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<AppConfig, config::ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("auth.session_cookie", "tsmp_session")?
        .set_default("discord.api_base", "https://discord.com/api/v10")?
        .set_default("discord.client_secret", "")?
        .set_default("discord.request_timeout_secs", 10)?
        .set_default("minecraft.profile_api_url", "https://api.mojang.com")?
        .set_default("minecraft.session_api_url", "https://sessionserver.mojang.com")?
        .set_default("minecraft.server_api_token", "")?
        .set_default(
            "minecraft.item_image_url",
            "https://mc.nerothe.com/img/1.19.2/{name}.png",
        )?
        .set_default("minecraft.request_timeout_secs", 5)?
        .build()?
        .try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub discord: DiscordConfig,
    pub minecraft: MinecraftConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the website's login flow, which issues the session tokens.
    pub jwt_secret: String,
    /// Cookie consulted when no `Authorization` header is present.
    pub session_cookie: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiscordConfig {
    pub api_base: String,
    /// Application (client) id; also the id interactions are addressed to.
    pub application_id: String,
    pub bot_token: String,
    /// Hex-encoded Ed25519 key from the developer portal, used to verify interactions.
    pub public_key: String,
    /// OAuth2 client secret, needed to refresh user tokens for role connections.
    pub client_secret: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MinecraftConfig {
    /// Mojang profile API base (name → profile).
    pub profile_api_url: String,
    /// Mojang session server base (uuid → profile).
    pub session_api_url: String,
    /// Base URL of the HTTP bridge plugin running on the Minecraft server.
    pub server_api_url: String,
    pub server_api_token: String,
    /// Item texture URL template; `{name}` is replaced by the lower-case item name.
    pub item_image_url: String,
    pub request_timeout_secs: u64,
}

impl MinecraftConfig {
    /// Render the image URL for an item kind.
    pub fn item_image(&self, name: &str) -> String {
        self.item_image_url
            .replace("{name}", &name.to_ascii_lowercase())
    }
}
