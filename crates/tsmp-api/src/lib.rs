//! # tsmp-api
//!
//! HTTP surface of the TSMP website: the admin IGN lookup, the market RPCs,
//! and the health probe. Storage and the Minecraft side are reached through
//! traits held in [`AppState`], so the router can be driven against fakes.

pub mod auth;
pub mod middleware;
pub mod routes;
pub mod store;

use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tsmp_common::config::{AuthConfig, MinecraftConfig};
use tsmp_minecraft::{MinecraftServer, ProfileResolver};

use store::{HealthProbe, MarketStore, UserDirectory};

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub market: Arc<dyn MarketStore>,
    pub health: Arc<dyn HealthProbe>,
    /// Mojang name/uuid resolution
    pub profiles: Arc<dyn ProfileResolver>,
    /// Live inventories on the game server
    pub minecraft: Arc<dyn MinecraftServer>,
    pub auth: AuthConfig,
    pub minecraft_config: MinecraftConfig,
    pub started_at: Instant,
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let api_routes = Router::new()
        .merge(routes::admin::router(&state))
        .merge(routes::market::router(&state))
        .merge(routes::health::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod testing;
