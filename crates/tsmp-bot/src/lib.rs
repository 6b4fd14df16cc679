//! # tsmp-bot
//!
//! The TSMP Discord bot. It runs on Discord's HTTP interactions model: the
//! interactions endpoint verifies each request, defers the reply, and the
//! command finishes by editing it.
//!
//! Commands: `/refresh` (push linked-role metadata) and `/reset-user`
//! (delete application and Minecraft link).

pub mod commands;
pub mod discord;
pub mod interactions;
pub mod role_metadata;
pub mod store;

use axum::Router;
use std::sync::Arc;
use tsmp_discord::InteractionVerifier;

use commands::{CommandRegistry, Refresh, ResetUser};
use discord::Responder;
use role_metadata::RoleMetadataSync;
use store::MemberStore;

pub struct BotState {
    pub verifier: InteractionVerifier,
    pub registry: CommandRegistry,
    pub responder: Arc<dyn Responder>,
}

/// Every command the bot serves.
pub fn default_registry(
    store: Arc<dyn MemberStore>,
    sync: Arc<dyn RoleMetadataSync>,
) -> CommandRegistry {
    CommandRegistry::new()
        .register(Refresh::new(sync))
        .register(ResetUser::new(store))
}

/// Router serving `POST /api/interactions`.
pub fn build_router(state: BotState) -> Router {
    Router::new()
        .nest("/api", interactions::router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

#[cfg(test)]
pub(crate) mod testing;
