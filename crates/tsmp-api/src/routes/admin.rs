//! Admin routes: find the TSMP user behind an in-game name.

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::{Query, QueryRejection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tsmp_common::error::TsmpError;
use tsmp_common::models::discord_account;
use tsmp_minecraft::MinecraftError;

use crate::{middleware as mw, AppState};

/// Admin routes (authenticated, admin only).
pub fn router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/ign-lookup", get(ign_lookup))
        .route_layer(middleware::from_fn_with_state(state.clone(), mw::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), mw::auth_middleware))
}

#[derive(Deserialize)]
struct LookupParams {
    /// Every `ign` value in the query string
    #[serde(default)]
    ign: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LookupResponse {
    #[serde(rename = "minecraftUUID")]
    minecraft_uuid: String,
    #[serde(rename = "minecraftUsername")]
    minecraft_username: String,
    #[serde(rename = "discordId")]
    discord_id: Option<String>,
}

/// Lookup failures. The three expected outcomes use a bare `{"error"}` body.
#[derive(Debug)]
enum LookupError {
    InvalidIgn,
    AccountNotFound,
    TsmpAccountNotFound,
    Upstream(TsmpError),
}

impl From<TsmpError> for LookupError {
    fn from(e: TsmpError) -> Self {
        Self::Upstream(e)
    }
}

impl From<MinecraftError> for LookupError {
    fn from(e: MinecraftError) -> Self {
        Self::Upstream(e.into())
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidIgn => (StatusCode::BAD_REQUEST, "Invalid IGN"),
            Self::AccountNotFound => (StatusCode::NOT_FOUND, "Account not found"),
            Self::TsmpAccountNotFound => (StatusCode::NOT_FOUND, "TSMP account not found"),
            Self::Upstream(e) => return e.into_response(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// GET /api/admin/ign-lookup?ign=<name>
async fn ign_lookup(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<LookupResponse>, LookupError> {
    let ign = match params {
        Ok(Query(LookupParams { mut ign })) if ign.len() == 1 => ign.remove(0),
        _ => return Err(LookupError::InvalidIgn),
    };

    let profile = state
        .profiles
        .profile_by_name(&ign)
        .await?
        .ok_or(LookupError::AccountNotFound)?;

    let user = state
        .users
        .user_by_minecraft_uuid(profile.id)
        .await?
        .ok_or(LookupError::TsmpAccountNotFound)?;

    let accounts = state.users.accounts(user.id).await?;

    tracing::debug!(ign = %profile.name, user_id = %user.id, "IGN lookup hit");

    Ok(Json(LookupResponse {
        minecraft_uuid: profile.undashed_id(),
        minecraft_username: profile.name,
        discord_id: discord_account(&accounts).map(|a| a.provider_account_id.clone()),
    }))
}
