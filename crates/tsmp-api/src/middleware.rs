//! Middleware: session extraction and the admin gate.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tsmp_common::error::TsmpError;
use uuid::Uuid;

use crate::{auth, AppState};

/// The authenticated principal of a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub name: String,
}

/// Session token from `Authorization: Bearer`, falling back to the session cookie.
fn session_token(request: &Request, jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned);

    bearer.or_else(|| jar.get(cookie_name).map(|c| c.value().to_owned()))
}

/// Validate the session and insert an [`AuthContext`] for handlers.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, TsmpError> {
    let token =
        session_token(&request, &jar, &state.auth.session_cookie).ok_or(TsmpError::Unauthorized)?;

    let claims = auth::validate_token(&token, &state.auth.jwt_secret)
        .map_err(|_| TsmpError::InvalidToken)?;

    if claims.token_type != auth::ACCESS_TOKEN {
        return Err(TsmpError::InvalidToken);
    }

    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TsmpError::InvalidToken)?;

    request.extensions_mut().insert(AuthContext {
        user_id,
        name: claims.name,
    });

    Ok(next.run(request).await)
}

/// Reject requests whose user is not an admin. Must run inside [`auth_middleware`].
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, TsmpError> {
    let auth = request
        .extensions()
        .get::<AuthContext>()
        .ok_or(TsmpError::Unauthorized)?;

    let user = state
        .users
        .user_by_id(auth.user_id)
        .await?
        .ok_or(TsmpError::Unauthorized)?;

    if !user.is_admin {
        tracing::warn!(user_id = %user.id, "Non-admin attempted an admin route");
        return Err(TsmpError::Forbidden);
    }

    Ok(next.run(request).await)
}
