//! Async REST client for the parts of the Discord API the bot uses.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{DiscordError, Result};
use crate::types::{MessageData, RoleConnection, RoleConnectionMetadataRecord, TokenResponse};

const DEFAULT_BASE: &str = "https://discord.com/api/v10";

/// Which credential a request is sent with.
enum Auth<'a> {
    Bot,
    /// A user's OAuth2 access token
    Bearer(&'a str),
    /// Interaction webhooks are authorised by their token in the path.
    None,
}

/// Discord REST client bound to one application.
#[derive(Clone)]
pub struct DiscordClient {
    client: Client,
    base_url: String,
    application_id: String,
    bot_token: String,
    client_secret: String,
}

impl DiscordClient {
    pub fn new(
        application_id: impl Into<String>,
        bot_token: impl Into<String>,
        client_secret: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                "DiscordBot (https://github.com/TristanSMP/web, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .map_err(DiscordError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_BASE).trim_end_matches('/').to_owned(),
            application_id: application_id.into(),
            bot_token: bot_token.into(),
            client_secret: client_secret.into(),
        })
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    fn build(&self, method: Method, path: &str, auth: Auth<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let req = self.client.request(method, url);
        match auth {
            Auth::Bot => req.header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.bot_token)),
            Auth::Bearer(token) => req.bearer_auth(token),
            Auth::None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let msg = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
                .unwrap_or_else(|| status.to_string());
            return Err(DiscordError::Api { status: status.as_u16(), message: msg });
        }
        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(DiscordError::Json);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
        body: &B,
    ) -> Result<T> {
        self.send(self.build(method, path, auth).json(body)).await
    }

    // ── Application commands ──────────────────────────────────────────────────

    /// Replace every global command of the application.
    pub async fn bulk_overwrite_global_commands(&self, commands: &[Value]) -> Result<Vec<Value>> {
        let path = format!("/applications/{}/commands", self.application_id);
        self.json(Method::PUT, &path, Auth::Bot, commands).await
    }

    // ── Interaction responses ─────────────────────────────────────────────────

    /// Replace the content of a (deferred) interaction response.
    pub async fn edit_original_response(&self, interaction_token: &str, data: &MessageData) -> Result<()> {
        let path = format!(
            "/webhooks/{}/{}/messages/@original",
            self.application_id, interaction_token
        );
        let _: Value = self.json(Method::PATCH, &path, Auth::None, data).await?;
        Ok(())
    }

    // ── Linked roles ──────────────────────────────────────────────────────────

    /// Publish the application's role connection metadata schema.
    pub async fn put_role_connection_metadata(
        &self,
        records: &[RoleConnectionMetadataRecord],
    ) -> Result<Vec<RoleConnectionMetadataRecord>> {
        let path = format!("/applications/{}/role-connections/metadata", self.application_id);
        self.json(Method::PUT, &path, Auth::Bot, records).await
    }

    /// Push a user's role connection using their OAuth2 access token.
    pub async fn put_role_connection(&self, access_token: &str, connection: &RoleConnection) -> Result<()> {
        let path = format!("/users/@me/applications/{}/role-connection", self.application_id);
        let _: Value = self
            .json(Method::PUT, &path, Auth::Bearer(access_token), connection)
            .await?;
        Ok(())
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_oauth_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        debug!("Refreshing Discord OAuth2 token");
        let form = [
            ("client_id", self.application_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let req = self.build(Method::POST, "/oauth2/token", Auth::None).form(&form);
        self.send(req).await
    }
}
