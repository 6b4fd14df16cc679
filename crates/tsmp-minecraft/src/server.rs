//! Live Minecraft server access through the TSMP bridge plugin.
//!
//! The plugin exposes a small authenticated HTTP API:
//!
//! ```text
//! GET  /players/{uuid}/inventory              200 {"items":[{"slot":0,"type":"STONE","amount":64}]}
//!                                             404 player offline
//! POST /players/{uuid}/inventory/{slot}/take  body {"type":"STONE","amount":64}
//!                                             200 taken, 409 slot changed, 404 player offline
//! ```
//!
//! `take` carries the stack the caller last saw in the slot; the plugin only
//! removes it if the slot still holds exactly that stack.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::MinecraftError;

const SERVICE: &str = "Minecraft server";

/// One occupied slot as reported by the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStack {
    pub slot: u8,
    /// Bukkit material name, e.g. `DIAMOND_SWORD`
    #[serde(rename = "type")]
    pub material: String,
    pub amount: u32,
}

/// Result of asking the server to take a stack out of a player's inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeOutcome {
    Taken,
    /// The slot no longer holds the expected stack.
    Mismatch,
    Offline,
}

/// The live game server.
#[async_trait]
pub trait MinecraftServer: Send + Sync {
    /// Occupied slots of an online player, `None` when the player is offline.
    async fn inventory(&self, player: Uuid) -> Result<Option<Vec<SlotStack>>, MinecraftError>;

    /// Remove `expected` from the player's inventory if the slot still holds it.
    async fn take_item(
        &self,
        player: Uuid,
        expected: &SlotStack,
    ) -> Result<TakeOutcome, MinecraftError>;
}

#[derive(Deserialize)]
struct InventoryResponse {
    items: Vec<SlotStack>,
}

#[derive(Serialize)]
struct TakeRequest<'a> {
    #[serde(rename = "type")]
    material: &'a str,
    amount: u32,
}

/// [`MinecraftServer`] backed by the bridge plugin's HTTP API.
#[derive(Clone)]
pub struct ServerApiClient {
    http: Client,
    base: Url,
    token: String,
}

impl ServerApiClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, MinecraftError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("TSMP-Web/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MinecraftError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base,
            token: token.to_owned(),
        })
    }

    fn inventory_url(&self, player: Uuid) -> Result<Url, MinecraftError> {
        Ok(self.base.join(&format!("players/{}/inventory", player.simple()))?)
    }

    fn take_url(&self, player: Uuid, slot: u8) -> Result<Url, MinecraftError> {
        Ok(self
            .base
            .join(&format!("players/{}/inventory/{}/take", player.simple(), slot))?)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        }
    }
}

#[async_trait]
impl MinecraftServer for ServerApiClient {
    async fn inventory(&self, player: Uuid) -> Result<Option<Vec<SlotStack>>, MinecraftError> {
        let url = self.inventory_url(player)?;
        let resp = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(|e| MinecraftError::http(SERVICE, e))?;

        match resp.status() {
            StatusCode::OK => {
                let body: InventoryResponse =
                    resp.json().await.map_err(|e| MinecraftError::http(SERVICE, e))?;
                Ok(Some(body.items))
            }
            StatusCode::NOT_FOUND => {
                debug!(%player, "Player offline");
                Ok(None)
            }
            other => Err(unexpected(other, resp).await),
        }
    }

    async fn take_item(
        &self,
        player: Uuid,
        expected: &SlotStack,
    ) -> Result<TakeOutcome, MinecraftError> {
        let url = self.take_url(player, expected.slot)?;
        let body = TakeRequest {
            material: &expected.material,
            amount: expected.amount,
        };
        let resp = self
            .authorize(self.http.post(url).json(&body))
            .send()
            .await
            .map_err(|e| MinecraftError::http(SERVICE, e))?;

        match resp.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(TakeOutcome::Taken),
            StatusCode::CONFLICT => Ok(TakeOutcome::Mismatch),
            StatusCode::NOT_FOUND => Ok(TakeOutcome::Offline),
            other => Err(unexpected(other, resp).await),
        }
    }
}

async fn unexpected(status: StatusCode, resp: reqwest::Response) -> MinecraftError {
    MinecraftError::UnexpectedStatus {
        service: SERVICE,
        status: status.as_u16(),
        body: resp.text().await.unwrap_or_default(),
    }
}
