//! Mojang profile lookup.
//!
//! - name → profile: `GET {profile_api}/users/profiles/minecraft/{name}`
//! - uuid → profile: `GET {session_api}/session/minecraft/profile/{uuid}`
//!
//! Both answer `200 {"id": "<undashed uuid>", "name": "<current name>"}`, or
//! `204`/`404` when no such account exists.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsmp_common::validation::is_plausible_ign;
use uuid::Uuid;

use crate::error::MinecraftError;

const SERVICE: &str = "Mojang";

/// A Minecraft account as Mojang knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftProfile {
    pub id: Uuid,
    pub name: String,
}

impl MinecraftProfile {
    /// The id in Mojang's undashed form.
    pub fn undashed_id(&self) -> String {
        self.id.simple().to_string()
    }
}

/// Resolves Minecraft identities.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    /// Look up the account currently using `name`.
    async fn profile_by_name(&self, name: &str) -> Result<Option<MinecraftProfile>, MinecraftError>;

    /// Look up an account by its persistent id.
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<MinecraftProfile>, MinecraftError>;
}

/// [`ProfileResolver`] backed by the public Mojang APIs.
#[derive(Clone)]
pub struct MojangClient {
    http: Client,
    profile_api: String,
    session_api: String,
}

impl MojangClient {
    pub fn new(
        profile_api: &str,
        session_api: &str,
        timeout: Duration,
    ) -> Result<Self, MinecraftError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("TSMP-Web/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MinecraftError::Client(e.to_string()))?;

        Ok(Self {
            http,
            profile_api: profile_api.trim_end_matches('/').to_owned(),
            session_api: session_api.trim_end_matches('/').to_owned(),
        })
    }

    async fn fetch(&self, url: &str) -> Result<Option<MinecraftProfile>, MinecraftError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| MinecraftError::http(SERVICE, e))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| MinecraftError::http(SERVICE, e))?;
        decode_profile(status, &body)
    }
}

#[async_trait]
impl ProfileResolver for MojangClient {
    async fn profile_by_name(&self, name: &str) -> Result<Option<MinecraftProfile>, MinecraftError> {
        if !is_plausible_ign(name) {
            debug!(name, "Skipping Mojang lookup for impossible name");
            return Ok(None);
        }
        let url = format!("{}/users/profiles/minecraft/{}", self.profile_api, name);
        self.fetch(&url).await
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<MinecraftProfile>, MinecraftError> {
        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.session_api,
            id.simple()
        );
        self.fetch(&url).await
    }
}

/// Interpret a Mojang profile response.
fn decode_profile(
    status: StatusCode,
    body: &str,
) -> Result<Option<MinecraftProfile>, MinecraftError> {
    match status {
        StatusCode::OK => Ok(Some(serde_json::from_str(body)?)),
        StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(None),
        other => Err(MinecraftError::UnexpectedStatus {
            service: SERVICE,
            status: other.as_u16(),
            body: body.chars().take(200).collect(),
        }),
    }
}
