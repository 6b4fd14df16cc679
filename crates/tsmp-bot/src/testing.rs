//! In-memory fakes and a signed-request harness for bot tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;
use tsmp_common::error::{TsmpError, TsmpResult};
use tsmp_common::models::{Account, Application, TsmpUser, User, DISCORD_PROVIDER};
use tsmp_discord::{
    Interaction, InteractionVerifier, MessageData, RoleConnection, TokenResponse,
};
use tsmp_minecraft::{MinecraftError, MinecraftProfile, ProfileResolver};
use uuid::Uuid;

use crate::discord::{Responder, RoleConnections};
use crate::role_metadata::RoleMetadataSync;
use crate::store::MemberStore;
use crate::{build_router, default_registry, BotState};

/// A member with a Discord account, optionally linked and with an application.
pub fn member(discord_id: &str, linked: bool, applied: bool, access_token: Option<&str>) -> TsmpUser {
    let user_id = Uuid::now_v7();
    TsmpUser {
        user: User {
            id: user_id,
            name: Some("Nelly".into()),
            minecraft_uuid: linked.then(Uuid::now_v7),
            link_challenge: linked.then(|| "challenge".into()),
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        accounts: vec![Account {
            id: Uuid::now_v7(),
            user_id,
            provider: DISCORD_PROVIDER.into(),
            provider_account_id: discord_id.into(),
            access_token: access_token.map(str::to_owned),
            refresh_token: None,
            expires_at: None,
            scope: Some("identify role_connections.write".into()),
        }],
        application: applied.then(|| Application {
            id: Uuid::now_v7(),
            user_id,
            answers: json!({ "why": "to build" }),
            created_at: Utc::now(),
        }),
    }
}

pub fn command_json(name: &str, target_id: &str, username: &str, discriminator: &str) -> Value {
    json!({
        "id": "1100000000000000001",
        "application_id": "1000000000000000000",
        "type": 2,
        "token": "interaction-token",
        "member": { "user": { "id": "42", "username": "admin" } },
        "data": {
            "id": "1200000000000000000",
            "name": name,
            "options": [{ "name": "user", "type": 6, "value": target_id }],
            "resolved": {
                "users": {
                    target_id: { "id": target_id, "username": username, "discriminator": discriminator }
                }
            }
        }
    })
}

pub fn command_interaction(name: &str, target_id: &str, username: &str, discriminator: &str) -> Interaction {
    serde_json::from_value(command_json(name, target_id, username, discriminator)).unwrap()
}

// ── Fakes ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeMembers {
    members: Mutex<Vec<TsmpUser>>,
    stored_tokens: Mutex<Vec<String>>,
    failing_writes: AtomicBool,
}

impl FakeMembers {
    pub fn add(&self, member: TsmpUser) {
        self.members.lock().unwrap().push(member);
    }

    pub fn get(&self, user_id: Uuid) -> TsmpUser {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user.id == user_id)
            .cloned()
            .unwrap()
    }

    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }

    pub fn stored_tokens(&self) -> Vec<String> {
        self.stored_tokens.lock().unwrap().clone()
    }

    fn check_writes(&self) -> TsmpResult<()> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(TsmpError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl MemberStore for FakeMembers {
    async fn member_by_discord_id(&self, discord_id: &str) -> TsmpResult<Option<TsmpUser>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| {
                m.discord_account()
                    .is_some_and(|a| a.provider_account_id == discord_id)
            })
            .cloned())
    }

    async fn delete_application(&self, application_id: Uuid) -> TsmpResult<bool> {
        self.check_writes()?;
        let mut members = self.members.lock().unwrap();
        for m in members.iter_mut() {
            if m.application.as_ref().is_some_and(|a| a.id == application_id) {
                m.application = None;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn clear_minecraft_link(&self, user_id: Uuid) -> TsmpResult<bool> {
        self.check_writes()?;
        let mut members = self.members.lock().unwrap();
        match members.iter_mut().find(|m| m.user.id == user_id) {
            Some(m) => {
                m.user.minecraft_uuid = None;
                m.user.link_challenge = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_tokens(
        &self,
        _account_id: Uuid,
        access_token: &str,
        _refresh_token: Option<&str>,
        _expires_at: Option<DateTime<Utc>>,
    ) -> TsmpResult<()> {
        self.stored_tokens.lock().unwrap().push(access_token.to_owned());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSync {
    calls: Mutex<Vec<String>>,
    failing: bool,
}

impl FakeSync {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleMetadataSync for FakeSync {
    async fn update(&self, discord_id: &str) -> TsmpResult<()> {
        self.calls.lock().unwrap().push(discord_id.to_owned());
        if self.failing {
            return Err(TsmpError::not_found("User"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeRoleConnections {
    pushed: Mutex<Vec<(String, RoleConnection)>>,
}

impl FakeRoleConnections {
    pub fn pushed(&self) -> Vec<(String, RoleConnection)> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleConnections for FakeRoleConnections {
    async fn refresh_token(&self, _refresh_token: &str) -> tsmp_discord::Result<TokenResponse> {
        Ok(TokenResponse {
            access_token: "fresh-access".into(),
            token_type: "Bearer".into(),
            expires_in: 604_800,
            refresh_token: Some("fresh-refresh".into()),
            scope: None,
        })
    }

    async fn put_role_connection(
        &self,
        access_token: &str,
        connection: &RoleConnection,
    ) -> tsmp_discord::Result<()> {
        self.pushed
            .lock()
            .unwrap()
            .push((access_token.to_owned(), connection.clone()));
        Ok(())
    }
}

/// Resolves every uuid to one fixed name.
pub struct FakeProfiles {
    name: String,
}

impl FakeProfiles {
    pub fn with(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ProfileResolver for FakeProfiles {
    async fn profile_by_name(&self, _name: &str) -> Result<Option<MinecraftProfile>, MinecraftError> {
        Ok(None)
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<MinecraftProfile>, MinecraftError> {
        Ok(Some(MinecraftProfile {
            id,
            name: self.name.clone(),
        }))
    }
}

pub struct FakeResponder {
    edits: mpsc::UnboundedSender<(String, MessageData)>,
}

#[async_trait]
impl Responder for FakeResponder {
    async fn edit_original(&self, interaction_token: &str, data: MessageData) -> tsmp_discord::Result<()> {
        let _ = self.edits.send((interaction_token.to_owned(), data));
        Ok(())
    }
}

/// A Discord base URL that accepts connections and never answers.
pub async fn stalled_discord() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("http://{addr}")
}

// ── Harness ───────────────────────────────────────────────────────────────────

pub struct BotHarness {
    pub members: Arc<FakeMembers>,
    key: SigningKey,
    router: Router,
    edits: tokio::sync::Mutex<mpsc::UnboundedReceiver<(String, MessageData)>>,
}

impl BotHarness {
    pub fn new() -> Self {
        let key = SigningKey::from_bytes(&[7u8; 32]);
        let verifier =
            InteractionVerifier::from_hex(&hex::encode(key.verifying_key().as_bytes())).unwrap();
        let members = Arc::new(FakeMembers::default());
        let (tx, rx) = mpsc::unbounded_channel();

        let state = BotState {
            verifier,
            registry: default_registry(members.clone(), Arc::new(FakeSync::default())),
            responder: Arc::new(FakeResponder { edits: tx }),
        };

        Self {
            members,
            key,
            router: build_router(state),
            edits: tokio::sync::Mutex::new(rx),
        }
    }

    pub async fn raw(
        &self,
        body: Vec<u8>,
        signature: Option<String>,
        timestamp: Option<String>,
    ) -> (StatusCode, Value) {
        let mut req = Request::post("/api/interactions").header("content-type", "application/json");
        if let Some(sig) = signature {
            req = req.header("x-signature-ed25519", sig);
        }
        if let Some(ts) = timestamp {
            req = req.header("x-signature-timestamp", ts);
        }
        let response = self
            .router
            .clone()
            .oneshot(req.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Send `body` with a valid signature.
    pub async fn signed(&self, body: Value) -> (StatusCode, Value) {
        let body = body.to_string().into_bytes();
        let timestamp = "1700000000".to_owned();
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(&body);
        let signature = hex::encode(self.key.sign(&message).to_bytes());
        self.raw(body, Some(signature), Some(timestamp)).await
    }

    /// Wait for the next edit of a deferred response.
    pub async fn next_edit(&self, timeout: Duration) -> (String, MessageData) {
        tokio::time::timeout(timeout, self.edits.lock().await.recv())
            .await
            .expect("no response edit arrived")
            .expect("responder dropped")
    }
}
