//! In-memory fakes and a router harness for route tests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower::ServiceExt;
use tsmp_common::config::{AuthConfig, MinecraftConfig};
use tsmp_common::error::{TsmpError, TsmpResult};
use tsmp_common::models::{Account, DiscoveredItemType, ListingStatus, MarketListing, User};
use tsmp_db::repository::market::NewListing;
use tsmp_minecraft::{
    MinecraftError, MinecraftProfile, MinecraftServer, ProfileResolver, SlotStack, TakeOutcome,
};
use uuid::Uuid;

use crate::store::{HealthProbe, MarketStore, UserDirectory};
use crate::{auth, build_router, AppState};

const SECRET: &str = "test-secret";

pub fn linked_user(minecraft_uuid: &str, is_admin: bool) -> User {
    User {
        minecraft_uuid: Some(Uuid::parse_str(minecraft_uuid).unwrap()),
        ..unlinked_user(is_admin)
    }
}

pub fn unlinked_user(is_admin: bool) -> User {
    User {
        id: Uuid::now_v7(),
        name: Some("tester".into()),
        minecraft_uuid: None,
        link_challenge: None,
        is_admin,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ── Fakes ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProfiles {
    by_name: Mutex<HashMap<String, MinecraftProfile>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl FakeProfiles {
    pub fn add(&self, undashed: &str, name: &str) {
        let profile = MinecraftProfile {
            id: Uuid::parse_str(undashed).unwrap(),
            name: name.into(),
        };
        self.by_name
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), profile);
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileResolver for FakeProfiles {
    async fn profile_by_name(&self, name: &str) -> Result<Option<MinecraftProfile>, MinecraftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MinecraftError::Http {
                service: "Mojang",
                message: "connection refused".into(),
            });
        }
        Ok(self.by_name.lock().unwrap().get(&name.to_lowercase()).cloned())
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<MinecraftProfile>, MinecraftError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .by_name
            .lock()
            .unwrap()
            .values()
            .find(|p| p.id == id)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<Vec<User>>,
    accounts: Mutex<Vec<Account>>,
    minecraft_lookups: AtomicUsize,
}

impl FakeUsers {
    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn add_account(&self, user_id: Uuid, provider: &str, provider_account_id: &str) {
        self.accounts.lock().unwrap().push(Account {
            id: Uuid::now_v7(),
            user_id,
            provider: provider.into(),
            provider_account_id: provider_account_id.into(),
            access_token: None,
            refresh_token: None,
            expires_at: None,
            scope: None,
        });
    }

    pub fn minecraft_lookups(&self) -> usize {
        self.minecraft_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn user_by_id(&self, id: Uuid) -> TsmpResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_minecraft_uuid(&self, minecraft_uuid: Uuid) -> TsmpResult<Option<User>> {
        self.minecraft_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.minecraft_uuid == Some(minecraft_uuid))
            .cloned())
    }

    async fn accounts(&self, user_id: Uuid) -> TsmpResult<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeMarket {
    listings: Mutex<Vec<MarketListing>>,
    catalog: Mutex<Vec<DiscoveredItemType>>,
    failing_activation: AtomicBool,
}

impl FakeMarket {
    pub fn listings(&self) -> Vec<MarketListing> {
        self.listings.lock().unwrap().clone()
    }

    pub fn fail_activation(&self) {
        self.failing_activation.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MarketStore for FakeMarket {
    async fn discovered_item_types(&self) -> TsmpResult<Vec<DiscoveredItemType>> {
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn reserve_listing(&self, listing: &NewListing) -> TsmpResult<MarketListing> {
        let row = MarketListing {
            id: listing.id,
            seller_id: listing.seller_id,
            slot: listing.slot,
            item_name: listing.item_name.clone(),
            amount: listing.amount,
            price: listing.price,
            status: ListingStatus::Pending,
            created_at: Utc::now(),
        };
        self.listings.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn activate_listing(&self, id: Uuid, image: Option<&str>) -> TsmpResult<MarketListing> {
        if self.failing_activation.load(Ordering::SeqCst) {
            return Err(TsmpError::Database(sqlx::Error::PoolClosed));
        }
        let mut listings = self.listings.lock().unwrap();
        let row = listings
            .iter_mut()
            .find(|l| l.id == id && l.status == ListingStatus::Pending)
            .ok_or_else(|| TsmpError::not_found("Listing"))?;
        row.status = ListingStatus::Active;

        let mut catalog = self.catalog.lock().unwrap();
        if !catalog.iter().any(|t| t.name == row.item_name) {
            catalog.push(DiscoveredItemType {
                name: row.item_name.clone(),
                image: image.map(str::to_owned),
            });
        }
        Ok(row.clone())
    }

    async fn discard_listing(&self, id: Uuid) -> TsmpResult<bool> {
        let mut listings = self.listings.lock().unwrap();
        let before = listings.len();
        listings.retain(|l| !(l.id == id && l.status == ListingStatus::Pending));
        Ok(listings.len() < before)
    }
}

#[derive(Default)]
pub struct FakeMinecraft {
    online: Mutex<HashMap<Uuid, Vec<SlotStack>>>,
    taken: Mutex<Vec<SlotStack>>,
    inventory_calls: AtomicUsize,
    mismatch_next: AtomicBool,
    lose_next_response: AtomicBool,
}

impl FakeMinecraft {
    pub fn set_online(&self, player: &str, stacks: Vec<SlotStack>) {
        self.online
            .lock()
            .unwrap()
            .insert(Uuid::parse_str(player).unwrap(), stacks);
    }

    /// Make the next take report that the slot changed.
    pub fn mismatch_next_take(&self) {
        self.mismatch_next.store(true, Ordering::SeqCst);
    }

    /// Take the next item but fail the call, as a timed-out request would.
    pub fn lose_next_take_response(&self) {
        self.lose_next_response.store(true, Ordering::SeqCst);
    }

    pub fn inventory_calls(&self) -> usize {
        self.inventory_calls.load(Ordering::SeqCst)
    }

    pub fn taken(&self) -> Vec<SlotStack> {
        self.taken.lock().unwrap().clone()
    }
}

#[async_trait]
impl MinecraftServer for FakeMinecraft {
    async fn inventory(&self, player: Uuid) -> Result<Option<Vec<SlotStack>>, MinecraftError> {
        self.inventory_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.online.lock().unwrap().get(&player).cloned())
    }

    async fn take_item(
        &self,
        player: Uuid,
        expected: &SlotStack,
    ) -> Result<TakeOutcome, MinecraftError> {
        if self.mismatch_next.swap(false, Ordering::SeqCst) {
            return Ok(TakeOutcome::Mismatch);
        }
        let mut online = self.online.lock().unwrap();
        let Some(stacks) = online.get_mut(&player) else {
            return Ok(TakeOutcome::Offline);
        };
        match stacks.iter().position(|s| s == expected) {
            Some(pos) => {
                let stack = stacks.remove(pos);
                self.taken.lock().unwrap().push(stack);
                if self.lose_next_response.swap(false, Ordering::SeqCst) {
                    return Err(MinecraftError::Http {
                        service: "Minecraft server",
                        message: "operation timed out".into(),
                    });
                }
                Ok(TakeOutcome::Taken)
            }
            None => Ok(TakeOutcome::Mismatch),
        }
    }
}

pub struct FakeHealth(AtomicBool);

impl FakeHealth {
    pub fn set(&self, healthy: bool) {
        self.0.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthProbe for FakeHealth {
    async fn healthy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

pub struct Harness {
    pub profiles: Arc<FakeProfiles>,
    pub users: Arc<FakeUsers>,
    pub market: Arc<FakeMarket>,
    pub minecraft: Arc<FakeMinecraft>,
    pub health: Arc<FakeHealth>,
    router: Router,
}

impl Harness {
    pub fn new() -> Self {
        let profiles = Arc::new(FakeProfiles::default());
        let users = Arc::new(FakeUsers::default());
        let market = Arc::new(FakeMarket::default());
        let minecraft = Arc::new(FakeMinecraft::default());
        let health = Arc::new(FakeHealth(AtomicBool::new(true)));

        let state = AppState {
            users: users.clone(),
            market: market.clone(),
            health: health.clone(),
            profiles: profiles.clone(),
            minecraft: minecraft.clone(),
            auth: AuthConfig {
                jwt_secret: SECRET.into(),
                session_cookie: "tsmp_session".into(),
            },
            minecraft_config: MinecraftConfig {
                profile_api_url: "http://mojang.test".into(),
                session_api_url: "http://session.test".into(),
                server_api_url: "http://mc.test".into(),
                server_api_token: String::new(),
                item_image_url: "https://img.test/{name}.png".into(),
                request_timeout_secs: 1,
            },
            started_at: Instant::now() - Duration::from_secs(5),
        };

        Self {
            profiles,
            users,
            market,
            minecraft,
            health,
            router: build_router(state),
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        auth::generate_access_token(user.id, user.name.as_deref().unwrap_or(""), SECRET, 300)
            .unwrap()
    }

    /// A stored, unlinked admin and their session token.
    pub fn admin_token(&self) -> String {
        let user = unlinked_user(true);
        let token = self.token_for(&user);
        self.users.add_user(user);
        token
    }

    /// A stored, unlinked non-admin and their session token.
    pub fn member_token(&self) -> String {
        let user = unlinked_user(false);
        let token = self.token_for(&user);
        self.users.add_user(user);
        token
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::get(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut req = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap())
            .await
    }
}
