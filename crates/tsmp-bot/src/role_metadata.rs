//! Linked-role metadata: what Discord shows about a member's TSMP standing.
//!
//! Each member's role connection carries two booleans, `linked` (a Minecraft
//! account is linked) and `applied` (an application is on file). Discord
//! evaluates role requirements against them.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tsmp_common::error::{TsmpError, TsmpResult};
use tsmp_discord::{RoleConnection, RoleConnectionMetadataRecord, METADATA_BOOLEAN_EQUAL};
use tsmp_minecraft::ProfileResolver;

use crate::discord::RoleConnections;
use crate::store::MemberStore;

pub const PLATFORM_NAME: &str = "TristanSMP";

/// Recomputes and pushes a member's role metadata.
#[async_trait]
pub trait RoleMetadataSync: Send + Sync {
    async fn update(&self, discord_id: &str) -> TsmpResult<()>;
}

/// The metadata schema registered for the application.
pub fn metadata_schema() -> Vec<RoleConnectionMetadataRecord> {
    vec![
        RoleConnectionMetadataRecord {
            kind: METADATA_BOOLEAN_EQUAL,
            key: "linked".into(),
            name: "Linked".into(),
            description: "Has linked a Minecraft account".into(),
        },
        RoleConnectionMetadataRecord {
            kind: METADATA_BOOLEAN_EQUAL,
            key: "applied".into(),
            name: "Applied".into(),
            description: "Has submitted an application".into(),
        },
    ]
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_owned()
}

pub struct RoleMetadataUpdater {
    store: Arc<dyn MemberStore>,
    discord: Arc<dyn RoleConnections>,
    profiles: Arc<dyn ProfileResolver>,
}

impl RoleMetadataUpdater {
    pub fn new(
        store: Arc<dyn MemberStore>,
        discord: Arc<dyn RoleConnections>,
        profiles: Arc<dyn ProfileResolver>,
    ) -> Self {
        Self {
            store,
            discord,
            profiles,
        }
    }
}

#[async_trait]
impl RoleMetadataSync for RoleMetadataUpdater {
    async fn update(&self, discord_id: &str) -> TsmpResult<()> {
        let member = self
            .store
            .member_by_discord_id(discord_id)
            .await?
            .ok_or_else(|| TsmpError::not_found("User"))?;
        let account = member
            .discord_account()
            .ok_or_else(|| TsmpError::not_found("Discord account"))?;

        let now = Utc::now();
        let access_token = match (&account.access_token, &account.refresh_token) {
            (Some(token), _) if !account.token_expired(now) => token.clone(),
            (_, Some(refresh)) => {
                let fresh = self.discord.refresh_token(refresh).await?;
                self.store
                    .update_tokens(
                        account.id,
                        &fresh.access_token,
                        fresh.refresh_token.as_deref(),
                        Some(now + Duration::seconds(fresh.expires_in)),
                    )
                    .await?;
                tracing::debug!(%discord_id, "Refreshed Discord token");
                fresh.access_token
            }
            _ => {
                return Err(TsmpError::Conflict {
                    message: "No usable Discord authorization; the user must sign in again".into(),
                });
            }
        };

        let platform_username = match member.user.minecraft_uuid {
            Some(uuid) => match self.profiles.profile_by_id(uuid).await {
                Ok(profile) => profile.map(|p| p.name),
                Err(e) => {
                    tracing::warn!(%uuid, "Could not resolve Minecraft name: {e}");
                    None
                }
            },
            None => None,
        };

        let metadata = BTreeMap::from([
            ("linked".to_owned(), flag(member.user.is_linked())),
            ("applied".to_owned(), flag(member.application.is_some())),
        ]);

        self.discord
            .put_role_connection(
                &access_token,
                &RoleConnection {
                    platform_name: PLATFORM_NAME.into(),
                    platform_username,
                    metadata,
                },
            )
            .await?;

        tracing::info!(%discord_id, "Role metadata updated");
        Ok(())
    }
}
