//! Member records the bot reads and resets.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tsmp_common::error::TsmpResult;
use tsmp_common::models::TsmpUser;
use tsmp_db::repository::{accounts, applications, users};
use tsmp_db::Database;
use uuid::Uuid;

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// The user behind a Discord id, with accounts and application.
    async fn member_by_discord_id(&self, discord_id: &str) -> TsmpResult<Option<TsmpUser>>;

    /// Returns `false` when the application no longer existed.
    async fn delete_application(&self, application_id: Uuid) -> TsmpResult<bool>;

    /// Clear the Minecraft link and link challenge together.
    async fn clear_minecraft_link(&self, user_id: Uuid) -> TsmpResult<bool>;

    async fn update_tokens(
        &self,
        account_id: Uuid,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> TsmpResult<()>;
}

#[async_trait]
impl MemberStore for Database {
    async fn member_by_discord_id(&self, discord_id: &str) -> TsmpResult<Option<TsmpUser>> {
        let Some(user) = users::find_by_discord_id(&self.pool, discord_id).await? else {
            return Ok(None);
        };
        let accounts = accounts::list_for_user(&self.pool, user.id).await?;
        let application = applications::find_for_user(&self.pool, user.id).await?;
        Ok(Some(TsmpUser {
            user,
            accounts,
            application,
        }))
    }

    async fn delete_application(&self, application_id: Uuid) -> TsmpResult<bool> {
        Ok(applications::delete_application(&self.pool, application_id).await?)
    }

    async fn clear_minecraft_link(&self, user_id: Uuid) -> TsmpResult<bool> {
        Ok(users::clear_minecraft_link(&self.pool, user_id).await?)
    }

    async fn update_tokens(
        &self,
        account_id: Uuid,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) -> TsmpResult<()> {
        Ok(accounts::update_tokens(&self.pool, account_id, access_token, refresh_token, expires_at).await?)
    }
}
