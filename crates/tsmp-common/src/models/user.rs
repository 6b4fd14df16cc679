//! User model: a community member as known to the website.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{account::Account, application::Application};

/// A TSMP user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    /// Display name copied from the login provider
    pub name: Option<String>,

    /// Linked Minecraft account, set once the link challenge is completed
    pub minecraft_uuid: Option<Uuid>,

    /// Pending token proving ownership of a Minecraft account
    #[serde(skip_serializing)]
    pub link_challenge: Option<String>,

    /// Grants access to the admin endpoints
    pub is_admin: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_linked(&self) -> bool {
        self.minecraft_uuid.is_some()
    }
}

/// A user together with the records hanging off it.
#[derive(Debug, Clone)]
pub struct TsmpUser {
    pub user: User,
    pub accounts: Vec<Account>,
    pub application: Option<Application>,
}

impl TsmpUser {
    /// The Discord identity linked to this user, if any.
    pub fn discord_account(&self) -> Option<&Account> {
        discord_account(&self.accounts)
    }
}

/// First account whose provider is Discord.
pub fn discord_account(accounts: &[Account]) -> Option<&Account> {
    accounts
        .iter()
        .find(|a| a.provider == super::account::DISCORD_PROVIDER)
}
