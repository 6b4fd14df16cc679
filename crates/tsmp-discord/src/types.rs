//! Discord wire types used by the bot (API v10 field names).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tsmp_common::snowflake::Snowflake;

/// Message flag hiding a response from everyone but the invoker.
pub const EPHEMERAL: u64 = 1 << 6;

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: Snowflake,
    pub username: String,
    /// `"0"` for accounts migrated to unique usernames
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
    #[serde(default)]
    pub global_name: Option<String>,
}

fn default_discriminator() -> String {
    "0".to_owned()
}

impl DiscordUser {
    /// `name#1234` for legacy accounts, plain `name` otherwise.
    pub fn tag(&self) -> String {
        if self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user: Option<DiscordUser>,
    #[serde(default)]
    pub permissions: Option<String>,
}

// ── Interactions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionType(pub u8);

impl InteractionType {
    pub const PING: Self = Self(1);
    pub const APPLICATION_COMMAND: Self = Self(2);
}

/// An incoming interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Snowflake,
    pub application_id: Snowflake,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub token: String,
    #[serde(default)]
    pub data: Option<CommandData>,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Set when invoked in a guild
    #[serde(default)]
    pub member: Option<Member>,
    /// Set when invoked in a DM
    #[serde(default)]
    pub user: Option<DiscordUser>,
}

impl Interaction {
    /// The user who invoked the interaction.
    pub fn invoker(&self) -> Option<&DiscordUser> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }
}

/// Application command payload of an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandData {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    #[serde(default)]
    pub resolved: Option<ResolvedData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Full objects for ids referenced by options, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedData {
    #[serde(default)]
    pub users: HashMap<String, DiscordUser>,
}

impl CommandData {
    /// Resolve a User option to its user object.
    pub fn user_option(&self, name: &str) -> Option<DiscordUser> {
        let raw = self
            .options
            .iter()
            .find(|o| o.name == name)?
            .value
            .as_ref()?
            .as_str()?;
        self.resolved.as_ref()?.users.get(raw).cloned()
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackType(pub u8);

impl CallbackType {
    pub const PONG: Self = Self(1);
    pub const CHANNEL_MESSAGE_WITH_SOURCE: Self = Self(4);
    pub const DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE: Self = Self(5);
}

/// Message body for replies and reply edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl MessageData {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Default::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(EPHEMERAL);
        self
    }
}

/// Synchronous answer to an interaction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: CallbackType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: CallbackType::PONG,
            data: None,
        }
    }

    /// "Bot is thinking…", visible only to the invoker.
    pub fn deferred_ephemeral() -> Self {
        Self {
            kind: CallbackType::DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(MessageData {
                flags: Some(EPHEMERAL),
                ..Default::default()
            }),
        }
    }

    pub fn message(data: MessageData) -> Self {
        Self {
            kind: CallbackType::CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(data),
        }
    }
}

// ── Embeds ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<EmbedField>,
}

// ── Linked roles ──────────────────────────────────────────────────────────────

/// Role connection metadata type: boolean equal.
pub const METADATA_BOOLEAN_EQUAL: u8 = 7;

/// One entry of the application's role connection metadata schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConnectionMetadataRecord {
    #[serde(rename = "type")]
    pub kind: u8,
    pub key: String,
    pub name: String,
    pub description: String,
}

/// A user's role connection as pushed to Discord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConnection {
    pub platform_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_username: Option<String>,
    /// Values are strings; booleans are `"1"` / `"0"`
    pub metadata: BTreeMap<String, String>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFRESH: &str = r#"{
        "id": "1100000000000000001",
        "application_id": "1000000000000000000",
        "type": 2,
        "token": "tok",
        "version": 1,
        "guild_id": "900000000000000000",
        "member": {
            "user": {"id": "42", "username": "admin", "discriminator": "0"},
            "permissions": "8"
        },
        "data": {
            "id": "1200000000000000000",
            "name": "refresh",
            "type": 1,
            "options": [{"name": "user", "type": 6, "value": "80351110224678912"}],
            "resolved": {
                "users": {
                    "80351110224678912": {
                        "id": "80351110224678912",
                        "username": "Nelly",
                        "discriminator": "1337",
                        "global_name": null
                    }
                }
            }
        }
    }"#;

    #[test]
    fn parses_command_interaction() {
        let interaction: Interaction = serde_json::from_str(REFRESH).unwrap();
        assert_eq!(interaction.kind, InteractionType::APPLICATION_COMMAND);
        assert_eq!(interaction.invoker().unwrap().username, "admin");

        let data = interaction.data.unwrap();
        assert_eq!(data.name, "refresh");
        let target = data.user_option("user").unwrap();
        assert_eq!(target.id, Snowflake(80351110224678912));
        assert_eq!(target.tag(), "Nelly#1337");
        assert!(data.user_option("other").is_none());
    }

    #[test]
    fn migrated_usernames_have_no_discriminator() {
        let user: DiscordUser =
            serde_json::from_str(r#"{"id":"1","username":"tristan"}"#).unwrap();
        assert_eq!(user.tag(), "tristan");
    }

    #[test]
    fn deferred_response_is_ephemeral() {
        let json = serde_json::to_value(InteractionResponse::deferred_ephemeral()).unwrap();
        assert_eq!(json, serde_json::json!({"type": 5, "data": {"flags": 64}}));
        let pong = serde_json::to_value(InteractionResponse::pong()).unwrap();
        assert_eq!(pong, serde_json::json!({"type": 1}));
    }
}
