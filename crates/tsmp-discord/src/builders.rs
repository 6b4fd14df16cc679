//! Fluent builders for slash command definitions and embeds.

use crate::types::{Embed, EmbedField, EmbedFooter};
use serde_json::{json, Value};

/// Discord permission bit for ADMINISTRATOR.
pub const ADMINISTRATOR: u64 = 1 << 3;

#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum OptionType {
    User = 6,
}

// ── Slash command option builder ──────────────────────────────────────────────

#[derive(Default)]
pub struct SlashCommandOptionBuilder {
    kind: u8,
    name: String,
    description: String,
    required: bool,
}

impl SlashCommandOptionBuilder {
    pub fn new(kind: OptionType) -> Self {
        Self { kind: kind as u8, ..Default::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn build(self) -> Value {
        json!({
            "type": self.kind,
            "name": self.name,
            "description": self.description,
            "required": self.required,
        })
    }
}

// ── Slash command builder ─────────────────────────────────────────────────────

/// Fluent builder for a chat input command.
///
/// ```rust
/// use tsmp_discord::builders::{SlashCommandBuilder, ADMINISTRATOR};
///
/// let cmd = SlashCommandBuilder::new()
///     .name("refresh")
///     .description("Refresh a user's linked roles")
///     .default_member_permissions(ADMINISTRATOR)
///     .user_option(|o| o.name("user").description("User to refresh").required())
///     .build();
/// assert_eq!(cmd["options"][0]["type"], 6);
/// ```
#[derive(Default)]
pub struct SlashCommandBuilder {
    name: String,
    description: String,
    options: Vec<Value>,
    default_member_permissions: Option<String>,
    dm_permission: bool,
}

impl SlashCommandBuilder {
    pub fn new() -> Self {
        Self { dm_permission: true, ..Default::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Restrict the command to members holding these permission bits.
    pub fn default_member_permissions(mut self, perms: impl ToString) -> Self {
        self.default_member_permissions = Some(perms.to_string());
        self
    }

    pub fn dm_permission(mut self, allow: bool) -> Self {
        self.dm_permission = allow;
        self
    }

    pub fn option(mut self, builder: SlashCommandOptionBuilder) -> Self {
        self.options.push(builder.build());
        self
    }

    pub fn user_option(
        self,
        f: impl FnOnce(SlashCommandOptionBuilder) -> SlashCommandOptionBuilder,
    ) -> Self {
        self.option(f(SlashCommandOptionBuilder::new(OptionType::User)))
    }

    pub fn build(self) -> Value {
        let mut d = json!({
            "name": self.name,
            "description": self.description,
            "type": 1,
            "dm_permission": self.dm_permission,
        });
        if !self.options.is_empty() {
            d["options"] = Value::Array(self.options);
        }
        if let Some(p) = self.default_member_permissions {
            d["default_member_permissions"] = json!(p);
        }
        d
    }
}

// ── Embed builder ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct EmbedBuilder {
    inner: Embed,
}

impl EmbedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.inner.title = Some(v.into());
        self
    }

    pub fn description(mut self, v: impl Into<String>) -> Self {
        self.inner.description = Some(v.into());
        self
    }

    pub fn color(mut self, v: u32) -> Self {
        self.inner.color = Some(v);
        self
    }

    pub fn timestamp(mut self, v: impl Into<String>) -> Self {
        self.inner.timestamp = Some(v.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.inner.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.inner.fields.push(EmbedField { name: name.into(), value: value.into(), inline });
        self
    }

    pub fn build(self) -> Embed {
        self.inner
    }
}
