//! `/reset-user user:<@user>`: delete a member's application and Minecraft link.
//!
//! Both steps are attempted independently and each reports its own result.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tsmp_common::error::TsmpResult;
use tsmp_discord::builders::{EmbedBuilder, SlashCommandBuilder, ADMINISTRATOR};
use tsmp_discord::{Embed, Interaction, MessageData};

use super::{target_user, Command};
use crate::store::MemberStore;

/// How much of a multi-step operation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Full,
    Partial,
    None,
}

impl Outcome {
    pub fn from_steps(steps: &[bool]) -> Self {
        match (steps.iter().all(|s| *s), steps.iter().any(|s| *s)) {
            (true, _) => Self::Full,
            (false, true) => Self::Partial,
            (false, false) => Self::None,
        }
    }

    fn color(self) -> u32 {
        match self {
            Self::Full => 0x57f287,
            Self::Partial => 0xfee75c,
            Self::None => 0xed4245,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Full => "succeeded",
            Self::Partial => "partially succeeded",
            Self::None => "failed",
        }
    }
}

/// Summary of an admin action on an entity, one field per side effect.
pub fn status_embed(entity: &str, description: &str, side_effects: &[(&str, bool)]) -> Embed {
    let outcome = Outcome::from_steps(&side_effects.iter().map(|(_, ok)| *ok).collect::<Vec<_>>());
    let success = outcome == Outcome::Full;

    side_effects
        .iter()
        .fold(
            EmbedBuilder::new()
                .title(format!("{entity} {}", outcome.label()))
                .description(description)
                .color(outcome.color()),
            |embed, (name, ok)| embed.field(*name, ok.to_string(), true),
        )
        .footer(format!("Success: {success}"))
        .timestamp(chrono::Utc::now().to_rfc3339())
        .build()
}

pub const NAME: &str = "reset-user";

pub fn definition() -> Value {
    SlashCommandBuilder::new()
        .name(NAME)
        .description("reset a tsmp user")
        .default_member_permissions(ADMINISTRATOR)
        .user_option(|o| o.name("user").description("the user to reset").required())
        .build()
}

pub struct ResetUser {
    store: Arc<dyn MemberStore>,
}

impl ResetUser {
    pub fn new(store: Arc<dyn MemberStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for ResetUser {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, interaction: &Interaction) -> TsmpResult<MessageData> {
        let target = target_user(interaction)?;

        let Some(member) = self.store.member_by_discord_id(&target.id.to_string()).await? else {
            return Ok(MessageData::content("User not found."));
        };

        let mut description = format!("Reset {}", target.tag());

        let deleted_application = match &member.application {
            None => {
                description.push_str("\nApplication not found.");
                false
            }
            Some(application) => match self.store.delete_application(application.id).await {
                Ok(deleted) => deleted,
                Err(e) => {
                    tracing::warn!(application_id = %application.id, "Failed to delete application: {e}");
                    false
                }
            },
        };

        let removed_link = match self.store.clear_minecraft_link(member.user.id).await {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::warn!(user_id = %member.user.id, "Failed to clear Minecraft link: {e}");
                false
            }
        };

        tracing::info!(
            user_id = %member.user.id,
            deleted_application,
            removed_link,
            "Reset user"
        );

        let mut reply = MessageData::embed(status_embed(
            "User",
            &description,
            &[
                ("Deleted Application", deleted_application),
                ("Removed Link", removed_link),
            ],
        ));
        if member.application.is_none() {
            reply.content = Some("Application not found.".into());
        }
        Ok(reply)
    }
}
