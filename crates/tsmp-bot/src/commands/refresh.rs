//! `/refresh user:<@user>`: force a role metadata update for one member.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tsmp_common::error::TsmpResult;
use tsmp_discord::builders::{SlashCommandBuilder, ADMINISTRATOR};
use tsmp_discord::{Interaction, MessageData};

use super::{target_user, Command};
use crate::role_metadata::RoleMetadataSync;

pub const NAME: &str = "refresh";

pub fn definition() -> Value {
    SlashCommandBuilder::new()
        .name(NAME)
        .description("force refresh someone")
        .default_member_permissions(ADMINISTRATOR)
        .user_option(|o| o.name("user").description("the user to refresh").required())
        .build()
}

pub struct Refresh {
    sync: Arc<dyn RoleMetadataSync>,
}

impl Refresh {
    pub fn new(sync: Arc<dyn RoleMetadataSync>) -> Self {
        Self { sync }
    }
}

#[async_trait]
impl Command for Refresh {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn run(&self, interaction: &Interaction) -> TsmpResult<MessageData> {
        let user = target_user(interaction)?;

        match self.sync.update(&user.id.to_string()).await {
            Ok(()) => Ok(MessageData::content("Refreshed!")),
            Err(e) => {
                tracing::warn!(target_id = %user.id, "Role metadata refresh failed: {e}");
                Ok(MessageData::content(format!("Refresh failed: {e}")))
            }
        }
    }
}
