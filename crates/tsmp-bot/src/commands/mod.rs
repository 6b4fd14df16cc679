//! Slash commands and the registry the interactions endpoint routes through.

pub mod refresh;
pub mod reset_user;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tsmp_common::error::{TsmpError, TsmpResult};
use tsmp_discord::{DiscordUser, Interaction, MessageData};

pub use refresh::Refresh;
pub use reset_user::ResetUser;

/// A chat input command. Runs after the interaction has been deferred; the
/// returned message replaces the deferred response.
#[async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, interaction: &Interaction) -> TsmpResult<MessageData>;
}

/// Definitions of every command, as sent to Discord on registration.
pub fn definitions() -> Vec<Value> {
    vec![refresh::definition(), reset_user::definition()]
}

/// The `user` option every admin command takes.
pub(crate) fn target_user(interaction: &Interaction) -> TsmpResult<DiscordUser> {
    interaction
        .data
        .as_ref()
        .and_then(|d| d.user_option("user"))
        .ok_or_else(|| TsmpError::Validation {
            message: "Missing user option".into(),
        })
}

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, command: impl Command + 'static) -> Self {
        self.commands.insert(command.name(), Arc::new(command));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }
}
