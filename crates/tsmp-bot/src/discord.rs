//! The Discord calls the bot makes, behind traits.

use async_trait::async_trait;
use tsmp_discord::{DiscordClient, MessageData, RoleConnection, TokenResponse};

/// Finishes deferred interactions.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn edit_original(&self, interaction_token: &str, data: MessageData) -> tsmp_discord::Result<()>;
}

/// Per-user linked role connections.
#[async_trait]
pub trait RoleConnections: Send + Sync {
    async fn refresh_token(&self, refresh_token: &str) -> tsmp_discord::Result<TokenResponse>;

    async fn put_role_connection(
        &self,
        access_token: &str,
        connection: &RoleConnection,
    ) -> tsmp_discord::Result<()>;
}

#[async_trait]
impl Responder for DiscordClient {
    async fn edit_original(&self, interaction_token: &str, data: MessageData) -> tsmp_discord::Result<()> {
        self.edit_original_response(interaction_token, &data).await
    }
}

#[async_trait]
impl RoleConnections for DiscordClient {
    async fn refresh_token(&self, refresh_token: &str) -> tsmp_discord::Result<TokenResponse> {
        self.refresh_oauth_token(refresh_token).await
    }

    async fn put_role_connection(
        &self,
        access_token: &str,
        connection: &RoleConnection,
    ) -> tsmp_discord::Result<()> {
        DiscordClient::put_role_connection(self, access_token, connection).await
    }
}
