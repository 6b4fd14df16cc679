//! `POST /api/interactions`: Discord's HTTP interactions webhook.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use tsmp_common::error::TsmpError;
use tsmp_discord::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use tsmp_discord::{Interaction, InteractionResponse, InteractionType, MessageData};

use crate::commands::Command;
use crate::discord::Responder;
use crate::BotState;

pub fn router() -> Router<Arc<BotState>> {
    Router::new().route("/interactions", post(handle_interaction))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn handle_interaction(
    State(state): State<Arc<BotState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, TsmpError> {
    let (Some(signature), Some(timestamp)) =
        (header(&headers, SIGNATURE_HEADER), header(&headers, TIMESTAMP_HEADER))
    else {
        return Err(TsmpError::Unauthorized);
    };
    if state.verifier.verify(signature, timestamp, &body).is_err() {
        tracing::warn!("Rejected interaction with a bad signature");
        return Err(TsmpError::Unauthorized);
    }

    let interaction: Interaction =
        serde_json::from_slice(&body).map_err(|e| TsmpError::Validation {
            message: format!("Malformed interaction: {e}"),
        })?;

    match interaction.kind {
        InteractionType::PING => Ok(Json(InteractionResponse::pong()).into_response()),
        InteractionType::APPLICATION_COMMAND => {
            let name = interaction
                .data
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or_default();

            let Some(command) = state.registry.get(name) else {
                tracing::warn!(command = name, "Unknown command");
                let reply = MessageData::content("Unknown command.").ephemeral();
                return Ok(Json(InteractionResponse::message(reply)).into_response());
            };

            tracing::info!(
                command = name,
                invoker = ?interaction.invoker().map(|u| u.id),
                "Running command"
            );
            let responder = state.responder.clone();
            tokio::spawn(execute(command, interaction, responder));

            Ok(Json(InteractionResponse::deferred_ephemeral()).into_response())
        }
        other => Err(TsmpError::Validation {
            message: format!("Unsupported interaction type {}", other.0),
        }),
    }
}

/// Run a command and replace the deferred response with its result.
pub async fn execute(command: Arc<dyn Command>, interaction: Interaction, responder: Arc<dyn Responder>) {
    let reply = match command.run(&interaction).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(command = command.name(), "Command failed: {e}");
            MessageData::content(format!("Something went wrong: {e}"))
        }
    };

    if let Err(e) = responder.edit_original(&interaction.token, reply).await {
        tracing::error!(command = command.name(), "Failed to edit interaction response: {e}");
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn ping_is_ponged() {
        let harness = BotHarness::new();
        let (status, body) = harness.signed(json!({
            "id": "1", "application_id": "2", "type": 1, "token": "t"
        })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "type": 1 }));
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized() {
        let harness = BotHarness::new();
        let (status, _) = harness
            .raw(br#"{"type":1}"#.to_vec(), Some("00".repeat(64)), Some("1".into()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = harness.raw(br#"{"type":1}"#.to_vec(), None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn command_is_deferred_then_edited() {
        let harness = BotHarness::new();
        harness.members.add(member("80351110224678912", true, true, None));

        let (status, body) = harness
            .signed(command_json("reset-user", "80351110224678912", "Nelly", "0"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "type": 5, "data": { "flags": 64 } }));

        let (token, reply) = harness.next_edit(Duration::from_secs(5)).await;
        assert_eq!(token, "interaction-token");
        assert_eq!(reply.embeds[0].description.as_deref(), Some("Reset Nelly"));
    }

    #[tokio::test]
    async fn unknown_command_replies_immediately() {
        let harness = BotHarness::new();
        let (status, body) = harness
            .signed(command_json("ping", "1", "Nelly", "0"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "type": 4, "data": { "content": "Unknown command.", "flags": 64 } })
        );
    }

    #[tokio::test]
    async fn other_interaction_types_are_rejected() {
        let harness = BotHarness::new();
        let (status, _) = harness.signed(json!({
            "id": "1", "application_id": "2", "type": 3, "token": "t"
        })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
