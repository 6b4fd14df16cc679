//! Market RPCs: the caller's live inventory, the item catalog, and selling.

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tsmp_common::{
    error::{TsmpError, TsmpResult},
    models::{DiscoveredItemType, Inventory, Item, MarketListing, SellItemRequest, User},
    snowflake::generate_id,
    validation::validate_request,
};
use tsmp_db::repository::market::NewListing;
use tsmp_minecraft::{SlotStack, TakeOutcome};
use uuid::Uuid;

use crate::{middleware::AuthContext, AppState};

/// Market routes (all require authentication).
pub fn router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/rpc/market.inventory", get(inventory))
        .route("/rpc/market.discoveredItemTypes", get(discovered_item_types))
        .route("/rpc/market.sellItem", post(sell_item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth_middleware,
        ))
}

/// The caller's user row and linked Minecraft account.
async fn linked_player(state: &AppState, auth: &AuthContext) -> TsmpResult<(User, Uuid)> {
    let user = state
        .users
        .user_by_id(auth.user_id)
        .await?
        .ok_or(TsmpError::Unauthorized)?;
    let player = user.minecraft_uuid.ok_or(TsmpError::NotLinked)?;
    Ok((user, player))
}

/// Occupied slots of the player's live inventory.
async fn live_slots(state: &AppState, player: Uuid) -> TsmpResult<Vec<SlotStack>> {
    state
        .minecraft
        .inventory(player)
        .await?
        .ok_or(TsmpError::PlayerOffline)
}

fn to_item(state: &AppState, stack: &SlotStack) -> Item {
    Item {
        index: stack.slot,
        name: stack.material.clone(),
        amount: stack.amount,
        image: state.minecraft_config.item_image(&stack.material),
    }
}

/// GET /api/rpc/market.inventory
async fn inventory(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> TsmpResult<Json<Inventory>> {
    let (_, player) = linked_player(&state, &auth).await?;
    let slots = live_slots(&state, player).await?;
    Ok(Json(Inventory::from_items(
        slots.iter().map(|s| to_item(&state, s)),
    )))
}

/// GET /api/rpc/market.discoveredItemTypes
async fn discovered_item_types(
    State(state): State<Arc<AppState>>,
) -> TsmpResult<Json<Vec<DiscoveredItemType>>> {
    Ok(Json(state.market.discovered_item_types().await?))
}

/// POST /api/rpc/market.sellItem
///
/// The listing is committed as pending before the item is taken from the
/// game, so a taken item always has a row. A refused take discards it; an
/// unknown take outcome leaves it pending.
async fn sell_item(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<SellItemRequest>, JsonRejection>,
) -> TsmpResult<(StatusCode, Json<MarketListing>)> {
    let Json(body) = body.map_err(|rejection| TsmpError::Validation {
        message: rejection.body_text(),
    })?;
    validate_request(&body)?;
    if !body.price.is_finite() {
        return Err(TsmpError::Validation {
            message: "Price must be a finite number".into(),
        });
    }

    let (user, player) = linked_player(&state, &auth).await?;
    let stack = live_slots(&state, player)
        .await?
        .into_iter()
        .find(|s| i64::from(s.slot) == body.index)
        .ok_or_else(|| TsmpError::not_found("Item"))?;

    let pending = state
        .market
        .reserve_listing(&NewListing {
            id: generate_id(),
            seller_id: user.id,
            slot: i32::from(stack.slot),
            item_name: stack.material.clone(),
            amount: i32::try_from(stack.amount).map_err(|_| TsmpError::Validation {
                message: "Stack too large".into(),
            })?,
            price: body.price,
        })
        .await?;

    let refused = match state.minecraft.take_item(player, &stack).await {
        Ok(TakeOutcome::Taken) => {
            let image = state.minecraft_config.item_image(&stack.material);
            let listing = state
                .market
                .activate_listing(pending.id, Some(image.as_str()))
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        listing_id = %pending.id,
                        "Item taken but listing not activated, left pending: {e}"
                    );
                })?;
            tracing::info!(
                listing_id = %listing.id,
                seller = %listing.seller_id,
                item = %listing.item_name,
                price = listing.price,
                "Item listed on the market"
            );
            return Ok((StatusCode::CREATED, Json(listing)));
        }
        Ok(TakeOutcome::Mismatch) => TsmpError::Conflict {
            message: "The item in that slot has changed".into(),
        },
        Ok(TakeOutcome::Offline) => TsmpError::PlayerOffline,
        Err(e) => {
            // The server may have taken the item before the call failed.
            tracing::error!(
                listing_id = %pending.id,
                "Take outcome unknown, listing left pending: {e}"
            );
            return Err(e.into());
        }
    };

    if let Err(e) = state.market.discard_listing(pending.id).await {
        tracing::warn!(listing_id = %pending.id, "Failed to discard refused listing: {e}");
    }
    Err(refused)
}
