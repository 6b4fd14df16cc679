//! Market models: live inventories and what gets listed from them.
//!
//! Slot indices follow the Minecraft player inventory numbering:
//!
//! | Range  | Area      |
//! |--------|-----------|
//! | 0..9   | hot-bar   |
//! | 9..36  | main      |
//! | 36..40 | armor     |
//! | 40     | off-hand  |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use uuid::Uuid;
use validator::Validate;

pub const HOT_BAR_SLOTS: Range<usize> = 0..9;
pub const MAIN_SLOTS: Range<usize> = 9..36;
pub const ARMOR_SLOTS: Range<usize> = 36..40;
pub const OFF_HAND_SLOTS: Range<usize> = 40..41;
/// Total number of addressable player slots.
pub const SLOT_COUNT: usize = 41;

/// One occupied inventory slot as shown to the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub index: u8,
    pub name: String,
    pub amount: u32,
    pub image: String,
}

/// A player's inventory split into its display areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub inventory: Vec<Option<Item>>,
    pub hot_bar: Vec<Option<Item>>,
    pub armor: Vec<Option<Item>>,
    pub off_hand: Vec<Option<Item>>,
}

impl Inventory {
    /// Lay out items by their slot index. Items with an index outside the
    /// player inventory are dropped.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut slots: Vec<Option<Item>> = vec![None; SLOT_COUNT];
        for item in items {
            if let Some(slot) = slots.get_mut(item.index as usize) {
                *slot = Some(item);
            }
        }
        Self {
            inventory: slots[MAIN_SLOTS].to_vec(),
            hot_bar: slots[HOT_BAR_SLOTS].to_vec(),
            armor: slots[ARMOR_SLOTS].to_vec(),
            off_hand: slots[OFF_HAND_SLOTS].to_vec(),
        }
    }
}

/// An item kind the market has seen published at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiscoveredItemType {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Where a listing is in the sale flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Recorded before the item is taken from the game. A pending listing
    /// whose take outcome is unknown is kept for reconciliation.
    Pending,
    /// The item has left the seller's inventory and is on sale.
    Active,
}

/// A published item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MarketListing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub slot: i32,
    pub item_name: String,
    pub amount: i32,
    pub price: f64,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

/// `market.sellItem` input.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SellItemRequest {
    #[validate(range(min = 0, max = 40, message = "Index must be an inventory slot (0-40)"))]
    pub index: i64,

    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: f64,
}
