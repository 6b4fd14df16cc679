//! Wire types of the market RPCs.

use serde::{Deserialize, Serialize};

/// One occupied inventory slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub index: u8,
    pub name: String,
    pub amount: u32,
    pub image: String,
}

/// A player's live inventory, split the way the game draws it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub inventory: Vec<Option<Item>>,
    pub hot_bar: Vec<Option<Item>>,
    pub armor: Vec<Option<Item>>,
    pub off_hand: Vec<Option<Item>>,
}

impl Inventory {
    /// Every occupied slot, in area order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.inventory
            .iter()
            .chain(&self.hot_bar)
            .chain(&self.armor)
            .chain(&self.off_hand)
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredItemType {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellItemRequest {
    pub index: u8,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketListing {
    pub id: String,
    pub seller_id: String,
    pub slot: i32,
    pub item_name: String,
    pub amount: i32,
    pub price: f64,
    pub status: String,
    pub created_at: String,
}
