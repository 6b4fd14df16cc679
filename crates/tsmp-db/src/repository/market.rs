//! Market repository: discovered item catalog and listings.
//!
//! A sale is recorded in two steps around the in-game take. The listing is
//! committed as `pending` first, so an item that leaves the game always has
//! a row. Only then is the item taken. A confirmed take activates the
//! listing and adds its kind to the catalog. A refused take discards the
//! pending row.

use sqlx::PgPool;
use tsmp_common::models::market::{DiscoveredItemType, ListingStatus, MarketListing};
use uuid::Uuid;

/// A listing about to be published.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub slot: i32,
    pub item_name: String,
    pub amount: i32,
    pub price: f64,
}

/// Every item kind ever published, oldest discovery first.
pub async fn discovered_item_types(pool: &PgPool) -> Result<Vec<DiscoveredItemType>, sqlx::Error> {
    sqlx::query_as::<_, DiscoveredItemType>(
        "SELECT name, image FROM discovered_item_types ORDER BY first_seen_at, name",
    )
    .fetch_all(pool)
    .await
}

/// Record a listing as `pending`. Committed before the item is taken.
pub async fn reserve_listing(pool: &PgPool, listing: &NewListing) -> Result<MarketListing, sqlx::Error> {
    sqlx::query_as::<_, MarketListing>(
        r#"
        INSERT INTO market_listings (id, seller_id, slot, item_name, amount, price, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(listing.id)
    .bind(listing.seller_id)
    .bind(listing.slot)
    .bind(&listing.item_name)
    .bind(listing.amount)
    .bind(listing.price)
    .bind(ListingStatus::Pending)
    .fetch_one(pool)
    .await
}

/// Put a pending listing on sale and record its item kind.
///
/// Returns `RowNotFound` if the listing is not pending.
pub async fn activate_listing(
    pool: &PgPool,
    id: Uuid,
    image: Option<&str>,
) -> Result<MarketListing, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, MarketListing>(
        "UPDATE market_listings SET status = $2 WHERE id = $1 AND status = $3 RETURNING *",
    )
    .bind(id)
    .bind(ListingStatus::Active)
    .bind(ListingStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO discovered_item_types (name, image, first_seen_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (name) DO UPDATE SET
            image = COALESCE(EXCLUDED.image, discovered_item_types.image)
        "#,
    )
    .bind(&row.item_name)
    .bind(image)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// Drop a pending listing whose item stayed in the game. Active listings
/// are never touched. Returns whether a row went.
pub async fn discard_listing(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM market_listings WHERE id = $1 AND status = $2")
        .bind(id)
        .bind(ListingStatus::Pending)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
