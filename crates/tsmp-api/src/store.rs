//! Storage seams used by the route handlers, implemented for [`Database`].

use async_trait::async_trait;
use tsmp_common::error::TsmpResult;
use tsmp_common::models::{Account, DiscoveredItemType, MarketListing, User};
use tsmp_db::repository::{accounts, market, users};
use tsmp_db::repository::market::NewListing;
use tsmp_db::Database;
use uuid::Uuid;

/// Read access to users and their provider accounts.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_by_id(&self, id: Uuid) -> TsmpResult<Option<User>>;

    async fn user_by_minecraft_uuid(&self, minecraft_uuid: Uuid) -> TsmpResult<Option<User>>;

    async fn accounts(&self, user_id: Uuid) -> TsmpResult<Vec<Account>>;
}

/// The market catalog and listings.
#[async_trait]
pub trait MarketStore: Send + Sync {
    async fn discovered_item_types(&self) -> TsmpResult<Vec<DiscoveredItemType>>;

    /// Commit `listing` as pending, before its item is taken.
    async fn reserve_listing(&self, listing: &NewListing) -> TsmpResult<MarketListing>;

    /// Put a pending listing on sale and add its kind to the catalog.
    async fn activate_listing(&self, id: Uuid, image: Option<&str>) -> TsmpResult<MarketListing>;

    /// Drop a pending listing whose item stayed in the game.
    async fn discard_listing(&self, id: Uuid) -> TsmpResult<bool>;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn healthy(&self) -> bool;
}

#[async_trait]
impl UserDirectory for Database {
    async fn user_by_id(&self, id: Uuid) -> TsmpResult<Option<User>> {
        Ok(users::find_by_id(&self.pool, id).await?)
    }

    async fn user_by_minecraft_uuid(&self, minecraft_uuid: Uuid) -> TsmpResult<Option<User>> {
        Ok(users::find_by_minecraft_uuid(&self.pool, minecraft_uuid).await?)
    }

    async fn accounts(&self, user_id: Uuid) -> TsmpResult<Vec<Account>> {
        Ok(accounts::list_for_user(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl MarketStore for Database {
    async fn discovered_item_types(&self) -> TsmpResult<Vec<DiscoveredItemType>> {
        Ok(market::discovered_item_types(&self.pool).await?)
    }

    async fn reserve_listing(&self, listing: &NewListing) -> TsmpResult<MarketListing> {
        Ok(market::reserve_listing(&self.pool, listing).await?)
    }

    async fn activate_listing(&self, id: Uuid, image: Option<&str>) -> TsmpResult<MarketListing> {
        Ok(market::activate_listing(&self.pool, id, image).await?)
    }

    async fn discard_listing(&self, id: Uuid) -> TsmpResult<bool> {
        Ok(market::discard_listing(&self.pool, id).await?)
    }
}

#[async_trait]
impl HealthProbe for Database {
    async fn healthy(&self) -> bool {
        tsmp_db::postgres::health_check(&self.pool).await
    }
}
