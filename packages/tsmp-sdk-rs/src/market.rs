//! A live view of the signed-in player's market page.
//!
//! [`MarketView`] keeps the player's inventory and the discovered item
//! catalog fresh by polling each on its own loop, tracks the item picked for
//! sale, and submits sales.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Result, SdkError};
use crate::rest::MarketSource;
use crate::types::{DiscoveredItemType, Inventory, Item, MarketListing, SellItemRequest};

#[derive(Debug, Clone)]
pub struct MarketOptions {
    /// Delay between the end of one poll and the start of the next.
    pub poll_interval: Duration,
}

impl Default for MarketOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Latest result of a polled query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> QueryState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Polls the market RPCs until dropped.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tsmp_sdk::market::{MarketOptions, MarketView};
/// use tsmp_sdk::rest::RestClient;
///
/// #[tokio::main]
/// async fn main() -> tsmp_sdk::Result<()> {
///     let rest = Arc::new(RestClient::new("session-jwt", None)?);
///     let view = MarketView::open(Some(rest), MarketOptions::default())?;
///
///     let mut inventory = view.watch_inventory();
///     inventory.changed().await.ok();
///     println!("{:?}", *inventory.borrow());
///     Ok(())
/// }
/// ```
pub struct MarketView {
    source: Arc<dyn MarketSource>,
    inventory: watch::Receiver<QueryState<Inventory>>,
    discovered: watch::Receiver<QueryState<Vec<DiscoveredItemType>>>,
    refetch_inventory: Arc<Notify>,
    selection: Mutex<Option<Item>>,
    tasks: Vec<JoinHandle<()>>,
}

impl MarketView {
    /// Start polling. `session` is `None` when nobody is signed in, in which
    /// case no request is made. Must be called inside a Tokio runtime.
    pub fn open(session: Option<Arc<dyn MarketSource>>, options: MarketOptions) -> Result<Self> {
        let source = session.ok_or(SdkError::NotSignedIn)?;

        let (inventory_tx, inventory) = watch::channel(QueryState::Loading);
        let (discovered_tx, discovered) = watch::channel(QueryState::Loading);
        let refetch_inventory = Arc::new(Notify::new());

        let inventory_task = {
            let source = Arc::clone(&source);
            tokio::spawn(poll(
                "inventory",
                inventory_tx,
                options.poll_interval,
                Arc::clone(&refetch_inventory),
                move || {
                    let source = Arc::clone(&source);
                    async move { source.inventory().await }
                },
            ))
        };

        let discovered_task = {
            let source = Arc::clone(&source);
            tokio::spawn(poll(
                "discoveredItemTypes",
                discovered_tx,
                options.poll_interval,
                Arc::new(Notify::new()),
                move || {
                    let source = Arc::clone(&source);
                    async move { source.discovered_item_types().await }
                },
            ))
        };

        Ok(Self {
            source,
            inventory,
            discovered,
            refetch_inventory,
            selection: Mutex::new(None),
            tasks: vec![inventory_task, discovered_task],
        })
    }

    pub fn inventory(&self) -> QueryState<Inventory> {
        self.inventory.borrow().clone()
    }

    pub fn discovered_item_types(&self) -> QueryState<Vec<DiscoveredItemType>> {
        self.discovered.borrow().clone()
    }

    /// Subscribe to inventory updates.
    pub fn watch_inventory(&self) -> watch::Receiver<QueryState<Inventory>> {
        self.inventory.clone()
    }

    pub fn watch_discovered_item_types(&self) -> watch::Receiver<QueryState<Vec<DiscoveredItemType>>> {
        self.discovered.clone()
    }

    /// Pick a slot to sell. Empty slots can't be picked; returns whether the
    /// selection changed.
    pub fn select(&self, slot: Option<&Item>) -> bool {
        let Some(item) = slot else {
            return false;
        };
        *self.lock_selection() = Some(item.clone());
        true
    }

    pub fn selection(&self) -> Option<Item> {
        self.lock_selection().clone()
    }

    pub fn clear_selection(&self) {
        *self.lock_selection() = None;
    }

    /// List `item` for `price`. On success the selection is cleared and the
    /// inventory is fetched again right away.
    pub async fn sell(&self, item: &Item, price: f64) -> Result<MarketListing> {
        let listing = self
            .source
            .sell_item(&SellItemRequest {
                index: item.index,
                price,
            })
            .await?;

        self.clear_selection();
        self.refetch_inventory.notify_one();
        Ok(listing)
    }

    fn lock_selection(&self) -> std::sync::MutexGuard<'_, Option<Item>> {
        self.selection
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for MarketView {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

async fn poll<T, F, Fut>(
    query: &'static str,
    tx: watch::Sender<QueryState<T>>,
    interval: Duration,
    refetch: Arc<Notify>,
    fetch: F,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    loop {
        match fetch().await {
            Ok(data) => {
                tx.send_replace(QueryState::Ready(data));
            }
            Err(e) => {
                warn!(query, "Market poll failed: {e}");
                tx.send_replace(QueryState::Error(e.to_string()));
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = refetch.notified() => debug!(query, "Refetching"),
        }
    }
}
