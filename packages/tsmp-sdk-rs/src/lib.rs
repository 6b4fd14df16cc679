//! TSMP client SDK for Rust.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tsmp_sdk::{MarketOptions, MarketView, RestClient};
//!
//! #[tokio::main]
//! async fn main() -> tsmp_sdk::Result<()> {
//!     let rest = Arc::new(RestClient::new("session-jwt", None)?);
//!     let view = MarketView::open(Some(rest), MarketOptions::default())?;
//!
//!     let mut inventory = view.watch_inventory();
//!     while inventory.changed().await.is_ok() {
//!         let slot = inventory.borrow().ready().and_then(|inv| inv.hot_bar[0].clone());
//!         if view.select(slot.as_ref()) {
//!             let item = view.selection().unwrap();
//!             view.sell(&item, 10.0).await?;
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod market;
pub mod rest;
pub mod types;

pub use error::{Result, SdkError};
pub use market::{MarketOptions, MarketView, QueryState};
pub use rest::{MarketSource, RestClient};
pub use types::*;
