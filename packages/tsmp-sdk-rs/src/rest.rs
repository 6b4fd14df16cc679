//! Async REST client for the TSMP website API.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, SdkError};
use crate::types::{DiscoveredItemType, Inventory, MarketListing, SellItemRequest};

const DEFAULT_BASE: &str = "http://localhost:3000/api";

/// The market RPCs a [`MarketView`](crate::market::MarketView) polls.
#[async_trait]
pub trait MarketSource: Send + Sync + 'static {
    async fn inventory(&self) -> Result<Inventory>;

    async fn discovered_item_types(&self) -> Result<Vec<DiscoveredItemType>>;

    async fn sell_item(&self, request: &SellItemRequest) -> Result<MarketListing>;
}

/// Async TSMP REST client, authenticated with a website session token.
///
/// ```rust,no_run
/// use tsmp_sdk::rest::{MarketSource, RestClient};
///
/// #[tokio::main]
/// async fn main() -> tsmp_sdk::Result<()> {
///     let rest = RestClient::new("session-jwt", None)?;
///     let inventory = rest.inventory().await?;
///     println!("{} items", inventory.items().count());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    pub fn new(session_token: &str, base_url: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut h = reqwest::header::HeaderMap::new();
                h.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {session_token}"))
                        .map_err(|e| SdkError::Other(e.to_string()))?,
                );
                h
            })
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or(DEFAULT_BASE).trim_end_matches('/').to_owned(),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.json::<Value>().await.unwrap_or(Value::Null);
            let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_owned);
            return Err(SdkError::Api {
                status: status.as_u16(),
                code: field("error").unwrap_or_default(),
                message: field("message").unwrap_or_else(|| status.to_string()),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl MarketSource for RestClient {
    async fn inventory(&self) -> Result<Inventory> {
        self.request(Method::GET, "/rpc/market.inventory", None).await
    }

    async fn discovered_item_types(&self) -> Result<Vec<DiscoveredItemType>> {
        self.request(Method::GET, "/rpc/market.discoveredItemTypes", None)
            .await
    }

    async fn sell_item(&self, request: &SellItemRequest) -> Result<MarketListing> {
        let body = serde_json::to_value(request)?;
        self.request(Method::POST, "/rpc/market.sellItem", Some(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalised() {
        let rest = RestClient::new("token", Some("https://tristansmp.com/api/")).unwrap();
        assert_eq!(rest.base_url, "https://tristansmp.com/api");
    }

    #[test]
    fn rejects_tokens_that_cannot_be_headers() {
        assert!(matches!(
            RestClient::new("bad\ntoken", None),
            Err(SdkError::Other(_))
        ));
    }
}
