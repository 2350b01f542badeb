use tracing::debug;

use crate::orders::errors::FetchError;
use crate::orders::types::{Order, OrdersPayload};
use crate::refresh::fetcher::{FetchFuture, Fetcher};

/// Fetches `GET /api/orders` from the web app.
///
/// Any non-2xx status, transport failure, or body that is not
/// `{ "orders": [...] }` is a [`FetchError`]. Deadlines are enforced by the
/// caller, not here.
#[derive(Debug, Clone)]
pub struct HttpOrderSource {
    client: reqwest::Client,
    url: String,
}

impl HttpOrderSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_orders(&self) -> Result<Vec<Order>, FetchError> {
        fetch_orders(self.client.clone(), self.url.clone()).await
    }
}

async fn fetch_orders(client: reqwest::Client, url: String) -> Result<Vec<Order>, FetchError> {
    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| FetchError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|e| FetchError::Network {
        url: url.clone(),
        message: e.to_string(),
    })?;
    let payload: OrdersPayload = serde_json::from_slice(&body)?;

    debug!(
        event = "core.orders.http_fetch_completed",
        url = %url,
        count = payload.orders.len(),
    );

    Ok(payload.orders)
}

impl Fetcher<Order> for HttpOrderSource {
    fn fetch(&self) -> FetchFuture<Order> {
        Box::pin(fetch_orders(self.client.clone(), self.url.clone()))
    }
}
