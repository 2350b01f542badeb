use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::orders::errors::FetchError;
use crate::orders::types::Order;
use crate::refresh::fetcher::{FetchFuture, Fetcher};

/// Reads the `<order_id>.json` files the ordering agent saves to disk.
///
/// Orders come back newest first, the same order the HTTP endpoint uses,
/// so a display cap keeps the latest ones. A missing directory means "no
/// orders yet", not an error. Unreadable or malformed files are skipped
/// with a warning.
#[derive(Debug, Clone)]
pub struct DirectoryOrderSource {
    dir: PathBuf,
}

impl DirectoryOrderSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn fetch_orders(&self) -> Result<Vec<Order>, FetchError> {
        read_orders(self.dir.clone()).await
    }
}

async fn read_orders(dir: PathBuf) -> Result<Vec<Order>, FetchError> {
    let io_error = |e: std::io::Error| FetchError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut entries = match tokio::fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.orders.directory_missing",
                path = %dir.display(),
            );
            return Ok(Vec::new());
        }
        Err(e) => return Err(io_error(e)),
    };

    let mut orders = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    event = "core.orders.file_read_failed",
                    path = %path.display(),
                    error = %e,
                );
                continue;
            }
        };

        match serde_json::from_str::<Order>(&content) {
            Ok(order) => orders.push(order),
            Err(e) => {
                warn!(
                    event = "core.orders.file_parse_failed",
                    path = %path.display(),
                    error = %e,
                );
            }
        }
    }

    sort_newest_first(&mut orders);

    debug!(
        event = "core.orders.directory_fetch_completed",
        path = %dir.display(),
        count = orders.len(),
    );

    Ok(orders)
}

/// Newest first by parsed timestamp; unparseable timestamps sink to the end.
/// Ties fall back to order id, which the agent derives from the save time.
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.placed_at()
            .cmp(&a.placed_at())
            .then_with(|| b.order_id.cmp(&a.order_id))
    });
}

impl Fetcher<Order> for DirectoryOrderSource {
    fn fetch(&self) -> FetchFuture<Order> {
        Box::pin(read_orders(self.dir.clone()))
    }
}
