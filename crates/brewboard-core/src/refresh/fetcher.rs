use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::orders::errors::FetchError;

pub type FetchFuture<T> = BoxFuture<'static, Result<Vec<T>, FetchError>>;

/// Something a refresh source can poll for the latest list of `T`.
///
/// Implemented for the HTTP and directory order sources, and for any
/// `Fn() -> impl Future<Output = Result<Vec<T>, FetchError>>` closure.
/// Swapping polling for a push channel only means supplying a different
/// fetcher.
pub trait Fetcher<T>: Send + Sync + 'static {
    fn fetch(&self) -> FetchFuture<T>;
}

impl<T, F, Fut> Fetcher<T> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send + 'static,
{
    fn fetch(&self) -> FetchFuture<T> {
        Box::pin(self())
    }
}

/// Shared handle to a fetcher, as held by panels and sources.
pub type SharedFetcher<T> = Arc<dyn Fetcher<T>>;

/// Run one fetch, converting an elapsed deadline into [`FetchError::Timeout`].
pub async fn fetch_with_timeout<T: 'static>(
    fetcher: &dyn Fetcher<T>,
    timeout: Duration,
) -> Result<Vec<T>, FetchError> {
    match tokio::time::timeout(timeout, fetcher.fetch()).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Adapt a fetcher of `T` into a fetcher of `U`, converting every item.
///
/// Used to turn an order fetcher into a receipt fetcher.
pub fn map_items<T, U>(inner: SharedFetcher<T>) -> SharedFetcher<U>
where
    T: Send + 'static,
    U: From<T> + Send + 'static,
{
    Arc::new(move || {
        let pending = inner.fetch();
        async move { pending.await.map(|items| items.into_iter().map(U::from).collect()) }
    })
}
