use tokio::sync::watch;

use crate::config::BrewConfig;
use crate::events;
use crate::orders::{Order, price};
use crate::panels::errors::PanelError;
use crate::refresh::{RefreshOptions, RefreshSource, SharedFetcher, Snapshot};

/// The "current order" card: the newest few orders, refreshed while shown.
pub struct OrderDisplay {
    source: RefreshSource<Order>,
    visible: bool,
}

impl OrderDisplay {
    pub const NAME: &'static str = "order_display";

    pub fn new(options: RefreshOptions, fetcher: SharedFetcher<Order>) -> Self {
        Self {
            source: RefreshSource::new(Self::NAME, options, fetcher),
            visible: false,
        }
    }

    pub fn from_config(
        config: &BrewConfig,
        fetcher: SharedFetcher<Order>,
    ) -> Result<Self, PanelError> {
        config
            .validate()
            .map_err(PanelError::invalid_config(Self::NAME))?;

        let options = RefreshOptions {
            interval: config.orders.refresh_interval(),
            cap: Some(config.orders.display_cap()),
            fetch_timeout: config.endpoint.fetch_timeout(),
        };
        Ok(Self::new(options, fetcher))
    }

    /// Show or hide the panel. A source that refuses to start keeps the
    /// panel hidden.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = self.source.set_visible(visible);
        if self.visible == visible {
            events::log_panel_visibility(Self::NAME, visible);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Newest orders first, at most the display cap.
    pub fn orders(&self) -> Vec<Order> {
        self.source.snapshot().items().to_vec()
    }

    /// The order the card shows, if the panel is up and anything arrived yet.
    pub fn current_order(&self) -> Option<Order> {
        if !self.visible {
            return None;
        }
        self.source.snapshot().items().first().cloned()
    }

    /// Total for [`current_order`](Self::current_order), e.g. `$6.60`.
    pub fn current_total(&self) -> Option<String> {
        self.current_order().map(|order| price(&order))
    }

    pub fn snapshot(&self) -> Snapshot<Order> {
        self.source.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Order>> {
        self.source.subscribe()
    }
}
