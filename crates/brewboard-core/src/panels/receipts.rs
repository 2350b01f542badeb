use tokio::sync::watch;

use crate::config::BrewConfig;
use crate::events;
use crate::orders::{Order, Receipt};
use crate::panels::errors::PanelError;
use crate::refresh::{RefreshOptions, RefreshSource, SharedFetcher, Snapshot, map_items};

/// Called when the user dismisses the receipts modal.
pub type CloseHandler = Box<dyn FnMut() + Send>;

/// What the modal body should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptsView {
    /// Nothing fetched successfully yet and the last attempt failed.
    Unavailable { error: String },
    /// No receipts yet.
    Empty,
    Receipts(Vec<Receipt>),
}

/// Modal listing every order with its total. Refreshes while open.
pub struct ReceiptsPanel {
    source: RefreshSource<Receipt>,
    visible: bool,
    on_close: Option<CloseHandler>,
}

impl ReceiptsPanel {
    pub const NAME: &'static str = "receipts";

    /// `fetcher` yields orders; each one is priced as it arrives.
    pub fn new(options: RefreshOptions, fetcher: SharedFetcher<Order>) -> Self {
        Self {
            source: RefreshSource::new(Self::NAME, options, map_items(fetcher)),
            visible: false,
            on_close: None,
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
            interval: config.receipts.refresh_interval(),
            cap: None,
            fetch_timeout: config.endpoint.fetch_timeout(),
        };
        Ok(Self::new(options, fetcher))
    }

    /// Replace the close callback.
    pub fn on_close(&mut self, handler: impl FnMut() + Send + 'static) {
        self.on_close = Some(Box::new(handler));
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

    /// Hide the modal and notify the owner. Does nothing if already hidden.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.set_visible(false);
        if let Some(handler) = self.on_close.as_mut() {
            handler();
        }
    }

    pub fn receipts(&self) -> Vec<Receipt> {
        self.source.snapshot().items().to_vec()
    }

    pub fn view(&self) -> ReceiptsView {
        let snapshot = self.source.snapshot();
        if !snapshot.is_empty() {
            return ReceiptsView::Receipts(snapshot.items().to_vec());
        }
        match snapshot.last_error() {
            Some(error) => ReceiptsView::Unavailable {
                error: error.to_string(),
            },
            None => ReceiptsView::Empty,
        }
    }

    pub fn snapshot(&self) -> Snapshot<Receipt> {
        self.source.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<Receipt>> {
        self.source.subscribe()
    }
}
