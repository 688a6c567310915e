use cardscan_core::{Config, Locale};
use cardscan_storage::BlobStore;
use std::sync::Arc;

use crate::services::CardScanService;

/// Shared per-process state; built once in setup and read by every handler.
pub struct AppState {
    pub config: Config,
    pub scanner: CardScanService,
}

impl AppState {
    pub fn new(config: Config, scanner: CardScanService) -> Self {
        Self { config, scanner }
    }

    pub fn locale(&self) -> Locale {
        self.config.locale()
    }

    pub fn storage(&self) -> &Arc<dyn BlobStore> {
        self.scanner.uploader().store()
    }
}
