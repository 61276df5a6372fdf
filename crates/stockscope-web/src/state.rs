use std::sync::Arc;

use stockscope_core::{
    HistoryProvider, HistoryService, ReqwestHttpClient, SeriesCache, YahooHistory,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub history: HistoryService,
}

impl AppState {
    pub fn new(history: HistoryService) -> Self {
        Self { history }
    }

    /// Wire an arbitrary provider behind a fresh cache; used by tests to
    /// swap the network out.
    pub fn with_provider(provider: Arc<dyn HistoryProvider>, cache_capacity: usize) -> Self {
        Self::new(HistoryService::new(
            provider,
            SeriesCache::with_capacity(cache_capacity),
        ))
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let http_client = Arc::new(ReqwestHttpClient::new());
    let provider = Arc::new(YahooHistory::new(http_client));
    Arc::new(AppState::with_provider(provider, config.cache_capacity))
}
