//! The one operation the presentation layer consumes: resolve a lookback
//! window and fetch (or replay from cache) the matching price series.

use std::sync::Arc;

use crate::cache::{SeriesCache, SeriesKey};
use crate::provider::{HistoryProvider, HistoryRequest};
use crate::window::Lookback;
use crate::{CoreError, PriceSeries, Symbol, TradingDate};

/// Fixed index symbol substituted when the ticker input is absent or blank.
pub const DEFAULT_SYMBOL: &str = "^NSEI";

/// Composes the date-window resolver, the history provider, and the series
/// cache. Owns the cache outright; construct once and share.
#[derive(Clone)]
pub struct HistoryService {
    provider: Arc<dyn HistoryProvider>,
    cache: SeriesCache,
}

impl HistoryService {
    pub fn new(provider: Arc<dyn HistoryProvider>, cache: SeriesCache) -> Self {
        Self { provider, cache }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Resolve the effective ticker and lookback window, then return the
    /// series — from cache when the exact `(symbol, start, end)` signature
    /// was fetched before, from the provider otherwise.
    ///
    /// `today` is the window's reference date and must be evaluated by the
    /// caller per request, never captured once at startup.
    pub async fn resolve_and_fetch(
        &self,
        ticker: Option<&str>,
        period_code: &str,
        today: TradingDate,
    ) -> Result<PriceSeries, CoreError> {
        let symbol = match ticker.map(str::trim).filter(|t| !t.is_empty()) {
            Some(input) => Symbol::parse(input)?,
            None => Symbol::parse(DEFAULT_SYMBOL)?,
        };

        let window = Lookback::from_code(period_code).window_ending(today);
        let key = SeriesKey::new(symbol.clone(), window);

        if let Some(series) = self.cache.get(&key).await {
            tracing::debug!(symbol = %symbol, start = %window.start, end = %window.end, "cache hit");
            return Ok(series);
        }

        let series = self
            .provider
            .history(HistoryRequest { symbol, window })
            .await?;

        self.cache.put(key, series.clone()).await;
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider double that answers with an empty series and records every
    /// request it actually receives.
    struct RecordingProvider {
        calls: AtomicUsize,
        requests: Mutex<Vec<HistoryRequest>>,
        fail_with: Option<ProviderError>,
    }

    impl RecordingProvider {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(error: ProviderError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                fail_with: Some(error),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> HistoryRequest {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .last()
                .expect("at least one request recorded")
                .clone()
        }
    }

    impl HistoryProvider for RecordingProvider {
        fn history<'a>(
            &'a self,
            req: HistoryRequest,
        ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(req.clone());
            let response = match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(PriceSeries::empty(req.symbol, req.window)),
            };
            Box::pin(async move { response })
        }
    }

    fn service(provider: Arc<RecordingProvider>) -> HistoryService {
        HistoryService::new(provider, SeriesCache::with_capacity(8))
    }

    fn today() -> TradingDate {
        TradingDate::parse("2024-06-15").expect("date")
    }

    #[tokio::test]
    async fn resolves_ticker_and_three_month_window() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        let series = svc
            .resolve_and_fetch(Some("aapl"), "3M", today())
            .await
            .expect("must fetch");

        assert_eq!(series.symbol.as_str(), "AAPL");
        let req = provider.last_request();
        assert_eq!(req.window.start.format_iso(), "2024-03-15");
        assert_eq!(req.window.end.format_iso(), "2024-06-15");
    }

    #[tokio::test]
    async fn blank_ticker_defaults_to_index_symbol() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        svc.resolve_and_fetch(None, "1Y", today())
            .await
            .expect("must fetch");
        svc.cache().clear().await;
        svc.resolve_and_fetch(Some("   "), "1Y", today())
            .await
            .expect("must fetch");

        for req in provider
            .requests
            .lock()
            .expect("request store should not be poisoned")
            .iter()
        {
            assert_eq!(req.symbol.as_str(), DEFAULT_SYMBOL);
            assert_eq!(req.window.start.format_iso(), "2023-06-15");
        }
    }

    #[tokio::test]
    async fn second_identical_call_is_a_cache_hit() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        let first = svc
            .resolve_and_fetch(Some("AAPL"), "3M", today())
            .await
            .expect("must fetch");
        let second = svc
            .resolve_and_fetch(Some("AAPL"), "3M", today())
            .await
            .expect("must replay");

        assert_eq!(first, second);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn changing_any_input_misses_the_cache() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        svc.resolve_and_fetch(Some("AAPL"), "3M", today())
            .await
            .expect("must fetch");
        svc.resolve_and_fetch(Some("MSFT"), "3M", today())
            .await
            .expect("different ticker");
        svc.resolve_and_fetch(Some("AAPL"), "6M", today())
            .await
            .expect("different window");
        let next_day = TradingDate::parse("2024-06-16").expect("date");
        svc.resolve_and_fetch(Some("AAPL"), "3M", next_day)
            .await
            .expect("day rolled over");

        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn unrecognized_period_falls_back_to_one_month() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        svc.resolve_and_fetch(Some("AAPL"), "FOREVER", today())
            .await
            .expect("must fetch");

        let req = provider.last_request();
        assert_eq!(req.window.start.format_iso(), "2024-05-15");
    }

    #[tokio::test]
    async fn invalid_ticker_is_a_validation_error() {
        let provider = Arc::new(RecordingProvider::ok());
        let svc = service(provider.clone());

        let err = svc
            .resolve_and_fetch(Some("AAPL$"), "1M", today())
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failures_are_not_cached() {
        let provider = Arc::new(RecordingProvider::failing(ProviderError::Transport(
            String::from("connection refused"),
        )));
        let svc = service(provider.clone());

        for _ in 0..2 {
            let err = svc
                .resolve_and_fetch(Some("AAPL"), "1M", today())
                .await
                .expect_err("must fail");
            assert!(matches!(err, CoreError::Provider(_)));
        }

        assert_eq!(provider.call_count(), 2);
        assert!(svc.cache().is_empty().await);
    }
}
