//! Historical-series fetching: the provider contract and the Yahoo Finance
//! chart-endpoint adapter.
//!
//! The adapter performs a single unauthenticated GET per request — no retry,
//! no backoff. Failures propagate as [`ProviderError`]; a valid request with
//! no trading data yields an empty series.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http::HttpClient;
use crate::window::DateWindow;
use crate::{DailyBar, PriceSeries, ProviderError, Symbol, TradingDate};

/// Request for daily history over a half-open `[start, end)` window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub window: DateWindow,
}

/// Contract for anything that can produce a daily price series.
pub trait HistoryProvider: Send + Sync {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>>;
}

/// Yahoo Finance v8 chart adapter.
#[derive(Clone)]
pub struct YahooHistory {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
}

impl YahooHistory {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from("https://query1.finance.yahoo.com/v8/finance/chart"),
        }
    }

    /// Point the adapter at a different chart endpoint (tests, proxies).
    pub fn with_base_url(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, req: &HistoryRequest) -> String {
        // period2 is exclusive, matching the request window's half-open end.
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.window.start.unix_midnight(),
            req.window.end.unix_midnight(),
        )
    }

    async fn fetch(&self, req: HistoryRequest) -> Result<PriceSeries, ProviderError> {
        tracing::info!(
            symbol = %req.symbol,
            start = %req.window.start,
            end = %req.window.end,
            "fetching price history"
        );

        let endpoint = self.endpoint(&req);
        let response = self
            .http_client
            .get(&endpoint)
            .await
            .map_err(|e| ProviderError::Transport(e.message().to_owned()))?;

        // Yahoo reports lookup failures as JSON bodies on non-2xx statuses;
        // prefer the structured error when one can be decoded.
        if !response.is_success() {
            if let Ok(decoded) = serde_json::from_str::<ChartResponse>(&response.body) {
                if let Some(error) = decoded.chart.error {
                    return Err(error.into());
                }
            }
            return Err(ProviderError::UpstreamStatus {
                status: response.status,
            });
        }

        let decoded: ChartResponse = serde_json::from_str(&response.body)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let Some(error) = decoded.chart.error {
            return Err(error.into());
        }

        let Some(result) = decoded.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.swap_remove(0))
            }
        }) else {
            return Ok(PriceSeries::empty(req.symbol, req.window));
        };

        let bars = collect_bars(&result)?;
        Ok(PriceSeries::new(req.symbol, req.window, bars))
    }
}

impl HistoryProvider for YahooHistory {
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>> {
        Box::pin(self.fetch(req))
    }
}

/// Rows with any missing OHLC component are skipped; a chart result with no
/// usable rows is an empty series, not an error.
fn collect_bars(result: &ChartResult) -> Result<Vec<DailyBar>, ProviderError> {
    let Some(timestamps) = result.timestamp.as_ref() else {
        return Ok(Vec::new());
    };
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| ProviderError::Decode(String::from("chart result has no quote block")))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = TradingDate::from_unix_timestamp(ts)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let volume = quote.volume.get(i).copied().flatten().map(|v| v as u64);
            if let Ok(bar) = DailyBar::new(date, *open, *high, *low, *close, volume) {
                bars.push(bar);
            }
        }
    }

    Ok(bars)
}

// Yahoo Finance chart response structures.

#[derive(Debug, Clone, Deserialize)]
struct ChartResponse {
    chart: ChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartData {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

impl From<ChartError> for ProviderError {
    fn from(error: ChartError) -> Self {
        Self::Upstream {
            code: error.code,
            description: error.description,
        }
    }
}
