//! # Stockscope Core
//!
//! Fetch-and-cache core behind the stockscope dashboard.
//!
//! ## Overview
//!
//! - **Validated domain models** for tickers, calendar dates, and daily
//!   price series
//! - **Date-window resolution** from symbolic lookback codes (`1Y`, `6M`,
//!   `3M`, `1M`) against an explicit reference date
//! - **History provider contract** with a Yahoo Finance chart adapter
//! - **Bounded LRU cache** memoizing series by exact `(symbol, start, end)`
//!
//! ## Control flow
//!
//! ```text
//! ┌──────────────────┐
//! │  Web handler     │  ticker, period code, today
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │  HistoryService  │────▶│  SeriesCache     │
//! └────────┬─────────┘     └──────────────────┘
//!          ▼ (miss)
//! ┌──────────────────┐     ┌──────────────────┐
//! │  YahooHistory    │────▶│  HttpClient      │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error handling
//!
//! Domain construction returns [`ValidationError`]; provider calls return
//! [`ProviderError`]; the service folds both into [`CoreError`]. A valid
//! request with no trading data is an *empty* [`PriceSeries`], not an error.

pub mod cache;
pub mod domain;
pub mod error;
pub mod http;
pub mod provider;
pub mod service;
pub mod window;

pub use cache::{SeriesCache, SeriesKey};
pub use domain::{ClosePoint, DailyBar, PriceSeries, Symbol, TradingDate};
pub use error::{CoreError, ProviderError, ValidationError};
pub use http::{HttpClient, HttpError, HttpResponse, ReqwestHttpClient};
pub use provider::{HistoryProvider, HistoryRequest, YahooHistory};
pub use service::{HistoryService, DEFAULT_SYMBOL};
pub use window::{DateWindow, Lookback};
