//! Validated domain types: tickers, calendar dates, and price series.
//!
//! Construction validates invariants so downstream code never sees a
//! negative price or a malformed symbol.

mod date;
mod models;
mod symbol;

pub use date::TradingDate;
pub use models::{ClosePoint, DailyBar, PriceSeries};
pub use symbol::Symbol;
