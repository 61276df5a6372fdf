use serde::{Deserialize, Serialize};

use crate::window::DateWindow;
use crate::{Symbol, TradingDate, ValidationError};

/// One trading day's OHLCV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl DailyBar {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// A single close-price observation, the column the chart consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: TradingDate,
    pub close: f64,
}

/// Daily price history for one symbol over a half-open `[start, end)` window.
///
/// An empty series is a valid state: a delisted ticker or a window with no
/// trading days produces zero bars, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: Symbol,
    pub window: DateWindow,
    pub bars: Vec<DailyBar>,
}

impl PriceSeries {
    pub fn new(symbol: Symbol, window: DateWindow, bars: Vec<DailyBar>) -> Self {
        Self {
            symbol,
            window,
            bars,
        }
    }

    pub fn empty(symbol: Symbol, window: DateWindow) -> Self {
        Self::new(symbol, window, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Close-price column in date order.
    pub fn close_points(&self) -> Vec<ClosePoint> {
        self.bars
            .iter()
            .map(|bar| ClosePoint {
                date: bar.date,
                close: bar.close,
            })
            .collect()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Lookback;

    fn window() -> DateWindow {
        let end = TradingDate::parse("2024-06-15").expect("date");
        Lookback::OneMonth.window_ending(end)
    }

    #[test]
    fn rejects_bar_with_high_below_low() {
        let date = TradingDate::parse("2024-06-14").expect("date");
        let err = DailyBar::new(date, 100.0, 95.0, 105.0, 102.0, None).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_close_outside_range() {
        let date = TradingDate::parse("2024-06-14").expect("date");
        let err = DailyBar::new(date, 100.0, 105.0, 95.0, 110.0, Some(10)).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn close_points_follow_bar_order() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let d1 = TradingDate::parse("2024-06-13").expect("date");
        let d2 = TradingDate::parse("2024-06-14").expect("date");
        let bars = vec![
            DailyBar::new(d1, 100.0, 102.0, 99.0, 101.0, Some(1_000)).expect("bar"),
            DailyBar::new(d2, 101.0, 103.0, 100.0, 102.5, Some(1_200)).expect("bar"),
        ];
        let series = PriceSeries::new(symbol, window(), bars);

        let points = series.close_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 101.0);
        assert_eq!(points[1].date, d2);
    }

    #[test]
    fn empty_series_is_a_valid_state() {
        let symbol = Symbol::parse("^NSEI").expect("symbol");
        let series = PriceSeries::empty(symbol, window());
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.close_points().is_empty());
    }
}
