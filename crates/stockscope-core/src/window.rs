//! Date-window resolution: maps a symbolic lookback code to a concrete
//! `[start, end)` date range relative to a caller-supplied reference date.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::util::days_in_month;
use time::{Date, Month};

use crate::TradingDate;

/// Symbolic lookback period selected in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lookback {
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Lookback {
    pub const ALL: [Self; 4] = [
        Self::OneYear,
        Self::SixMonths,
        Self::ThreeMonths,
        Self::OneMonth,
    ];

    /// Parse a period code, trimmed and case-insensitive.
    ///
    /// Any unrecognized code resolves to [`Lookback::OneMonth`]. The fallback
    /// is deliberate inherited behavior, kept as an explicit arm here so it
    /// stays visible and testable.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "1Y" => Self::OneYear,
            "6M" => Self::SixMonths,
            "3M" => Self::ThreeMonths,
            "1M" => Self::OneMonth,
            _ => Self::OneMonth,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneYear => "1Y",
            Self::SixMonths => "6M",
            Self::ThreeMonths => "3M",
            Self::OneMonth => "1M",
        }
    }

    pub const fn months_back(self) -> u32 {
        match self {
            Self::OneYear => 12,
            Self::SixMonths => 6,
            Self::ThreeMonths => 3,
            Self::OneMonth => 1,
        }
    }

    /// Resolve this lookback against an explicit reference date.
    ///
    /// The reference date is a parameter rather than "now" so resolution is
    /// pure and deterministic under test; callers pass
    /// [`TradingDate::today_utc`] evaluated per request.
    pub fn window_ending(self, end: TradingDate) -> DateWindow {
        DateWindow {
            start: months_before(end, self.months_back()),
            end,
        }
    }
}

impl Display for Lookback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open `[start, end)` date range a series is requested over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: TradingDate,
    pub end: TradingDate,
}

/// Calendar-month subtraction with the day-of-month clamped to the target
/// month's length (2024-03-31 minus one month is 2024-02-29).
fn months_before(date: TradingDate, months: u32) -> TradingDate {
    let date = date.into_inner();
    let total = date.year() as i64 * 12 + (date.month() as u8 as i64 - 1) - months as i64;
    let year = total.div_euclid(12) as i32;
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8)
        .expect("month index is always in 1..=12");
    let day = date.day().min(days_in_month(month, year));

    Date::from_calendar_date(year, month, day)
        .expect("clamped day is always valid for the target month")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(input: &str) -> TradingDate {
        TradingDate::parse(input).expect("test date must parse")
    }

    #[test]
    fn resolves_every_period_code() {
        let today = date("2024-06-15");
        let cases = [
            ("1Y", "2023-06-15"),
            ("6M", "2023-12-15"),
            ("3M", "2024-03-15"),
            ("1M", "2024-05-15"),
        ];

        for (code, expected) in cases {
            let window = Lookback::from_code(code).window_ending(today);
            assert_eq!(window.start, date(expected), "code {code}");
            assert_eq!(window.end, today);
        }
    }

    #[test]
    fn unrecognized_code_falls_back_to_one_month() {
        assert_eq!(Lookback::from_code("2Y"), Lookback::OneMonth);
        assert_eq!(Lookback::from_code(""), Lookback::OneMonth);
        assert_eq!(Lookback::from_code("YTD"), Lookback::OneMonth);
    }

    #[test]
    fn codes_parse_case_insensitively() {
        assert_eq!(Lookback::from_code(" 1y "), Lookback::OneYear);
        assert_eq!(Lookback::from_code("6m"), Lookback::SixMonths);
    }

    #[test]
    fn clamps_day_to_target_month_length() {
        let window = Lookback::OneMonth.window_ending(date("2024-03-31"));
        assert_eq!(window.start, date("2024-02-29"));

        let window = Lookback::ThreeMonths.window_ending(date("2023-05-31"));
        assert_eq!(window.start, date("2023-02-28"));
    }

    #[test]
    fn year_boundary_is_handled() {
        let window = Lookback::SixMonths.window_ending(date("2024-02-10"));
        assert_eq!(window.start, date("2023-08-10"));

        let window = Lookback::OneYear.window_ending(date("2024-02-29"));
        assert_eq!(window.start, date("2023-02-28"));
    }

    #[test]
    fn round_trips_codes() {
        for lookback in Lookback::ALL {
            assert_eq!(Lookback::from_code(lookback.as_str()), lookback);
        }
    }
}
