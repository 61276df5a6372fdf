use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use stockscope_core::{ClosePoint, Lookback, PriceSeries, TradingDate};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    error::ApiResult,
    state::AppState,
};

const INDEX_HTML: &str = include_str!("../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

/// Payload the chart renders from. `points` may be empty; the page shows an
/// empty chart in that case rather than an error.
#[derive(Serialize)]
pub struct HistoryResponse {
    pub symbol: String,
    pub period: String,
    pub start: TradingDate,
    pub end: TradingDate,
    pub title: String,
    pub points: Vec<ClosePoint>,
}

impl HistoryResponse {
    fn from_series(series: PriceSeries, period: Lookback) -> Self {
        let symbol = series.symbol.as_str().to_owned();
        Self {
            title: format!("{symbol} Price Movement"),
            symbol,
            period: period.as_str().to_owned(),
            start: series.window.start,
            end: series.window.end,
            points: series.close_points(),
        }
    }
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    // "Today" is evaluated per request so the window tracks the calendar.
    let today = TradingDate::today_utc();
    let period_code = query.period.as_deref().unwrap_or("1Y");

    let series = state
        .history
        .resolve_and_fetch(query.symbol.as_deref(), period_code, today)
        .await?;

    let period = Lookback::from_code(period_code);
    Ok(Json(HistoryResponse::from_series(series, period)))
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any).allow_methods(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allow
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/v1/healthz", get(healthz))
        .route("/api/v1/history", get(get_history))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(config))
        .with_state(state)
}
