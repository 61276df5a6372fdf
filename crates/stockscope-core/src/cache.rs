//! Bounded memoizing cache for fetched price series.
//!
//! Keyed by the exact `(symbol, start, end)` tuple. There is no explicit
//! TTL: the window's end date is usually "today", so keys stop matching on
//! their own once the calendar day rolls over.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::window::DateWindow;
use crate::{PriceSeries, Symbol, TradingDate};

const DEFAULT_CAPACITY: usize = 128;

/// Exact call signature a cached series is stored under. Changing any one
/// component is a miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: Symbol,
    pub start: TradingDate,
    pub end: TradingDate,
}

impl SeriesKey {
    pub fn new(symbol: Symbol, window: DateWindow) -> Self {
        Self {
            symbol,
            start: window.start,
            end: window.end,
        }
    }
}

#[derive(Debug)]
struct CacheInner {
    capacity: usize,
    map: HashMap<SeriesKey, PriceSeries>,
    // Recency order, least recently used at the front.
    order: VecDeque<SeriesKey>,
}

impl CacheInner {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    fn touch(&mut self, key: &SeriesKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }

    fn get(&mut self, key: &SeriesKey) -> Option<PriceSeries> {
        let series = self.map.get(key).cloned()?;
        self.touch(key);
        Some(series)
    }

    fn put(&mut self, key: SeriesKey, series: PriceSeries) {
        self.map.insert(key.clone(), series);
        self.touch(&key);

        while self.map.len() > self.capacity {
            let Some(evicted) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&evicted);
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Thread-safe bounded LRU cache for price series.
///
/// Explicitly owned and injected rather than ambient process state; clone
/// handles share the same underlying store.
#[derive(Debug, Clone)]
pub struct SeriesCache {
    inner: Arc<tokio::sync::Mutex<CacheInner>>,
}

impl SeriesCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(tokio::sync::Mutex::new(CacheInner::new(capacity.max(1)))),
        }
    }

    /// Get a cached series for the key, refreshing its recency.
    pub async fn get(&self, key: &SeriesKey) -> Option<PriceSeries> {
        let mut store = self.inner.lock().await;
        store.get(key)
    }

    /// Store a series, evicting the least recently used entries when full.
    pub async fn put(&self, key: SeriesKey, series: PriceSeries) {
        let mut store = self.inner.lock().await;
        store.put(key, series);
    }

    pub async fn clear(&self) {
        let mut store = self.inner.lock().await;
        store.clear();
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.lock().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
