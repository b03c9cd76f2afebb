use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use candlekit_types::{Candle, CandleError, SeriesKey, Ticker, TradingPair};

/// Observer notified of newly closed candles.
#[async_trait]
pub trait CandleSubscriber: Send + Sync {
    /// Called once per candle published on `key`.
    async fn on_candle(&self, key: &SeriesKey, candle: Candle);
}

/// Observer notified of ticker snapshots.
#[async_trait]
pub trait TickerSubscriber: Send + Sync {
    /// Called once per ticker published for the subscriber's pair.
    async fn on_ticker(&self, ticker: &Ticker);
}

/// A source of live candles and tickers.
///
/// Subscribers are identified by their `Arc`: unsubscribing removes exactly
/// the instance that was subscribed.
#[async_trait]
pub trait LiveDataSource: Send + Sync {
    /// Stable identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Start delivering candles of `key` to `subscriber`.
    async fn subscribe_candle(
        &self,
        key: SeriesKey,
        subscriber: Arc<dyn CandleSubscriber>,
    ) -> Result<(), CandleError>;

    /// Stop delivering candles of `key` to `subscriber`. Returns whether it was subscribed.
    async fn unsubscribe_candle(
        &self,
        key: &SeriesKey,
        subscriber: &Arc<dyn CandleSubscriber>,
    ) -> Result<bool, CandleError>;

    /// Start delivering tickers of `pair` to `subscriber`.
    async fn subscribe_ticker(
        &self,
        pair: TradingPair,
        subscriber: Arc<dyn TickerSubscriber>,
    ) -> Result<(), CandleError>;

    /// Stop delivering tickers of `pair` to `subscriber`. Returns whether it was subscribed.
    async fn unsubscribe_ticker(
        &self,
        pair: &TradingPair,
        subscriber: &Arc<dyn TickerSubscriber>,
    ) -> Result<bool, CandleError>;
}

/// Fan-out table of listeners grouped by subscription key.
///
/// Listeners are compared by allocation, so the same `Arc` is registered at
/// most once per key. Publishing works on a snapshot taken under the lock;
/// callbacks run with the lock released and may (un)subscribe freely.
pub struct SubscriberRegistry<K, L: ?Sized> {
    inner: Mutex<HashMap<K, Vec<Arc<L>>>>,
}

impl<K, L: ?Sized> Default for SubscriberRegistry<K, L> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, L> SubscriberRegistry<K, L>
where
    K: Eq + Hash + Clone,
    L: ?Sized,
{
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `key`. Returns `false` if it was already registered.
    pub async fn add(&self, key: K, listener: Arc<L>) -> bool {
        let mut guard = self.inner.lock().await;
        let slot = guard.entry(key).or_default();
        if slot.iter().any(|l| same(l, &listener)) {
            return false;
        }
        slot.push(listener);
        true
    }

    /// Remove `listener` from `key`. Returns `false` if it was not registered.
    ///
    /// Keys left without listeners are dropped.
    pub async fn remove(&self, key: &K, listener: &Arc<L>) -> bool {
        let mut guard = self.inner.lock().await;
        let Some(slot) = guard.get_mut(key) else {
            return false;
        };
        let before = slot.len();
        slot.retain(|l| !same(l, listener));
        let removed = slot.len() != before;
        if slot.is_empty() {
            guard.remove(key);
        }
        removed
    }

    /// Snapshot of the listeners registered under `key`, in registration order.
    pub async fn listeners(&self, key: &K) -> Vec<Arc<L>> {
        let guard = self.inner.lock().await;
        guard.get(key).cloned().unwrap_or_default()
    }

    /// Keys with at least one listener.
    pub async fn keys(&self) -> Vec<K> {
        let guard = self.inner.lock().await;
        guard.keys().cloned().collect()
    }

    /// True when no listener is registered under any key.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl SubscriberRegistry<SeriesKey, dyn CandleSubscriber> {
    /// Deliver `candle` to every subscriber of `key`. Returns how many were notified.
    pub async fn publish_candle(&self, key: &SeriesKey, candle: Candle) -> usize {
        let targets = self.listeners(key).await;
        for sub in &targets {
            sub.on_candle(key, candle).await;
        }
        targets.len()
    }
}

impl SubscriberRegistry<TradingPair, dyn TickerSubscriber> {
    /// Deliver `ticker` to every subscriber of its pair. Returns how many were notified.
    pub async fn publish_ticker(&self, ticker: &Ticker) -> usize {
        let targets = self.listeners(&ticker.pair).await;
        for sub in &targets {
            sub.on_ticker(ticker).await;
        }
        targets.len()
    }
}

fn same<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
