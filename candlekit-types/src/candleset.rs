use serde::{Deserialize, Serialize};

use crate::{Candle, CandleInterval, SeriesKey, TradingPair};

/// Candles of one trading pair on one interval, kept in chronological order.
///
/// Invariant: `candles()` is non-decreasing by timestamp after every mutation,
/// whatever order candles are inserted in. Candles sharing a timestamp keep
/// their insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CandlesetRepr")]
pub struct Candleset {
    interval: CandleInterval,
    pair: TradingPair,
    candles: Vec<Candle>,
}

#[derive(Deserialize)]
struct CandlesetRepr {
    interval: CandleInterval,
    pair: TradingPair,
    #[serde(default)]
    candles: Vec<Candle>,
}

impl From<CandlesetRepr> for Candleset {
    fn from(r: CandlesetRepr) -> Self {
        Self::from_candles(r.interval, r.pair, r.candles)
    }
}

impl Candleset {
    /// Create an empty candleset for `pair` on `interval`.
    #[must_use]
    pub const fn new(interval: CandleInterval, pair: TradingPair) -> Self {
        Self {
            interval,
            pair,
            candles: Vec::new(),
        }
    }

    /// Create a candleset pre-seeded with `candles`, stably sorted by timestamp.
    #[must_use]
    pub fn from_candles(interval: CandleInterval, pair: TradingPair, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(Candle::ts);
        Self {
            interval,
            pair,
            candles,
        }
    }

    /// An empty candleset with the same pair and interval, sharing no candles.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self::new(self.interval, self.pair.clone())
    }

    /// Interval the candles were collected on.
    #[must_use]
    pub const fn interval(&self) -> CandleInterval {
        self.interval
    }

    /// Trading pair of the candles.
    #[must_use]
    pub const fn pair(&self) -> &TradingPair {
        &self.pair
    }

    /// Candles in chronological order.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Consume the set and return its candles.
    #[must_use]
    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }

    /// Number of candles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True when no candles are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Series identity (pair and interval).
    #[must_use]
    pub fn key(&self) -> SeriesKey {
        SeriesKey::new(self.pair.clone(), self.interval)
    }

    /// Name of the set, `"<base>_<trade>_<interval>"`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}_{}_{}", self.pair.base, self.pair.trade, self.interval)
    }

    /// Insert `candle` at its chronological position and return its index.
    ///
    /// Binary search finds the first candle strictly later than `candle`;
    /// the new candle goes right before it, i.e. after any equal timestamps.
    pub fn add_candle(&mut self, candle: Candle) -> usize {
        let idx = self.candles.partition_point(|c| c.ts() <= candle.ts());
        self.candles.insert(idx, candle);
        idx
    }

    /// A new set holding `len` consecutive candles starting at `offset`.
    ///
    /// The window is clamped to the candles available.
    #[must_use]
    pub fn window(&self, offset: usize, len: usize) -> Self {
        let start = offset.min(self.candles.len());
        let end = start.saturating_add(len).min(self.candles.len());
        Self {
            interval: self.interval,
            pair: self.pair.clone(),
            candles: self.candles[start..end].to_vec(),
        }
    }
}

impl Extend<Candle> for Candleset {
    fn extend<I: IntoIterator<Item = Candle>>(&mut self, iter: I) {
        for c in iter {
            self.add_candle(c);
        }
    }
}
