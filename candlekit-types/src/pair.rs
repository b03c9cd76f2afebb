use core::fmt;

use serde::{Deserialize, Serialize};

use crate::CandleInterval;

/// A trading pair for buying and selling assets.
///
/// Holds asset symbols, not names: `base` is what prices are quoted in
/// (e.g. `USDT`) and `trade` is the traded asset (e.g. `BTC`). Symbols are
/// compared as exact, case-sensitive strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TradingPair {
    /// Base asset symbol.
    pub base: String,
    /// Trade asset symbol.
    pub trade: String,
}

impl TradingPair {
    /// Create a pair from its base and trade symbols.
    pub fn new(base: impl Into<String>, trade: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            trade: trade.into(),
        }
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trade, self.base)
    }
}

/// Identity of a candle series: one pair on one interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// The series' trading pair.
    pub pair: TradingPair,
    /// The series' candle interval.
    pub interval: CandleInterval,
}

impl SeriesKey {
    /// Build a key from a pair and interval.
    #[must_use]
    pub const fn new(pair: TradingPair, interval: CandleInterval) -> Self {
        Self { pair, interval }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.pair.base, self.pair.trade, self.interval)
    }
}
