use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TradingPair;

/// Live price snapshot for a trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Pair the snapshot belongs to.
    pub pair: TradingPair,
    /// Time of the snapshot.
    pub ts: DateTime<Utc>,
    /// Last traded price.
    pub last: f64,
    /// Best bid, if known.
    pub bid: Option<f64>,
    /// Best ask, if known.
    pub ask: Option<f64>,
    /// Rolling traded volume, if known.
    pub volume: Option<f64>,
}
