use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CandleError;

/// Price candle of a trading pair for one time bucket.
///
/// Candles are immutable once built: fields are read through accessors and the
/// type is `Copy`, so the same candle may sit in any number of candlesets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    ts: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Candle {
    /// Create a candle starting at `ts` with the given prices and traded volume.
    #[must_use]
    pub const fn new(
        ts: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Build a candle from a raw exchange row
    /// `[timestamp_millis, open, high, low, close, volume]`.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidCandle` if any value is not finite, the
    /// timestamp is not a representable whole millisecond instant, or the
    /// volume is negative.
    pub fn from_raw(raw: [f64; 6]) -> Result<Self, CandleError> {
        let [ts_ms, open, high, low, close, volume] = raw;
        if let Some(bad) = raw.iter().find(|v| !v.is_finite()) {
            return Err(CandleError::InvalidCandle(format!(
                "non-finite value {bad} in {raw:?}"
            )));
        }
        if ts_ms.fract() != 0.0 || ts_ms.abs() > i64::MAX as f64 {
            return Err(CandleError::InvalidCandle(format!(
                "timestamp {ts_ms} is not a whole millisecond"
            )));
        }
        #[allow(clippy::cast_possible_truncation)]
        let ts = DateTime::from_timestamp_millis(ts_ms as i64).ok_or_else(|| {
            CandleError::InvalidCandle(format!("timestamp {ts_ms} out of range"))
        })?;
        if volume < 0.0 {
            return Err(CandleError::InvalidCandle(format!(
                "negative volume {volume} at {ts}"
            )));
        }
        Ok(Self::new(ts, open, high, low, close, volume))
    }

    /// Start of the candle's bucket.
    #[must_use]
    pub const fn ts(&self) -> DateTime<Utc> {
        self.ts
    }

    /// Opening price.
    #[must_use]
    pub const fn open(&self) -> f64 {
        self.open
    }

    /// Highest price.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Lowest price.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Closing price.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.close
    }

    /// Volume traded during the candle.
    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    /// The candle as a raw `[timestamp_millis, open, high, low, close, volume]` row.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_raw(&self) -> [f64; 6] {
        [
            self.ts.timestamp_millis() as f64,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ]
    }
}

impl TryFrom<[f64; 6]> for Candle {
    type Error = CandleError;

    fn try_from(raw: [f64; 6]) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}
