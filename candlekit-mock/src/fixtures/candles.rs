use chrono::{DateTime, TimeZone, Utc};

use candlekit_core::{Candle, CandleError, CandleInterval, Candleset, IntervalUnit, TradingPair};

/// `2000-01-01T00:00:00Z`, the anchor most fixtures start from.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(946_684_800, 0).single().unwrap_or_default()
}

/// Empty `USDT/BTC` candleset on one-minute candles.
#[must_use]
pub fn usdt_btc_1m() -> Candleset {
    Candleset::new(
        CandleInterval::one(IntervalUnit::Minute),
        TradingPair::new("USDT", "BTC"),
    )
}

/// The `index`-th fixture candle of a series starting at `first`.
///
/// Prices oscillate around 100 with a period of 50 candles; volume cycles
/// through 10..17.
///
/// # Errors
/// Returns `CandleError::DateOutOfRange` if the timestamp is not representable.
pub fn candle_at(
    interval: CandleInterval,
    first: DateTime<Utc>,
    index: u64,
) -> Result<Candle, CandleError> {
    let steps = i64::try_from(index)
        .map_err(|_| CandleError::DateOutOfRange(format!("candle index {index}")))?;
    let ts = interval.shift(first, steps)?;
    #[allow(clippy::cast_precision_loss)]
    let base = 100.0 + (index % 50) as f64;
    #[allow(clippy::cast_precision_loss)]
    let volume = 10.0 + (index % 7) as f64;
    Ok(Candle::new(ts, base, base + 1.0, base - 1.0, base + 0.5, volume))
}

/// `n` consecutive fixture candles starting at `first`.
///
/// # Panics
/// Panics if a timestamp leaves the representable range; fixtures are meant
/// for tests only.
#[must_use]
pub fn series(interval: CandleInterval, first: DateTime<Utc>, n: u64) -> Vec<Candle> {
    (0..n)
        .map(|i| candle_at(interval, first, i).expect("fixture timestamp in range"))
        .collect()
}
