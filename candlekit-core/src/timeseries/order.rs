use candlekit_types::Candle;

/// True if timestamps never decrease along `candles`. Empty and single-candle
/// slices are chronological.
#[must_use]
pub fn is_chronological(candles: &[Candle]) -> bool {
    candles.windows(2).all(|w| w[0].ts() <= w[1].ts())
}
