//! Deterministic candle fixtures.
pub mod candles;
