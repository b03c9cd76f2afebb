//! candlekit data transfer objects, configuration and error type.
//!
//! - `Candle`, `CandleInterval`, `TradingPair`: leaf value types.
//! - `Candleset`: chronologically ordered candles for one pair and interval.
//! - `DataRequest`: which slice of history to fetch, in one of three modes.
//! - `ResponseType` / `StreamItem`: what a historical candle stream yields.
#![warn(missing_docs)]

mod candle;
mod candleset;
mod config;
mod error;
mod interval;
mod pair;
mod request;
mod response;
mod ticker;

pub use candle::Candle;
pub use candleset::Candleset;
pub use config::HistoryConfig;
pub use error::CandleError;
pub use interval::{CandleInterval, IntervalUnit};
pub use pair::{SeriesKey, TradingPair};
pub use request::{DataRequest, RequestSpan};
pub use response::{ResponseType, StreamItem};
pub use ticker::Ticker;
