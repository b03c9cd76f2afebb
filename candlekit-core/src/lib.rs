//! candlekit-core
//!
//! Capability traits and the streaming adapters built on top of them.
//!
//! - `source`: the `HistDataSource` trait and the `fill_request` adapter.
//! - `store`: the `HistDataStore` trait and the `store_candle_stream` adapter.
//! - `live`: live candle/ticker subscriptions and a fan-out registry.
//! - `timeseries`: ordering checks, interval inference and random windows.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Timeouts configured through `HistoryConfig` are enforced with
//! `tokio::time::timeout`, and `SubscriberRegistry` guards its state with a
//! `tokio::sync::Mutex`. Code using either must run under a Tokio 1.x runtime.
//! Streams themselves are plain `futures::Stream`s and carry no runtime
//! requirement.
#![warn(missing_docs)]

/// Live subscription traits and the subscriber registry.
pub mod live;
/// Historical candle sources and the fill adapter.
pub mod source;
/// Historical candle stores and the store-stream adapter.
pub mod store;
/// Time-series utilities over candle slices.
pub mod timeseries;

pub use candlekit_types::*;
pub use live::{CandleSubscriber, LiveDataSource, SubscriberRegistry, TickerSubscriber};
pub use source::{
    CandleStream, HistDataSource, HistDataSourceExt, fill_random_request, fill_request,
    fill_request_with,
};
pub use store::{HistDataStore, HistDataStoreExt, store_candle_stream, store_candle_stream_with};
pub use timeseries::infer::{estimate_step_seconds, infer_interval};
pub use timeseries::order::is_chronological;
pub use timeseries::window::select_random_window;
