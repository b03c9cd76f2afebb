//! Time-series utilities over candle slices.
//!
//! Modules include:
//! - `infer`: estimate the cadence of a series
//! - `order`: chronological ordering checks
//! - `window`: random contiguous window selection
/// Step estimation and interval inference helpers.
pub mod infer;
/// Ordering checks.
pub mod order;
/// Random window selection for random data requests.
pub mod window;
