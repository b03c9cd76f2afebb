use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candlekit workspace.
///
/// Construction and estimation problems are reported synchronously by the data
/// types; producer, consumer and timeout failures surface from the streaming
/// adapters in `candlekit-core`.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CandleError {
    /// An interval string was too short to hold an amount and a unit.
    #[error("invalid interval string: {input:?}")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },

    /// The numeric prefix of an interval string was not a positive integer.
    #[error("invalid interval amount: {input:?}")]
    InvalidAmount {
        /// The rejected input.
        input: String,
    },

    /// The trailing unit character of an interval string is not recognized.
    #[error("invalid interval unit: {input:?}")]
    InvalidUnit {
        /// The rejected input.
        input: String,
    },

    /// A date range request whose end precedes its start.
    #[error("end date must be the same as or after start date")]
    InvalidRange,

    /// A negative number of candles was requested.
    #[error("the number of candles to retrieve must be greater than or equal to 0, got {count}")]
    InvalidCount {
        /// The rejected count.
        count: i64,
    },

    /// A random window larger than the number of requested candles.
    #[error("random data count {random_count} must be less than or equal to data count {count}")]
    InvalidRandomCount {
        /// The requested window size.
        random_count: u64,
        /// The request's candle count.
        count: u64,
    },

    /// An estimation was requested on a data request lacking a required field.
    #[error("cannot estimate {operation} of a data request without {field}")]
    MissingField {
        /// What was being estimated (e.g. "end date").
        operation: String,
        /// The missing field (e.g. "a start date").
        field: String,
    },

    /// A raw candle tuple that cannot form a valid candle.
    #[error("invalid candle: {0}")]
    InvalidCandle(String),

    /// Date arithmetic left the representable range.
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    /// A historical data source failed while producing candles.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Source name that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A historical data store failed while persisting candles.
    #[error("store {store_name} failed: {msg}")]
    Store {
        /// Store name that failed.
        store_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A single pull from a candle stream exceeded the configured timeout.
    #[error("pull timed out after {timeout_ms}ms from {stream_name}")]
    PullTimeout {
        /// Name of the source or store whose stream stalled.
        stream_name: String,
        /// Configured per-pull timeout in milliseconds.
        timeout_ms: u64,
    },

    /// A stream delivered more candles than a store is allowed to buffer.
    #[error("{stream_name} exceeded the cap of {max_candles} candles")]
    CandleCapExceeded {
        /// Name of the store draining the stream.
        stream_name: String,
        /// Configured candle cap.
        max_candles: usize,
    },

    /// The overall fill or store operation exceeded its deadline.
    #[error("request timed out: {operation}")]
    RequestTimeout {
        /// Operation label (e.g. "fill_request").
        operation: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl CandleError {
    /// Helper: build a `Source` error with the source name and message.
    pub fn producer(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Store` error with the store name and message.
    pub fn store(store_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            store_name: store_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `MissingField` error.
    pub fn missing(operation: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            operation: operation.into(),
            field: field.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(operation: impl Into<String>) -> Self {
        Self::RequestTimeout {
            operation: operation.into(),
        }
    }

    /// Returns true for errors raised while constructing or mutating a value,
    /// as opposed to failures observed while streaming.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidUnit { .. }
                | Self::InvalidRange
                | Self::InvalidCount { .. }
                | Self::InvalidRandomCount { .. }
                | Self::InvalidCandle(_)
        )
    }
}
