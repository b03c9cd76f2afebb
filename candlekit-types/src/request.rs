//! Data requests: which slice of candle history to fetch.

use core::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{CandleError, CandleInterval, Candleset, TradingPair};

/// Addressing mode of a [`DataRequest`]. Each mode carries exactly the fields
/// it needs; dates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestSpan {
    /// Every candle between two dates.
    DateRange {
        /// Date of the first candle.
        start: DateTime<Utc>,
        /// Date of the last candle; never before `start`.
        end: DateTime<Utc>,
    },
    /// A number of candles from a start date onwards.
    StartCount {
        /// Date of the first candle.
        start: DateTime<Utc>,
        /// Number of candles to fetch.
        count: u64,
    },
    /// A number of candles leading up to an end date.
    EndCount {
        /// Number of candles to fetch.
        count: u64,
        /// Date of the last candle.
        end: DateTime<Utc>,
    },
}

/// A request for historical candles of one pair on one interval.
///
/// Built through [`DataRequest::date_range`], [`DataRequest::start_count`] or
/// [`DataRequest::end_count`]; the only later change allowed is turning it
/// into a random request with [`DataRequest::random`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataRequest {
    candleset: Candleset,
    span: RequestSpan,
    random_count: Option<u64>,
}

impl DataRequest {
    fn from_span(candleset: &Candleset, span: RequestSpan) -> Self {
        Self {
            candleset: candleset.empty_like(),
            span,
            random_count: None,
        }
    }

    /// Request every candle between `start` and `end`, inclusive.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidRange` if `end` is before `start`.
    pub fn date_range(
        candleset: &Candleset,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, CandleError> {
        if end < start {
            return Err(CandleError::InvalidRange);
        }
        Ok(Self::from_span(candleset, RequestSpan::DateRange { start, end }))
    }

    /// Request `count` candles starting at `start`.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidCount` if `count` is negative.
    pub fn start_count(
        candleset: &Candleset,
        start: DateTime<Utc>,
        count: i64,
    ) -> Result<Self, CandleError> {
        let count = checked_count(count)?;
        Ok(Self::from_span(candleset, RequestSpan::StartCount { start, count }))
    }

    /// Request the last `count` candles up to `end`.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidCount` if `count` is negative.
    pub fn end_count(
        candleset: &Candleset,
        count: i64,
        end: DateTime<Utc>,
    ) -> Result<Self, CandleError> {
        let count = checked_count(count)?;
        Ok(Self::from_span(candleset, RequestSpan::EndCount { count, end }))
    }

    /// Empty candleset carrying the requested pair and interval.
    #[must_use]
    pub const fn candleset(&self) -> &Candleset {
        &self.candleset
    }

    /// Requested interval.
    #[must_use]
    pub const fn interval(&self) -> CandleInterval {
        self.candleset.interval()
    }

    /// Requested trading pair.
    #[must_use]
    pub const fn pair(&self) -> &TradingPair {
        self.candleset.pair()
    }

    /// Addressing mode.
    #[must_use]
    pub const fn span(&self) -> RequestSpan {
        self.span
    }

    /// Date of the first candle, when the request is anchored at its start.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        match self.span {
            RequestSpan::DateRange { start, .. } | RequestSpan::StartCount { start, .. } => {
                Some(start)
            }
            RequestSpan::EndCount { .. } => None,
        }
    }

    /// Date of the last candle, when the request is anchored at its end.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        match self.span {
            RequestSpan::DateRange { end, .. } | RequestSpan::EndCount { end, .. } => Some(end),
            RequestSpan::StartCount { .. } => None,
        }
    }

    /// Number of candles requested, for count-based requests.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        match self.span {
            RequestSpan::StartCount { count, .. } | RequestSpan::EndCount { count, .. } => {
                Some(count)
            }
            RequestSpan::DateRange { .. } => None,
        }
    }

    /// Size of the random consecutive window, if this is a random request.
    #[must_use]
    pub const fn random_count(&self) -> Option<u64> {
        self.random_count
    }

    /// Make this a random request: the result becomes a uniformly chosen run
    /// of `random_count` consecutive candles out of everything retrieved.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidRandomCount` if the request has a count and
    /// `random_count` exceeds it.
    pub fn random(&mut self, random_count: u64) -> Result<(), CandleError> {
        if let Some(count) = self.count()
            && random_count > count
        {
            return Err(CandleError::InvalidRandomCount {
                random_count,
                count,
            });
        }
        self.random_count = Some(random_count);
        Ok(())
    }

    /// Expected date of the last candle: `start + count` intervals.
    ///
    /// # Errors
    /// `CandleError::MissingField` without a start date (checked first) or a
    /// count; `CandleError::DateOutOfRange` if the date is not representable.
    pub fn estimate_end_date(&self) -> Result<DateTime<Utc>, CandleError> {
        let start = self
            .start_date()
            .ok_or_else(|| CandleError::missing("end date", "a start date"))?;
        let count = self
            .count()
            .ok_or_else(|| CandleError::missing("end date", "a count"))?;
        self.interval().shift(start, steps(count)?)
    }

    /// Expected date of the first candle: `end - count` intervals.
    ///
    /// # Errors
    /// `CandleError::MissingField` without an end date (checked first) or a
    /// count; `CandleError::DateOutOfRange` if the date is not representable.
    pub fn estimate_start_date(&self) -> Result<DateTime<Utc>, CandleError> {
        let end = self
            .end_date()
            .ok_or_else(|| CandleError::missing("start date", "an end date"))?;
        let count = self
            .count()
            .ok_or_else(|| CandleError::missing("start date", "a count"))?;
        self.interval().shift(end, -steps(count)?)
    }

    /// Expected number of candles: whole intervals between start and end.
    ///
    /// # Errors
    /// `CandleError::MissingField` without a start date (checked first) or an
    /// end date.
    pub fn estimate_count(&self) -> Result<u64, CandleError> {
        let start = self
            .start_date()
            .ok_or_else(|| CandleError::missing("count", "a start date"))?;
        let end = self
            .end_date()
            .ok_or_else(|| CandleError::missing("count", "an end date"))?;
        let n = self.interval().intervals_between(start, end);
        Ok(u64::try_from(n).unwrap_or(0))
    }
}

fn checked_count(count: i64) -> Result<u64, CandleError> {
    u64::try_from(count).map_err(|_| CandleError::InvalidCount { count })
}

fn steps(count: u64) -> Result<i64, CandleError> {
    i64::try_from(count)
        .map_err(|_| CandleError::DateOutOfRange(format!("{count} intervals")))
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render the request body from whichever of start, end and count are known.
fn describe(
    prefix: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    count: Option<u64>,
) -> String {
    match (start, end, count) {
        (Some(s), Some(e), _) => {
            format!("{prefix} candles between dates {} and {}", iso(s), iso(e))
        }
        (Some(s), None, Some(n)) => format!("{prefix} first {n} candles after the date {}", iso(s)),
        (Some(s), None, None) => {
            format!("{prefix} unknown number of candles after the date {}", iso(s))
        }
        (None, Some(e), Some(n)) => format!("{prefix} last {n} candles before the date {}", iso(e)),
        (None, Some(e), None) => {
            format!("{prefix} unknown number of candles before the date {}", iso(e))
        }
        (None, None, _) => format!("{prefix} unknown number of candles between unknown dates"),
    }
}

impl fmt::Display for DataRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.random_count {
            None => "Request of".to_string(),
            Some(n) => format!("Random request of {n} candles from"),
        };
        f.write_str(&describe(
            &prefix,
            self.start_date(),
            self.end_date(),
            self.count(),
        ))
    }
}
