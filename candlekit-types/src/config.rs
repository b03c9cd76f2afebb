//! Configuration for the streaming fill/store adapters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Limits applied while draining a candle stream.
///
/// The default applies no limits: pulls may wait forever and every candle the
/// producer sends is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum time to wait for any single item from the stream.
    pub pull_timeout: Option<Duration>,
    /// Deadline for the whole fill or store operation, including the final
    /// `store_candles` call.
    pub request_timeout: Option<Duration>,
    /// Stop after this many candles. A fill that hits the cap resolves with
    /// [`ResponseType::PartialResponse`](crate::ResponseType::PartialResponse)
    /// unless the producer already closed with a marker.
    pub max_candles: Option<usize>,
}

impl HistoryConfig {
    /// Set the per-pull timeout.
    #[must_use]
    pub const fn with_pull_timeout(mut self, timeout: Duration) -> Self {
        self.pull_timeout = Some(timeout);
        self
    }

    /// Set the overall operation deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Cap the number of candles accumulated.
    #[must_use]
    pub const fn with_max_candles(mut self, max: usize) -> Self {
        self.max_candles = Some(max);
        self
    }
}
