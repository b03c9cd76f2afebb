use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::Mutex;

use candlekit_core::{
    CandleError, CandleStream, Candleset, DataRequest, HistDataSource, HistDataStore,
    RequestSpan, ResponseType, StreamItem,
};

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior, StreamBehavior};

/// Mock historical source for CI-safe tests. Answers every request with
/// deterministic fixture candles laid out on the request's interval.
///
/// Scripted knobs shape the stream: how much history is available, whether it
/// fails midway, whether it closes with a marker and how long each pull takes.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    available: Option<u64>,
    fail_after: Option<usize>,
    omit_marker: bool,
    delay: Option<Duration>,
}

impl MockSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `n` candles exist; longer requests end with `PartialResponse`.
    #[must_use]
    pub const fn with_available(mut self, n: u64) -> Self {
        self.available = Some(n);
        self
    }

    /// Yield `k` candles, then fail the stream.
    #[must_use]
    pub const fn failing_after(mut self, k: usize) -> Self {
        self.fail_after = Some(k);
        self
    }

    /// End the stream without a completeness marker.
    #[must_use]
    pub const fn without_marker(mut self) -> Self {
        self.omit_marker = true;
        self
    }

    /// Sleep before every item.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// First candle date and number of candles a request spans.
    fn layout(req: &DataRequest) -> Result<(DateTime<Utc>, u64), CandleError> {
        match req.span() {
            RequestSpan::DateRange { start, end } => {
                let n = req.interval().intervals_between(start, end);
                Ok((start, u64::try_from(n).unwrap_or(0).saturating_add(1)))
            }
            RequestSpan::StartCount { start, count } => Ok((start, count)),
            RequestSpan::EndCount { count, end } => {
                let back = i64::try_from(count.saturating_sub(1))
                    .map_err(|_| CandleError::DateOutOfRange(format!("{count} candles")))?;
                Ok((req.interval().shift(end, -back)?, count))
            }
        }
    }
}

#[async_trait]
impl HistDataSource for MockSource {
    fn name(&self) -> &'static str {
        "candlekit-mock"
    }

    async fn stream_request(&self, req: &DataRequest) -> Result<CandleStream, CandleError> {
        let (first, wanted) = Self::layout(req)?;
        let emitted = wanted.min(self.available.unwrap_or(u64::MAX));
        let marker = if emitted < wanted {
            ResponseType::PartialResponse
        } else {
            ResponseType::FullResponse
        };
        let interval = req.interval();

        let candles = (0..emitted).map(move |i| {
            fixtures::candles::candle_at(interval, first, i).map(StreamItem::Candle)
        });
        let items: Box<dyn Iterator<Item = Result<StreamItem, CandleError>> + Send> =
            match (self.fail_after, self.omit_marker) {
                (Some(k), _) => Box::new(candles.take(k).chain(std::iter::once(Err(
                    CandleError::producer(self.name(), format!("scripted failure after {k} candles")),
                )))),
                (None, true) => Box::new(candles),
                (None, false) => {
                    Box::new(candles.chain(std::iter::once(Ok(StreamItem::End(marker)))))
                }
            };

        let delay = self.delay;
        let stream = futures::stream::iter(items).then(move |item| async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            item
        });
        Ok(Box::pin(stream))
    }
}

/// In-memory store recording every candleset it is handed.
#[derive(Default)]
pub struct MemoryStore {
    stored: Mutex<Vec<Candleset>>,
    fail_with: Option<CandleError>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every `store_candles` call fails with `err`.
    #[must_use]
    pub fn failing(err: CandleError) -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            fail_with: Some(err),
        }
    }

    /// Copies of the candlesets stored so far, in call order.
    pub async fn stored(&self) -> Vec<Candleset> {
        self.stored.lock().await.clone()
    }

    /// Number of successful `store_candles` calls.
    pub async fn store_calls(&self) -> usize {
        self.stored.lock().await.len()
    }
}

#[async_trait]
impl HistDataStore for MemoryStore {
    fn name(&self) -> &'static str {
        "candlekit-mock-store"
    }

    async fn store_candles(&self, candleset: Candleset) -> Result<(), CandleError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.stored.lock().await.push(candleset);
        Ok(())
    }
}
