use async_trait::async_trait;
use futures::Stream;

use candlekit_types::{CandleError, Candleset, HistoryConfig, StreamItem};

use crate::source::{CandleStream, OnCap, drain, with_deadline};

/// A sink that persists historical candles.
#[async_trait]
pub trait HistDataStore: Send + Sync {
    /// Stable identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Persist a completed candleset.
    async fn store_candles(&self, candleset: Candleset) -> Result<(), CandleError>;
}

/// Adapter methods available on every [`HistDataStore`].
#[async_trait]
pub trait HistDataStoreExt: HistDataStore {
    /// See [`store_candle_stream`].
    async fn store_candle_stream(
        &self,
        stream: CandleStream,
        template: &Candleset,
    ) -> Result<(), CandleError> {
        store_candle_stream(self, stream, template).await
    }

    /// See [`store_candle_stream_with`].
    async fn store_candle_stream_with(
        &self,
        stream: CandleStream,
        template: &Candleset,
        cfg: &HistoryConfig,
    ) -> Result<(), CandleError> {
        store_candle_stream_with(self, stream, template, cfg).await
    }
}

impl<T: HistDataStore + ?Sized> HistDataStoreExt for T {}

/// Collect `stream` into a candleset shaped like `template` and hand it to
/// `store` in a single `store_candles` call.
///
/// Only the template's pair and interval are used; its candles are ignored.
/// An end marker closes the stream like a natural end.
///
/// # Errors
/// A failed pull aborts before anything is stored. Errors from
/// `store_candles` are returned unchanged.
pub async fn store_candle_stream<S, St>(
    store: &S,
    stream: St,
    template: &Candleset,
) -> Result<(), CandleError>
where
    S: HistDataStore + ?Sized,
    St: Stream<Item = Result<StreamItem, CandleError>> + Send + Unpin,
{
    store_candle_stream_with(store, stream, template, &HistoryConfig::default()).await
}

/// [`store_candle_stream`] with pull/request timeouts and a candle cap.
///
/// With `max_candles` set, a stream delivering more candles than the cap
/// fails and nothing is stored. The request deadline covers the final
/// `store_candles` call.
///
/// # Errors
/// As [`store_candle_stream`], plus `CandleError::PullTimeout`,
/// `CandleError::RequestTimeout` and `CandleError::CandleCapExceeded`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "candlekit::store::store_candle_stream",
        skip(store, stream, template, cfg),
        fields(store = store.name(), series = %template.key()),
    )
)]
pub async fn store_candle_stream_with<S, St>(
    store: &S,
    stream: St,
    template: &Candleset,
    cfg: &HistoryConfig,
) -> Result<(), CandleError>
where
    S: HistDataStore + ?Sized,
    St: Stream<Item = Result<StreamItem, CandleError>> + Send + Unpin,
{
    with_deadline(cfg.request_timeout, "store_candle_stream", async {
        let (set, _) = drain(store.name(), stream, template.empty_like(), cfg, OnCap::Fail).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(store = store.name(), candles = set.len(), "flushing candleset");
        store.store_candles(set).await
    })
    .await
}
