use core::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use rand::Rng;

use candlekit_types::{
    CandleError, Candleset, DataRequest, HistoryConfig, ResponseType, StreamItem,
};

use crate::timeseries::window::select_random_window;

/// Boxed, sendable stream of historical candle items.
///
/// Candles arrive in non-decreasing timestamp order, optionally followed by a
/// single [`StreamItem::End`] marker. Ending without a marker means the request
/// was fully satisfied.
pub type CandleStream = Pin<Box<dyn Stream<Item = Result<StreamItem, CandleError>> + Send>>;

/// A source of historical candles for a trading pair.
#[async_trait]
pub trait HistDataSource: Send + Sync {
    /// Stable identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Open a stream of candles answering `req`.
    ///
    /// Errors returned here mean the stream could not be opened at all;
    /// failures after that are yielded as `Err` items.
    async fn stream_request(&self, req: &DataRequest) -> Result<CandleStream, CandleError>;
}

/// Adapter methods available on every [`HistDataSource`].
#[async_trait]
pub trait HistDataSourceExt: HistDataSource {
    /// See [`fill_request`].
    async fn fill_request(
        &self,
        req: &DataRequest,
    ) -> Result<(Candleset, ResponseType), CandleError> {
        fill_request(self, req).await
    }

    /// See [`fill_request_with`].
    async fn fill_request_with(
        &self,
        req: &DataRequest,
        cfg: &HistoryConfig,
    ) -> Result<(Candleset, ResponseType), CandleError> {
        fill_request_with(self, req, cfg).await
    }
}

impl<T: HistDataSource + ?Sized> HistDataSourceExt for T {}

/// Fill a fresh candleset with the candles `source` streams for `req`.
///
/// The candleset is built from the request's template (same pair and
/// interval, no candles). Items are pulled one at a time and inserted in
/// chronological position. The call resolves with the response type carried
/// by the end marker, or `FullResponse` if the stream ends without one. Items
/// after the marker are never read.
///
/// # Errors
/// Any error opening or reading the stream fails the whole call; candles
/// received so far are discarded.
pub async fn fill_request<S>(
    source: &S,
    req: &DataRequest,
) -> Result<(Candleset, ResponseType), CandleError>
where
    S: HistDataSource + ?Sized,
{
    fill_request_with(source, req, &HistoryConfig::default()).await
}

/// [`fill_request`] with pull/request timeouts and a candle cap.
///
/// Hitting `max_candles` stops pulling and resolves with `PartialResponse`,
/// unless the item right after the last accepted candle is the end marker.
///
/// # Errors
/// As [`fill_request`], plus `CandleError::PullTimeout` when a single pull
/// stalls and `CandleError::RequestTimeout` when the whole call overruns.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "candlekit::source::fill_request",
        skip(source, req, cfg),
        fields(source = source.name(), request = %req),
    )
)]
pub async fn fill_request_with<S>(
    source: &S,
    req: &DataRequest,
    cfg: &HistoryConfig,
) -> Result<(Candleset, ResponseType), CandleError>
where
    S: HistDataSource + ?Sized,
{
    with_deadline(cfg.request_timeout, "fill_request", async {
        let stream = source.stream_request(req).await?;
        drain(source.name(), stream, req.candleset().empty_like(), cfg, OnCap::Partial).await
    })
    .await
}

/// Fill `req`, then narrow the result to a random window when the request
/// carries a random count.
///
/// The window is `random_count` consecutive candles starting at an offset
/// drawn uniformly from every position where such a window fits. If fewer
/// candles arrived than requested, the whole set is returned.
///
/// # Errors
/// As [`fill_request_with`].
pub async fn fill_random_request<S, R>(
    source: &S,
    req: &DataRequest,
    cfg: &HistoryConfig,
    rng: &mut R,
) -> Result<(Candleset, ResponseType), CandleError>
where
    S: HistDataSource + ?Sized,
    R: Rng + Send + ?Sized,
{
    let (set, response) = fill_request_with(source, req, cfg).await?;
    let Some(n) = req.random_count() else {
        return Ok((set, response));
    };
    let n = usize::try_from(n).unwrap_or(usize::MAX);
    Ok((select_random_window(&set, n, rng), response))
}

/// Run `fut` under an optional overall deadline.
pub(crate) async fn with_deadline<T, Fut>(
    deadline: Option<Duration>,
    operation: &'static str,
    fut: Fut,
) -> Result<T, CandleError>
where
    Fut: core::future::Future<Output = Result<T, CandleError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut).await.unwrap_or_else(|_| {
            #[cfg(feature = "tracing")]
            tracing::warn!(operation, timeout_ms = millis(d), "request deadline elapsed");
            Err(CandleError::request_timeout(operation))
        }),
        None => fut.await,
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// What [`drain`] does when a candle arrives past `max_candles`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OnCap {
    /// Stop pulling and resolve as `PartialResponse`.
    Partial,
    /// Fail with `CandleError::CandleCapExceeded`.
    Fail,
}

/// Pull `stream` into `set` until it ends, closes with a marker, fails, or the
/// configured cap is exceeded.
pub(crate) async fn drain<St>(
    name: &str,
    mut stream: St,
    mut set: Candleset,
    cfg: &HistoryConfig,
    on_cap: OnCap,
) -> Result<(Candleset, ResponseType), CandleError>
where
    St: Stream<Item = Result<StreamItem, CandleError>> + Unpin,
{
    loop {
        let next = match cfg.pull_timeout {
            Some(t) => tokio::time::timeout(t, stream.next())
                .await
                .map_err(|_| CandleError::PullTimeout {
                    stream_name: name.to_string(),
                    timeout_ms: millis(t),
                })?,
            None => stream.next().await,
        };

        match next {
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(source = name, candles = set.len(), "stream ended without marker");
                return Ok((set, ResponseType::FullResponse));
            }
            Some(Err(e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(source = name, candles = set.len(), error = %e, "stream failed; discarding partial candleset");
                return Err(e);
            }
            Some(Ok(StreamItem::End(response))) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(source = name, candles = set.len(), ?response, "stream closed");
                return Ok((set, response));
            }
            Some(Ok(StreamItem::Candle(candle))) => {
                if let Some(max) = cfg.max_candles
                    && set.len() >= max
                {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = name, max_candles = max, ?on_cap, "candle cap reached");
                    return match on_cap {
                        OnCap::Partial => Ok((set, ResponseType::PartialResponse)),
                        OnCap::Fail => Err(CandleError::CandleCapExceeded {
                            stream_name: name.to_string(),
                            max_candles: max,
                        }),
                    };
                }
                #[cfg(feature = "tracing")]
                if set.candles().last().is_some_and(|last| last.ts() > candle.ts()) {
                    tracing::warn!(source = name, ts = %candle.ts(), "out-of-order candle; inserting in place");
                }
                set.add_candle(candle);
            }
        }
    }
}
