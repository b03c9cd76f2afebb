use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Mutex;

use candlekit_core::{
    Candle, CandleError, CandleStream, CandleSubscriber, DataRequest, HistDataSource,
    LiveDataSource, SeriesKey, SubscriberRegistry, StreamItem, Ticker, TickerSubscriber,
    TradingPair,
};

/// Instruction for how a call should behave.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(CandleError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// Instruction for how a historical stream should behave for a given series.
#[derive(Clone)]
pub enum StreamBehavior {
    /// Open a stream that yields these items verbatim, then ends.
    Items(Vec<Result<StreamItem, CandleError>>),
    /// Open a stream that yields these items, then never yields again.
    ItemsThenStall(Vec<Result<StreamItem, CandleError>>),
    /// Behave as configured when opening the stream.
    Open(MockBehavior<()>),
}

#[derive(Default)]
struct InternalState {
    stream_rules: HashMap<SeriesKey, StreamBehavior>,
    requests: HashMap<SeriesKey, Vec<DataRequest>>,
}

struct Shared {
    state: Mutex<InternalState>,
    candles: SubscriberRegistry<SeriesKey, dyn CandleSubscriber>,
    tickers: SubscriberRegistry<TradingPair, dyn TickerSubscriber>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    shared: Arc<Shared>,
}

impl DynamicMockController {
    /// Set the stream behavior for requests on `key`.
    pub async fn set_stream_behavior(&self, key: SeriesKey, behavior: StreamBehavior) {
        let mut guard = self.shared.state.lock().await;
        guard.stream_rules.insert(key, behavior);
    }

    /// Return a copy of the request log for `key`.
    pub async fn get_requests(&self, key: &SeriesKey) -> Vec<DataRequest> {
        let guard = self.shared.state.lock().await;
        guard.requests.get(key).cloned().unwrap_or_default()
    }

    /// Publish a live candle to every subscriber of `key`. Returns how many were notified.
    pub async fn push_candle(&self, key: &SeriesKey, candle: Candle) -> usize {
        self.shared.candles.publish_candle(key, candle).await
    }

    /// Publish a ticker to every subscriber of its pair. Returns how many were notified.
    pub async fn push_ticker(&self, ticker: &Ticker) -> usize {
        self.shared.tickers.publish_ticker(ticker).await
    }

    /// Series that currently have at least one candle subscriber.
    pub async fn candle_subscriptions(&self) -> Vec<SeriesKey> {
        self.shared.candles.keys().await
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.shared.state.lock().await;
        guard.stream_rules.clear();
        guard.requests.clear();
    }
}

/// A historical and live source that defers all behavior to an external controller.
pub struct DynamicMockSource {
    name: &'static str,
    shared: Arc<Shared>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        let shared = Arc::new(Shared {
            state: Mutex::new(InternalState::default()),
            candles: SubscriberRegistry::new(),
            tickers: SubscriberRegistry::new(),
        });
        let controller = DynamicMockController {
            shared: Arc::clone(&shared),
        };
        (Arc::new(Self { name, shared }), controller)
    }
}

#[async_trait]
impl HistDataSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn stream_request(&self, req: &DataRequest) -> Result<CandleStream, CandleError> {
        let key = req.candleset().key();
        // Log the request and snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard
                .requests
                .entry(key.clone())
                .or_default()
                .push(req.clone());
            guard.stream_rules.get(&key).cloned()
        };

        match behavior {
            Some(StreamBehavior::Items(items)) => Ok(Box::pin(futures::stream::iter(items))),
            Some(StreamBehavior::ItemsThenStall(items)) => {
                Ok(Box::pin(
                    futures::stream::iter(items).chain(futures::stream::pending()),
                ))
            }
            Some(StreamBehavior::Open(MockBehavior::Return(()))) => {
                Ok(Box::pin(futures::stream::empty::<
                    Result<StreamItem, CandleError>,
                >()))
            }
            Some(StreamBehavior::Open(MockBehavior::Fail(e))) => Err(e),
            Some(StreamBehavior::Open(MockBehavior::Hang)) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(CandleError::producer(
                self.name,
                format!("no stream behavior for {key}"),
            )),
        }
    }
}

#[async_trait]
impl LiveDataSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn subscribe_candle(
        &self,
        key: SeriesKey,
        subscriber: Arc<dyn CandleSubscriber>,
    ) -> Result<(), CandleError> {
        self.shared.candles.add(key, subscriber).await;
        Ok(())
    }

    async fn unsubscribe_candle(
        &self,
        key: &SeriesKey,
        subscriber: &Arc<dyn CandleSubscriber>,
    ) -> Result<bool, CandleError> {
        Ok(self.shared.candles.remove(key, subscriber).await)
    }

    async fn subscribe_ticker(
        &self,
        pair: TradingPair,
        subscriber: Arc<dyn TickerSubscriber>,
    ) -> Result<(), CandleError> {
        self.shared.tickers.add(pair, subscriber).await;
        Ok(())
    }

    async fn unsubscribe_ticker(
        &self,
        pair: &TradingPair,
        subscriber: &Arc<dyn TickerSubscriber>,
    ) -> Result<bool, CandleError> {
        Ok(self.shared.tickers.remove(pair, subscriber).await)
    }
}
