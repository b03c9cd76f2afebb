use std::time::Duration;

use candlekit_core::{
    CandleError, DataRequest, HistDataSourceExt, HistoryConfig, ResponseType, StreamItem,
    fill_request, fill_request_with, is_chronological,
};
use candlekit_mock::fixtures::candles::{candle_at, epoch, series, usdt_btc_1m};
use candlekit_mock::{DynamicMockSource, MockBehavior, MockSource, StreamBehavior};
use proptest::prelude::*;

fn start_count(n: i64) -> DataRequest {
    DataRequest::start_count(&usdt_btc_1m(), epoch(), n).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn fill_reports_full_iff_history_suffices(wanted in 0u64..40, available in 0u64..40) {
        tokio_test::block_on(async move {
            let req = start_count(i64::try_from(wanted).unwrap());
            let source = MockSource::new().with_available(available);
            let (set, response) = fill_request(&source, &req).await.unwrap();
            let expected = usize::try_from(wanted.min(available)).unwrap();
            assert_eq!(set.len(), expected);
            assert_eq!(response.is_full(), available >= wanted);
            assert!(is_chronological(set.candles()));
            assert_eq!(set.key(), req.candleset().key());
        });
    }
}

#[tokio::test]
async fn full_marker_after_requested_candles() {
    let req = start_count(3);
    let (set, response) = MockSource::new().fill_request(&req).await.unwrap();
    assert_eq!(response, ResponseType::FullResponse);
    assert_eq!(set.candles(), series(req.interval(), epoch(), 3).as_slice());
}

#[tokio::test]
async fn partial_marker_when_source_runs_short() {
    let req = start_count(5);
    let source = MockSource::new().with_available(3);
    let (set, response) = source.fill_request(&req).await.unwrap();
    assert_eq!(response, ResponseType::PartialResponse);
    assert_eq!(set.len(), 3);
}

#[tokio::test]
async fn natural_end_without_marker_is_full() {
    let req = start_count(3);
    let source = MockSource::new().without_marker();
    let (set, response) = source.fill_request(&req).await.unwrap();
    assert_eq!(response, ResponseType::FullResponse);
    assert_eq!(set.len(), 3);
}

#[tokio::test]
async fn pull_failure_discards_partial_set() {
    let req = start_count(10);
    let source = MockSource::new().failing_after(4);
    let err = source.fill_request(&req).await.unwrap_err();
    assert!(matches!(err, CandleError::Source { .. }));
}

#[tokio::test]
async fn open_failure_propagates() {
    let (mock, controller) = DynamicMockSource::new_with_controller("P0");
    let req = start_count(1);
    let err = CandleError::producer("P0", "connection refused");
    controller
        .set_stream_behavior(
            req.candleset().key(),
            StreamBehavior::Open(MockBehavior::Fail(err.clone())),
        )
        .await;
    assert_eq!(mock.fill_request(&req).await.unwrap_err(), err);
}

#[tokio::test]
async fn items_after_marker_are_not_read() {
    let (mock, controller) = DynamicMockSource::new_with_controller("P0");
    let req = start_count(2);
    let c0 = candle_at(req.interval(), epoch(), 0).unwrap();
    let c1 = candle_at(req.interval(), epoch(), 1).unwrap();
    controller
        .set_stream_behavior(
            req.candleset().key(),
            StreamBehavior::Items(vec![
                Ok(StreamItem::Candle(c0)),
                Ok(StreamItem::End(ResponseType::PartialResponse)),
                Ok(StreamItem::Candle(c1)),
                Err(CandleError::Other("never pulled".into())),
            ]),
        )
        .await;
    let (set, response) = mock.fill_request(&req).await.unwrap();
    assert_eq!(response, ResponseType::PartialResponse);
    assert_eq!(set.candles(), &[c0]);
}

#[tokio::test]
async fn out_of_order_candles_are_inserted_in_place() {
    let (mock, controller) = DynamicMockSource::new_with_controller("P0");
    let req = start_count(3);
    let c: Vec<_> = series(req.interval(), epoch(), 3);
    controller
        .set_stream_behavior(
            req.candleset().key(),
            StreamBehavior::Items(vec![
                Ok(StreamItem::Candle(c[2])),
                Ok(StreamItem::Candle(c[0])),
                Ok(StreamItem::Candle(c[1])),
            ]),
        )
        .await;
    let (set, _) = mock.fill_request(&req).await.unwrap();
    assert_eq!(set.candles(), c.as_slice());
}

#[tokio::test]
async fn max_candles_caps_and_marks_partial() {
    let req = start_count(10);
    let cfg = HistoryConfig::default().with_max_candles(4);
    let (set, response) = fill_request_with(&MockSource::new(), &req, &cfg).await.unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(response, ResponseType::PartialResponse);
}

#[tokio::test]
async fn max_candles_equal_to_delivery_keeps_marker() {
    let req = start_count(4);
    let cfg = HistoryConfig::default().with_max_candles(4);
    let (set, response) = fill_request_with(&MockSource::new(), &req, &cfg).await.unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(response, ResponseType::FullResponse);
}

#[tokio::test(start_paused = true)]
async fn stalled_pull_times_out() {
    let (mock, controller) = DynamicMockSource::new_with_controller("P0");
    let req = start_count(2);
    let c0 = candle_at(req.interval(), epoch(), 0).unwrap();
    controller
        .set_stream_behavior(
            req.candleset().key(),
            StreamBehavior::ItemsThenStall(vec![Ok(StreamItem::Candle(c0))]),
        )
        .await;
    let cfg = HistoryConfig::default().with_pull_timeout(Duration::from_millis(250));
    let err = mock.fill_request_with(&req, &cfg).await.unwrap_err();
    assert_eq!(
        err,
        CandleError::PullTimeout {
            stream_name: "P0".into(),
            timeout_ms: 250
        }
    );
}

#[tokio::test(start_paused = true)]
async fn slow_source_hits_request_deadline() {
    let req = start_count(10);
    let source = MockSource::new().with_delay(Duration::from_millis(100));
    let cfg = HistoryConfig::default()
        .with_pull_timeout(Duration::from_millis(500))
        .with_request_timeout(Duration::from_millis(550));
    let err = fill_request_with(&source, &req, &cfg).await.unwrap_err();
    assert_eq!(err, CandleError::request_timeout("fill_request"));
}

#[tokio::test(start_paused = true)]
async fn hanging_open_hits_request_deadline() {
    let (mock, controller) = DynamicMockSource::new_with_controller("P0");
    let req = start_count(1);
    controller
        .set_stream_behavior(req.candleset().key(), StreamBehavior::Open(MockBehavior::Hang))
        .await;
    let cfg = HistoryConfig::default().with_request_timeout(Duration::from_secs(1));
    let err = mock.fill_request_with(&req, &cfg).await.unwrap_err();
    assert!(matches!(err, CandleError::RequestTimeout { .. }));
}

#[tokio::test(start_paused = true)]
async fn generous_timeouts_do_not_interfere() {
    let req = start_count(5);
    let source = MockSource::new().with_delay(Duration::from_millis(10));
    let cfg = HistoryConfig::default()
        .with_pull_timeout(Duration::from_secs(1))
        .with_request_timeout(Duration::from_secs(10));
    let (set, response) = fill_request_with(&source, &req, &cfg).await.unwrap();
    assert_eq!(set.len(), 5);
    assert!(response.is_full());
}
