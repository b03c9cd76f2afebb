use candlekit_types::{
    CandleError, CandleInterval, Candleset, DataRequest, IntervalUnit, RequestSpan, TradingPair,
};
use chrono::{DateTime, TimeZone, Utc};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn set_on(unit: IntervalUnit, amount: u32) -> Candleset {
    Candleset::new(
        CandleInterval::new(unit, amount).unwrap(),
        TradingPair::new("USDT", "BTC"),
    )
}

fn minutes() -> Candleset {
    set_on(IntervalUnit::Minute, 1)
}

#[test]
fn date_range_request_carries_both_dates() {
    let cs = minutes();
    let start = utc(2000, 1, 1, 0, 0);
    let end = utc(2000, 1, 1, 0, 1);
    let req = DataRequest::date_range(&cs, start, end).unwrap();
    assert_eq!(req.candleset().key(), cs.key());
    assert_eq!(req.start_date(), Some(start));
    assert_eq!(req.end_date(), Some(end));
    assert_eq!(req.count(), None);
    assert_eq!(req.random_count(), None);
    assert_eq!(req.span(), RequestSpan::DateRange { start, end });
}

#[test]
fn date_range_rejects_end_before_start() {
    let res = DataRequest::date_range(&minutes(), utc(2000, 1, 1, 0, 1), utc(2000, 1, 1, 0, 0));
    assert_eq!(res.unwrap_err(), CandleError::InvalidRange);
}

#[test]
fn date_range_accepts_equal_dates() {
    let t = utc(2000, 1, 1, 0, 0);
    assert!(DataRequest::date_range(&minutes(), t, t).is_ok());
}

#[test]
fn count_requests_reject_negative_counts() {
    let t = utc(2000, 1, 1, 0, 0);
    assert_eq!(
        DataRequest::start_count(&minutes(), t, -1).unwrap_err(),
        CandleError::InvalidCount { count: -1 }
    );
    assert_eq!(
        DataRequest::end_count(&minutes(), -1, t).unwrap_err(),
        CandleError::InvalidCount { count: -1 }
    );
}

#[test]
fn count_requests_accept_zero() {
    let t = utc(2000, 1, 1, 0, 0);
    assert_eq!(DataRequest::start_count(&minutes(), t, 0).unwrap().count(), Some(0));
    assert_eq!(DataRequest::end_count(&minutes(), 0, t).unwrap().count(), Some(0));
}

#[test]
fn template_drops_seeded_candles() {
    let mut cs = minutes();
    cs.add_candle(candlekit_types::Candle::new(utc(2000, 1, 1, 0, 0), 1.0, 1.0, 1.0, 1.0, 1.0));
    let req = DataRequest::start_count(&cs, utc(2000, 1, 1, 0, 0), 3).unwrap();
    assert!(req.candleset().is_empty());
    assert_eq!(cs.len(), 1);
}

#[test]
fn estimate_end_date_adds_count_intervals() {
    let req = DataRequest::start_count(&minutes(), utc(2000, 1, 1, 0, 0), 100).unwrap();
    assert_eq!(req.estimate_end_date().unwrap(), utc(2000, 1, 1, 1, 40));
}

#[test]
fn estimate_end_date_multiplies_interval_amount() {
    let req =
        DataRequest::start_count(&set_on(IntervalUnit::Minute, 5), utc(2000, 1, 1, 0, 0), 12)
            .unwrap();
    assert_eq!(req.estimate_end_date().unwrap(), utc(2000, 1, 1, 1, 0));
}

#[test]
fn estimate_end_date_is_calendar_aware() {
    let req =
        DataRequest::start_count(&set_on(IntervalUnit::Month, 1), utc(2000, 1, 31, 0, 0), 1)
            .unwrap();
    assert_eq!(req.estimate_end_date().unwrap(), utc(2000, 2, 29, 0, 0));
}

#[test]
fn estimate_end_date_reports_missing_fields_in_order() {
    let range =
        DataRequest::date_range(&minutes(), utc(2000, 1, 1, 0, 0), utc(2000, 1, 1, 0, 1)).unwrap();
    assert_eq!(
        range.estimate_end_date().unwrap_err(),
        CandleError::missing("end date", "a count")
    );
    let end_count = DataRequest::end_count(&minutes(), 100, utc(2000, 1, 1, 0, 0)).unwrap();
    assert_eq!(
        end_count.estimate_end_date().unwrap_err(),
        CandleError::missing("end date", "a start date")
    );
}

#[test]
fn estimate_start_date_subtracts_count_intervals() {
    let req = DataRequest::end_count(&minutes(), 100, utc(2000, 1, 1, 0, 0)).unwrap();
    assert_eq!(req.estimate_start_date().unwrap(), utc(1999, 12, 31, 22, 20));
}

#[test]
fn estimate_start_date_reports_missing_fields_in_order() {
    let range =
        DataRequest::date_range(&minutes(), utc(2000, 1, 1, 0, 0), utc(2000, 1, 1, 0, 1)).unwrap();
    assert_eq!(
        range.estimate_start_date().unwrap_err(),
        CandleError::missing("start date", "a count")
    );
    let start_count = DataRequest::start_count(&minutes(), utc(2000, 1, 1, 0, 0), 100).unwrap();
    assert_eq!(
        start_count.estimate_start_date().unwrap_err(),
        CandleError::missing("start date", "an end date")
    );
}

#[test]
fn estimate_count_floors_whole_intervals() {
    let req =
        DataRequest::date_range(&minutes(), utc(2000, 1, 1, 0, 0), utc(2000, 1, 1, 1, 0)).unwrap();
    assert_eq!(req.estimate_count().unwrap(), 60);

    let hours = DataRequest::date_range(
        &set_on(IntervalUnit::Hour, 2),
        utc(2000, 1, 1, 0, 0),
        utc(2000, 1, 1, 5, 59),
    )
    .unwrap();
    assert_eq!(hours.estimate_count().unwrap(), 2);

    let months = DataRequest::date_range(
        &set_on(IntervalUnit::Month, 1),
        utc(2000, 1, 15, 0, 0),
        utc(2000, 4, 14, 0, 0),
    )
    .unwrap();
    assert_eq!(months.estimate_count().unwrap(), 2);
}

#[test]
fn estimate_count_reports_missing_fields_in_order() {
    let end_count = DataRequest::end_count(&minutes(), 100, utc(2000, 1, 1, 0, 0)).unwrap();
    assert_eq!(
        end_count.estimate_count().unwrap_err(),
        CandleError::missing("count", "a start date")
    );
    let start_count = DataRequest::start_count(&minutes(), utc(2000, 1, 1, 0, 0), 100).unwrap();
    assert_eq!(
        start_count.estimate_count().unwrap_err(),
        CandleError::missing("count", "an end date")
    );
}

#[test]
fn random_sets_window_size_for_every_mode() {
    let t0 = utc(2000, 1, 1, 0, 0);
    let t1 = utc(2000, 1, 1, 1, 0);
    let mut range = DataRequest::date_range(&minutes(), t0, t1).unwrap();
    range.random(30).unwrap();
    assert_eq!(range.random_count(), Some(30));
    assert_eq!(range.count(), None);

    let mut start = DataRequest::start_count(&minutes(), t0, 100).unwrap();
    start.random(30).unwrap();
    assert_eq!(start.random_count(), Some(30));
    assert_eq!(start.count(), Some(100));

    let mut end = DataRequest::end_count(&minutes(), 100, t0).unwrap();
    end.random(100).unwrap();
    assert_eq!(end.random_count(), Some(100));
}

#[test]
fn random_rejects_window_larger_than_count() {
    let mut req = DataRequest::start_count(&minutes(), utc(2000, 1, 1, 0, 0), 100).unwrap();
    assert_eq!(
        req.random(101).unwrap_err(),
        CandleError::InvalidRandomCount {
            random_count: 101,
            count: 100
        }
    );
    assert_eq!(req.random_count(), None);
}

#[test]
fn display_date_range() {
    let mut req =
        DataRequest::date_range(&minutes(), utc(2000, 1, 1, 0, 0), utc(2000, 1, 1, 1, 0)).unwrap();
    assert_eq!(
        req.to_string(),
        "Request of candles between dates 2000-01-01T00:00:00.000Z and 2000-01-01T01:00:00.000Z"
    );
    req.random(30).unwrap();
    assert_eq!(
        req.to_string(),
        "Random request of 30 candles from candles between dates \
         2000-01-01T00:00:00.000Z and 2000-01-01T01:00:00.000Z"
    );
}

#[test]
fn display_count_requests() {
    let t = utc(2000, 1, 1, 0, 0);
    let mut end = DataRequest::end_count(&minutes(), 100, t).unwrap();
    assert_eq!(
        end.to_string(),
        "Request of last 100 candles before the date 2000-01-01T00:00:00.000Z"
    );
    end.random(30).unwrap();
    assert_eq!(
        end.to_string(),
        "Random request of 30 candles from last 100 candles before the date 2000-01-01T00:00:00.000Z"
    );

    let mut start = DataRequest::start_count(&minutes(), t, 100).unwrap();
    assert_eq!(
        start.to_string(),
        "Request of first 100 candles after the date 2000-01-01T00:00:00.000Z"
    );
    start.random(30).unwrap();
    assert_eq!(
        start.to_string(),
        "Random request of 30 candles from first 100 candles after the date 2000-01-01T00:00:00.000Z"
    );
}
