use chrono::TimeDelta;

use candlekit_types::{Candle, CandleInterval, IntervalUnit};

/// Estimate a representative step (in seconds) from positive adjacent timestamp
/// deltas in the input series.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median.
///
/// Examples
///
/// Unique mode (60s):
///
/// ```
/// use candlekit_core::{estimate_step_seconds, Candle};
/// use chrono::DateTime;
///
/// let mk = |sec: i64| Candle::new(DateTime::from_timestamp(sec, 0).unwrap(), 1.0, 1.0, 1.0, 1.0, 0.0);
/// // Adjacent deltas: 60,60,60,120,180  => unique mode is 60
/// let candles = vec![mk(0), mk(60), mk(120), mk(180), mk(300), mk(480)];
/// assert_eq!(estimate_step_seconds(&candles), Some(60));
/// ```
///
/// The input order does not matter; duplicates are ignored. Returns `None` if
/// fewer than two distinct timestamps are present.
#[must_use]
pub fn estimate_step_seconds(candles: &[Candle]) -> Option<i64> {
    if candles.len() < 2 {
        return None;
    }
    let mut ts: Vec<_> = candles.iter().map(Candle::ts).collect();
    ts.sort_unstable();

    let mut deltas: Vec<i64> = Vec::with_capacity(ts.len().saturating_sub(1));
    let mut last = ts[0];
    for &cur in ts.iter().skip(1) {
        let dt: TimeDelta = cur - last;
        if dt > TimeDelta::zero() {
            deltas.push(dt.num_seconds());
            last = cur;
        }
    }
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta = deltas[0];
    let mut best_count = 0usize;
    let mut ties = 0usize;
    for run in deltas.chunk_by(|a, b| a == b) {
        if run.len() > best_count {
            best_count = run.len();
            best_delta = run[0];
            ties = 1;
        } else if run.len() == best_count {
            ties += 1;
        }
    }
    if ties == 1 {
        return Some(best_delta);
    }

    // Lower median, so the result is a cadence that was actually observed.
    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

/// Infer the candle interval of a series from its dominant step.
///
/// Only fixed-length units are recognized (weeks, days, hours, minutes); the
/// largest unit that divides the step evenly wins, so a 7200s step is `2h`
/// and a 90s step yields `None`.
#[must_use]
pub fn infer_interval(candles: &[Candle]) -> Option<CandleInterval> {
    const UNITS: [(IntervalUnit, i64); 4] = [
        (IntervalUnit::Week, 604_800),
        (IntervalUnit::Day, 86_400),
        (IntervalUnit::Hour, 3_600),
        (IntervalUnit::Minute, 60),
    ];
    let step = estimate_step_seconds(candles)?;
    UNITS
        .iter()
        .find(|(_, secs)| step % secs == 0)
        .and_then(|&(unit, secs)| {
            let amount = u32::try_from(step / secs).ok()?;
            CandleInterval::new(unit, amount).ok()
        })
}
