//! Candle bucket granularity and calendar-aware interval arithmetic.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::CandleError;

/// Time unit of a [`CandleInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntervalUnit {
    /// Calendar year, `y`.
    Year,
    /// Calendar month, `M`.
    Month,
    /// Seven days, `w`.
    Week,
    /// One day, `d`.
    Day,
    /// One hour, `h`.
    Hour,
    /// One minute, `m`.
    Minute,
}

impl IntervalUnit {
    /// Every unit, largest first.
    pub const ALL: [Self; 6] = [
        Self::Year,
        Self::Month,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
    ];

    /// Single-character code used in the compact string form.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Year => 'y',
            Self::Month => 'M',
            Self::Week => 'w',
            Self::Day => 'd',
            Self::Hour => 'h',
            Self::Minute => 'm',
        }
    }

    /// Parse a unit code. Codes are case-sensitive (`M` is month, `m` is minute).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::Year),
            'M' => Some(Self::Month),
            'w' => Some(Self::Week),
            'd' => Some(Self::Day),
            'h' => Some(Self::Hour),
            'm' => Some(Self::Minute),
            _ => None,
        }
    }

    /// Fixed length in seconds, or `None` for calendar units.
    const fn fixed_seconds(self) -> Option<i64> {
        match self {
            Self::Week => Some(7 * 86_400),
            Self::Day => Some(86_400),
            Self::Hour => Some(3_600),
            Self::Minute => Some(60),
            Self::Year | Self::Month => None,
        }
    }

    const fn months(self) -> i64 {
        match self {
            Self::Year => 12,
            _ => 1,
        }
    }

    /// Shift `ts` by `units` of this unit. Months and years clamp to the end of
    /// the target month (Jan 31 + 1 month = Feb 28/29).
    ///
    /// Returns `None` if the result is not representable.
    #[must_use]
    pub fn add_to(self, ts: DateTime<Utc>, units: i64) -> Option<DateTime<Utc>> {
        if let Some(secs) = self.fixed_seconds() {
            let delta = TimeDelta::try_seconds(secs.checked_mul(units)?)?;
            return ts.checked_add_signed(delta);
        }
        let months = units.checked_mul(self.months())?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            ts.checked_add_months(magnitude)
        } else {
            ts.checked_sub_months(magnitude)
        }
    }

    /// Whole units elapsed from `start` to `end`, truncated toward zero.
    #[must_use]
    pub fn units_between(self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        if let Some(secs) = self.fixed_seconds() {
            return (end - start).num_seconds() / secs;
        }
        months_between(start, end) / self.months()
    }
}

fn months_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    // The naive month delta may overshoot by one when the day/time of `end`
    // falls before that of `start`.
    let overshoots = |m: i64| match IntervalUnit::Month.add_to(start, m) {
        Some(anchor) if m > 0 => anchor > end,
        Some(anchor) if m < 0 => anchor < end,
        _ => false,
    };
    if overshoots(months) {
        months -= months.signum();
    }
    months
}

/// Time frame between consecutive candles: a unit and a positive amount.
///
/// The compact string form is `"<amount><unit>"`, e.g. `"5m"` for five
/// minutes or `"1M"` for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandleInterval {
    unit: IntervalUnit,
    amount: u32,
}

impl CandleInterval {
    /// Build an interval from a unit and amount.
    ///
    /// # Errors
    /// Returns `CandleError::InvalidAmount` if `amount` is zero.
    pub fn new(unit: IntervalUnit, amount: u32) -> Result<Self, CandleError> {
        if amount == 0 {
            return Err(CandleError::InvalidAmount {
                input: format!("{amount}{}", unit.as_char()),
            });
        }
        Ok(Self { unit, amount })
    }

    /// An interval of exactly one `unit`.
    #[must_use]
    pub const fn one(unit: IntervalUnit) -> Self {
        Self { unit, amount: 1 }
    }

    /// The interval's unit.
    #[must_use]
    pub const fn unit(&self) -> IntervalUnit {
        self.unit
    }

    /// The interval's amount (always at least 1).
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Shift `ts` by `steps` whole intervals (negative steps move backwards).
    ///
    /// # Errors
    /// Returns `CandleError::DateOutOfRange` if the result is not representable.
    pub fn shift(&self, ts: DateTime<Utc>, steps: i64) -> Result<DateTime<Utc>, CandleError> {
        steps
            .checked_mul(i64::from(self.amount))
            .and_then(|units| self.unit.add_to(ts, units))
            .ok_or_else(|| {
                CandleError::DateOutOfRange(format!("{ts} shifted by {steps} x {self}"))
            })
    }

    /// Whole intervals elapsed from `start` to `end`, truncated toward zero.
    #[must_use]
    pub fn intervals_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        self.unit.units_between(start, end) / i64::from(self.amount)
    }
}

impl fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.as_char())
    }
}

impl FromStr for CandleInterval {
    type Err = CandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(unit_char) = s.chars().next_back().filter(|_| s.chars().count() >= 2) else {
            return Err(CandleError::InvalidFormat {
                input: s.to_string(),
            });
        };
        let prefix = &s[..s.len() - unit_char.len_utf8()];

        let amount = match prefix.parse::<u32>() {
            Ok(a) if a >= 1 => a,
            _ => {
                return Err(CandleError::InvalidAmount {
                    input: s.to_string(),
                });
            }
        };

        let unit = IntervalUnit::from_char(unit_char).ok_or_else(|| CandleError::InvalidUnit {
            input: s.to_string(),
        })?;

        Ok(Self { unit, amount })
    }
}

impl TryFrom<String> for CandleInterval {
    type Error = CandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CandleInterval> for String {
    fn from(interval: CandleInterval) -> Self {
        interval.to_string()
    }
}
