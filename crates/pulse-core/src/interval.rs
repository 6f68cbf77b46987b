//! Polling interval tokens.
//!
//! An interval is written as a whole number with an optional unit suffix:
//! `30s`, `4m`, `1h`, or a bare `45` meaning seconds. Suffixes are
//! case-sensitive.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Errors produced when parsing an interval token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntervalError {
    #[error("invalid duration format: {0:?} (expected <digits>[s|m|h])")]
    InvalidDurationFormat(String),

    #[error("interval must be positive: {0:?}")]
    Zero(String),

    #[error("interval too large: {0:?} (at most 366 days)")]
    TooLarge(String),
}

/// Longest accepted polling period: 366 days.
pub const MAX_INTERVAL_SECS: u64 = 366 * 24 * 60 * 60;

/// A polling period in whole seconds, in `1..=MAX_INTERVAL_SECS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(u64);

impl Interval {
    /// Build an interval from a number of seconds.
    ///
    /// Returns `None` for zero or anything above [`MAX_INTERVAL_SECS`].
    pub fn from_secs(secs: u64) -> Option<Self> {
        (1..=MAX_INTERVAL_SECS).contains(&secs).then_some(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl std::str::FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_interval(s)
    }
}

/// Parse an interval token like "1s", "4m", "1h" or "90" into seconds.
pub fn parse_interval(token: &str) -> Result<Interval, IntervalError> {
    let invalid = || IntervalError::InvalidDurationFormat(token.to_string());

    let (digits, multiplier) = if let Some(n) = token.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = token.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = token.strip_suffix('h') {
        (n, 60 * 60)
    } else {
        (token, 1)
    };

    // `u64::from_str` accepts a leading '+', so check the digits ourselves.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    // Only overflow can fail here.
    let secs = digits
        .parse::<u64>()
        .map_err(|_| IntervalError::TooLarge(token.to_string()))?;

    match secs.checked_mul(multiplier) {
        Some(0) => Err(IntervalError::Zero(token.to_string())),
        Some(secs) if secs <= MAX_INTERVAL_SECS => Ok(Interval(secs)),
        _ => Err(IntervalError::TooLarge(token.to_string())),
    }
}
