//! Expiry calculation from a day offset.
//!
//! A positive day count expires the token that many 24-hour periods after
//! issuance. `-1` disables expiry. Everything else is rejected.

use crate::error::{CoreError, Result};

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Day offset meaning "never expires".
pub const NEVER_EXPIRES: i64 = -1;

/// Default expiry horizon in days.
pub const DEFAULT_DAYS: i64 = 90;

/// When a token expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Never expires.
    Never,
    /// Expires at this Unix timestamp (milliseconds).
    At(i64),
}

impl Expiry {
    /// Compute the expiry for `days` relative to the current wall clock.
    pub fn from_days(days: i64) -> Result<Self> {
        compute_expiry(days, now_millis())
    }

    /// The timestamp to persist, `None` for [`Expiry::Never`].
    pub const fn timestamp(&self) -> Option<i64> {
        match self {
            Expiry::Never => None,
            Expiry::At(ts) => Some(*ts),
        }
    }
}

/// Compute the expiry for `days` relative to `now` (Unix milliseconds).
pub fn compute_expiry(days: i64, now: i64) -> Result<Expiry> {
    if days == NEVER_EXPIRES {
        return Ok(Expiry::Never);
    }
    if days <= 0 {
        return Err(CoreError::invalid(
            "days",
            "must be greater than zero, or -1 to disable expiry",
        ));
    }

    days.checked_mul(DAY_MILLIS)
        .and_then(|offset| now.checked_add(offset))
        .map(Expiry::At)
        .ok_or_else(|| CoreError::invalid("days", format!("{} days overflows the clock", days)))
}

/// Parse a day offset from user input.
pub fn parse_days(input: &str) -> Result<i64> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| CoreError::invalid("days", format!("{:?} is not a whole number", input)))
}

/// Get current time in milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
