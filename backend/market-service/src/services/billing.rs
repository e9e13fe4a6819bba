//! Billing calculator
//!
//! Pure elapsed-time metering: whole minutes since session start multiplied
//! by the per-minute rate captured at open. No side effects; callers may
//! poll this repeatedly and nothing stored changes until a checkpoint or
//! close commits the result.

use chrono::{DateTime, Utc};

use crate::error::{MarketError, Result};
use crate::models::Amount;

/// The result of pricing a session at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingQuote {
    pub minutes: u64,
    pub cost: Amount,
}

/// Whole minutes elapsed between `start` and `now`, rounded down.
///
/// `now` earlier than `start` is invalid input, not a zero.
pub fn elapsed_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64> {
    if now < start {
        return Err(MarketError::InvalidTimeRange { start, now });
    }
    Ok((now - start).num_seconds() as u64 / 60)
}

/// Cost accrued for `minutes` at `price_per_minute`. A zero rate yields zero
/// cost regardless of elapsed time.
pub fn accrued_cost(minutes: u64, price_per_minute: Amount) -> Amount {
    price_per_minute.saturating_mul(minutes)
}

/// Price a session: elapsed whole minutes and the cost they accrue.
pub fn quote(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    price_per_minute: Amount,
) -> Result<BillingQuote> {
    let minutes = elapsed_minutes(start, now)?;
    Ok(BillingQuote {
        minutes,
        cost: accrued_cost(minutes, price_per_minute),
    })
}
