//! The bookability rules shared by the booking and search paths.
//!
//! Everything in this module is a pure function over supplied data: no I/O,
//! no clock reads (the reporting date is a parameter), no shared state. A
//! stored [`DateRange`] is always a blackout window; a listing is open for
//! a span exactly when no blackout and no confirmed booking overlaps it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar interval. Used both for blackout windows on a listing
/// and for the spans occupied by confirmed bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if end < start {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive overlap test: ranges touching at a single endpoint count
    /// as overlapping.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

#[derive(Debug, thiserror::Error)]
#[error("date range must not end ({end}) before it starts ({start})")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A requested stay over `[check_in, check_out)` for a party of `guests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

impl StayRequest {
    /// Whole nights between check-in and check-out. Only meaningful once
    /// the ordering check in [`evaluate_stay`] has passed.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// The calendar span the stay occupies, from check-in day through
    /// check-out day.
    pub fn span(&self) -> DateRange {
        DateRange {
            start: self.check_in,
            end: self.check_out,
        }
    }
}

/// Borrowed view of everything a bookability decision needs from a listing
/// and its booking history.
#[derive(Debug, Clone, Copy)]
pub struct StayTerms<'a> {
    pub capacity: u32,
    pub price_per_night: f64,
    pub is_always_available: bool,
    pub blackouts: &'a [DateRange],
    pub booked: &'a [DateRange],
}

/// Priced outcome of an accepted stay request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayQuote {
    pub nights: u32,
    pub total_price: f64,
}

/// Reasons a stay request is turned down. All are user errors reported
/// synchronously; none are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StayRejection {
    #[error("party of {requested} exceeds the listing capacity of {capacity}")]
    CapacityExceeded { requested: u32, capacity: u32 },
    #[error("check-out must fall after check-in")]
    CheckOutNotAfterCheckIn,
    #[error("stay cannot begin in the past")]
    BeginsInPast,
    #[error("requested dates are unavailable")]
    DatesUnavailable,
}

/// Decide whether a stay can be booked and price it.
///
/// The capacity check runs first and is independent of date validity.
/// Blackouts are waived by `is_always_available`; spans occupied by
/// confirmed bookings are not, since the flag describes the host's
/// calendar, not other guests' stays.
pub fn evaluate_stay(
    terms: &StayTerms<'_>,
    request: &StayRequest,
    today: NaiveDate,
) -> Result<StayQuote, StayRejection> {
    if request.guests > terms.capacity {
        return Err(StayRejection::CapacityExceeded {
            requested: request.guests,
            capacity: terms.capacity,
        });
    }

    if request.check_out <= request.check_in {
        return Err(StayRejection::CheckOutNotAfterCheckIn);
    }
    if request.check_in < today {
        return Err(StayRejection::BeginsInPast);
    }

    let span = request.span();
    if !is_open_for(terms, span) {
        return Err(StayRejection::DatesUnavailable);
    }

    let nights = request.nights() as u32;
    Ok(StayQuote {
        nights,
        total_price: f64::from(nights) * terms.price_per_night,
    })
}

/// The canonical availability predicate, shared verbatim by search
/// filtering and (via [`evaluate_stay`]) the booking path.
pub fn is_open_for(terms: &StayTerms<'_>, span: DateRange) -> bool {
    if !terms.is_always_available && terms.blackouts.iter().any(|b| b.overlaps(&span)) {
        return false;
    }
    !terms.booked.iter().any(|b| b.overlaps(&span))
}
