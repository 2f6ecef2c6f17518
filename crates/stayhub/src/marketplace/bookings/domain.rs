use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::availability::DateRange;
use crate::marketplace::listings::domain::ListingId;

/// Identifier wrapper for confirmed bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub i64);

/// A confirmed stay. Immutable once created; there is no cancellation or
/// amendment path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: UserId,
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// The calendar span this booking occupies, used as an exclusion
    /// window against later reservations.
    pub fn span(&self) -> DateRange {
        DateRange {
            start: self.check_in,
            end: self.check_out,
        }
    }
}

/// Wire request for creating a booking.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub listing_id: ListingId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: u32,
}

/// Insert payload handed to the booking repository once the availability
/// rules have accepted and priced the stay.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub guest_id: UserId,
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
}

impl NewBooking {
    pub fn span(&self) -> DateRange {
        DateRange {
            start: self.check_in,
            end: self.check_out,
        }
    }
}

/// A guest's booking joined with the card fields of its listing, newest
/// first in listings from the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestBookingView {
    pub id: BookingId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub listing: BookedListingView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedListingView {
    pub id: ListingId,
    pub title: String,
    pub cover_photo: Option<String>,
}
