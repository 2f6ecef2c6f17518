use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::availability::DateRange;
use crate::marketplace::listings::domain::ListingId;
use crate::marketplace::RepositoryError;

use super::domain::{Booking, NewBooking};

/// Storage abstraction for bookings.
///
/// `reserve` is the transactional guard around check-then-write: the
/// implementation must test the new span against the listing's existing
/// bookings and insert inside one critical section, so two concurrent
/// requests for overlapping dates cannot both succeed. An in-memory store
/// holds its lock across both steps; a SQL store would use a serializable
/// transaction or an exclusion constraint on (listing, span).
pub trait BookingRepository: Send + Sync {
    fn reserve(&self, booking: NewBooking) -> Result<Booking, ReservationError>;
    fn booked_spans(&self, listing_id: ListingId) -> Result<Vec<DateRange>, RepositoryError>;
    fn for_guest(&self, guest_id: UserId) -> Result<Vec<Booking>, RepositoryError>;
}

/// Outcome of a failed reservation attempt.
#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("requested dates were reserved by another booking")]
    SpanConflict,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
