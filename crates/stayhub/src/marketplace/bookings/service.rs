use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::availability::{evaluate_stay, StayRejection, StayRequest};
use crate::marketplace::listings::repository::ListingRepository;
use crate::marketplace::RepositoryError;

use super::domain::{BookedListingView, Booking, BookingRequest, GuestBookingView, NewBooking};
use super::repository::{BookingRepository, ReservationError};

/// Books stays and lists a guest's booking history. The availability rules
/// decide and price; the repository's atomic `reserve` closes the window
/// between the decision and the write.
pub struct BookingService<L, B> {
    listings: Arc<L>,
    bookings: Arc<B>,
}

impl<L, B> BookingService<L, B>
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    pub fn new(listings: Arc<L>, bookings: Arc<B>) -> Self {
        Self { listings, bookings }
    }

    /// Book a stay for `guest_id`. `today` anchors the not-in-the-past
    /// rule so callers (and tests) control the clock.
    pub fn book(
        &self,
        guest_id: UserId,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, BookingError> {
        let listing = self
            .listings
            .fetch(request.listing_id)?
            .ok_or(BookingError::ListingNotFound)?;

        let booked = self.bookings.booked_spans(listing.id)?;
        let stay = StayRequest {
            check_in: request.start_date,
            check_out: request.end_date,
            guests: request.guests,
        };
        let quote = evaluate_stay(&listing.stay_terms(&booked), &stay, today)?;

        let booking = self
            .bookings
            .reserve(NewBooking {
                guest_id,
                listing_id: listing.id,
                check_in: request.start_date,
                check_out: request.end_date,
                guests: request.guests,
                total_price: quote.total_price,
            })
            .map_err(|err| match err {
                // A racing booking claimed the span after our read; surface
                // it as the same rejection the pre-check would have given.
                ReservationError::SpanConflict => {
                    BookingError::Rejected(StayRejection::DatesUnavailable)
                }
                ReservationError::Repository(repo) => BookingError::Repository(repo),
            })?;

        info!(
            booking = booking.id.0,
            listing = listing.id.0,
            nights = quote.nights,
            total = quote.total_price,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// The guest's bookings joined with listing cards, newest first.
    pub fn bookings_for_guest(
        &self,
        guest_id: UserId,
    ) -> Result<Vec<GuestBookingView>, BookingError> {
        let mut bookings = self.bookings.for_guest(guest_id)?;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let listing = self.listings.fetch(booking.listing_id)?;
            let listing_view = match listing {
                Some(listing) => BookedListingView {
                    id: listing.id,
                    title: listing.title.clone(),
                    cover_photo: listing.photos.first().map(|photo| photo.url.clone()),
                },
                // The listing was retired after the stay; keep the booking
                // visible with a placeholder card.
                None => BookedListingView {
                    id: booking.listing_id,
                    title: "Listing no longer available".to_string(),
                    cover_photo: None,
                },
            };
            views.push(GuestBookingView {
                id: booking.id,
                start_date: booking.check_in,
                end_date: booking.check_out,
                guests: booking.guests,
                total_price: booking.total_price,
                created_at: booking.created_at,
                listing: listing_view,
            });
        }
        Ok(views)
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("listing not found")]
    ListingNotFound,
    #[error(transparent)]
    Rejected(#[from] StayRejection),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
