//! Booking aggregate, the atomic reservation seam, and the booking service.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Booking, BookingId, BookingRequest, GuestBookingView, NewBooking};
pub use repository::{BookingRepository, ReservationError};
pub use router::booking_router;
pub use service::{BookingError, BookingService};
