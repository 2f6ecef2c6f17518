use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use chrono::Local;
use serde_json::json;

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::accounts::sessions::{require_session, SessionClaims, SessionSigner};
use crate::marketplace::availability::StayRejection;
use crate::marketplace::listings::repository::ListingRepository;
use crate::marketplace::RepositoryError;

use super::domain::BookingRequest;
use super::repository::BookingRepository;
use super::service::{BookingError, BookingService};

/// Booking endpoints; both require a verified session.
pub fn booking_router<L, B>(
    service: Arc<BookingService<L, B>>,
    sessions: Arc<SessionSigner>,
) -> Router
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/bookings",
            post(create_booking_handler::<L, B>).get(guest_bookings_handler::<L, B>),
        )
        .route_layer(middleware::from_fn_with_state(sessions, require_session))
        .with_state(service)
}

pub(crate) async fn create_booking_handler<L, B>(
    State(service): State<Arc<BookingService<L, B>>>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<BookingRequest>,
) -> Response
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.book(UserId(claims.user_id), &request, today) {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(json!({ "message": "Booking created", "booking": booking })),
        )
            .into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) async fn guest_bookings_handler<L, B>(
    State(service): State<Arc<BookingService<L, B>>>,
    Extension(claims): Extension<SessionClaims>,
) -> Response
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    match service.bookings_for_guest(UserId(claims.user_id)) {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(err) => booking_error_response(err),
    }
}

pub(crate) fn booking_error_response(err: BookingError) -> Response {
    let (status, message) = match &err {
        BookingError::ListingNotFound => (StatusCode::NOT_FOUND, err.to_string()),
        BookingError::Rejected(StayRejection::DatesUnavailable) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        BookingError::Rejected(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        BookingError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        BookingError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
}
