use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::accounts::repository::UserRepository;
use crate::marketplace::accounts::sessions::{require_session, SessionClaims, SessionSigner};
use crate::marketplace::availability::DateRange;
use crate::marketplace::bookings::repository::BookingRepository;
use crate::marketplace::media::{MediaGateway, PhotoUpload};
use crate::marketplace::RepositoryError;

use super::domain::{Listing, ListingDraft, ListingId, ListingUpdate, Location};
use super::repository::ListingRepository;
use super::search::SearchFilters;
use super::service::{CatalogService, HostService, ListingError};

/// Public catalog endpoints: search and listing detail.
pub fn catalog_router<L, B>(service: Arc<CatalogService<L, B>>) -> Router
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    Router::new()
        .route("/api/v1/listings", get(search_handler::<L, B>))
        .route("/api/v1/listings/:listing_id", get(detail_handler::<L, B>))
        .with_state(service)
}

/// Host endpoints: every route requires a verified session.
pub fn host_router<L, U, M>(
    service: Arc<HostService<L, U, M>>,
    sessions: Arc<SessionSigner>,
) -> Router
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/host/listings",
            post(publish_handler::<L, U, M>).get(host_listings_handler::<L, U, M>),
        )
        .route(
            "/api/v1/host/listings/:listing_id",
            axum::routing::put(revise_handler::<L, U, M>).delete(retire_handler::<L, U, M>),
        )
        .route_layer(middleware::from_fn_with_state(sessions, require_session))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchQuery {
    place: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    rooms: Option<u32>,
    guests: Option<u32>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl SearchQuery {
    /// A stay window only forms when both dates are present; a lone date
    /// is ignored.
    fn into_filters(self) -> Result<SearchFilters, Response> {
        let stay = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end).map_err(|err| {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            })?),
            _ => None,
        };
        Ok(SearchFilters {
            place: self.place,
            min_price: self.min_price,
            max_price: self.max_price,
            rooms: self.rooms,
            guests: self.guests,
            stay,
        })
    }
}

pub(crate) async fn search_handler<L, B>(
    State(service): State<Arc<CatalogService<L, B>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    let filters = match query.into_filters() {
        Ok(filters) => filters,
        Err(response) => return response,
    };
    match service.search(&filters) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn detail_handler<L, B>(
    State(service): State<Arc<CatalogService<L, B>>>,
    Path(listing_id): Path<i64>,
) -> Response
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    match service.detail(ListingId(listing_id)) {
        Ok(listing) => (StatusCode::OK, Json(ListingDetailBody::from(&listing))).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn publish_handler<L, U, M>(
    State(service): State<Arc<HostService<L, U, M>>>,
    Extension(claims): Extension<SessionClaims>,
    multipart: Multipart,
) -> Response
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    let (draft, photos) = match read_listing_form(multipart).await {
        Ok(parsed) => parsed,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response()
        }
    };

    match service.publish(UserId(claims.user_id), draft, photos).await {
        Ok(listing) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Listing created",
                "listing": ListingDetailBody::from(&listing),
            })),
        )
            .into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn host_listings_handler<L, U, M>(
    State(service): State<Arc<HostService<L, U, M>>>,
    Extension(claims): Extension<SessionClaims>,
) -> Response
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    match service.host_listings(UserId(claims.user_id)) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn revise_handler<L, U, M>(
    State(service): State<Arc<HostService<L, U, M>>>,
    Extension(claims): Extension<SessionClaims>,
    Path(listing_id): Path<i64>,
    Json(update): Json<ListingUpdate>,
) -> Response
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    match service.revise(UserId(claims.user_id), ListingId(listing_id), update) {
        Ok(listing) => (
            StatusCode::OK,
            Json(json!({
                "message": "Listing updated",
                "listing": ListingDetailBody::from(&listing),
            })),
        )
            .into_response(),
        Err(err) => listing_error_response(err),
    }
}

pub(crate) async fn retire_handler<L, U, M>(
    State(service): State<Arc<HostService<L, U, M>>>,
    Extension(claims): Extension<SessionClaims>,
    Path(listing_id): Path<i64>,
) -> Response
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    match service.retire(UserId(claims.user_id), ListingId(listing_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => listing_error_response(err),
    }
}

/// Full listing view returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingDetailBody {
    id: i64,
    title: String,
    entire_unit: bool,
    rooms: u32,
    washrooms: u32,
    capacity: u32,
    description: Option<String>,
    location_state: Option<String>,
    location_country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price_per_night: f64,
    is_always_available: bool,
    photos: Vec<String>,
    blackouts: Vec<BlackoutBody>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BlackoutBody {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl From<&Listing> for ListingDetailBody {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.0,
            title: listing.title.clone(),
            entire_unit: listing.entire_unit,
            rooms: listing.rooms,
            washrooms: listing.washrooms,
            capacity: listing.capacity,
            description: listing.description.clone(),
            location_state: listing.location.state.clone(),
            location_country: listing.location.country.clone(),
            latitude: listing.location.latitude,
            longitude: listing.location.longitude,
            price_per_night: listing.price_per_night,
            is_always_available: listing.is_always_available,
            photos: listing.photos.iter().map(|photo| photo.url.clone()).collect(),
            blackouts: listing
                .blackouts
                .iter()
                .map(|range| BlackoutBody {
                    start_date: range.start,
                    end_date: range.end,
                })
                .collect(),
        }
    }
}

/// Pull the listing form out of a multipart body: scalar fields, a JSON
/// `blackouts` array, and any number of `photos` file parts.
async fn read_listing_form(
    mut multipart: Multipart,
) -> Result<(ListingDraft, Vec<PhotoUpload>), String> {
    let mut title = None;
    let mut entire_unit = false;
    let mut rooms = None;
    let mut washrooms = None;
    let mut capacity = None;
    let mut description = None;
    let mut location = Location::default();
    let mut price_per_night = None;
    let mut blackouts = Vec::new();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("malformed multipart body: {err}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photos" => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|err| format!("failed to read photo '{file_name}': {err}"))?;
                photos.push(PhotoUpload {
                    file_name,
                    content_type,
                    content: content.to_vec(),
                });
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| format!("failed to read field '{name}': {err}"))?;
                match name.as_str() {
                    "title" => title = Some(value),
                    "entireUnit" => entire_unit = value == "true",
                    "rooms" => rooms = Some(parse_count("rooms", &value)?),
                    "washrooms" => washrooms = Some(parse_count("washrooms", &value)?),
                    "capacity" => capacity = Some(parse_count("capacity", &value)?),
                    "description" => description = Some(value),
                    "locationState" => location.state = Some(value),
                    "locationCountry" => location.country = Some(value),
                    "latitude" => location.latitude = Some(parse_decimal("latitude", &value)?),
                    "longitude" => location.longitude = Some(parse_decimal("longitude", &value)?),
                    "pricePerNight" => {
                        price_per_night = Some(parse_decimal("pricePerNight", &value)?)
                    }
                    "blackouts" => blackouts = parse_blackouts(&value)?,
                    _ => {}
                }
            }
        }
    }

    let draft = ListingDraft {
        title: title.ok_or("title is required")?,
        entire_unit,
        rooms: rooms.ok_or("rooms is required")?,
        washrooms: washrooms.ok_or("washrooms is required")?,
        capacity: capacity.ok_or("capacity is required")?,
        description,
        location,
        price_per_night: price_per_night.ok_or("pricePerNight is required")?,
        blackouts,
    };
    Ok((draft, photos))
}

fn parse_count(name: &str, value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("{name} must be a whole number"))
}

fn parse_decimal(name: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("{name} must be a number"))
}

fn parse_blackouts(value: &str) -> Result<Vec<DateRange>, String> {
    let bodies: Vec<BlackoutBody> = serde_json::from_str(value)
        .map_err(|err| format!("blackouts must be a JSON array of date ranges: {err}"))?;
    bodies
        .into_iter()
        .map(|body| {
            DateRange::new(body.start_date, body.end_date).map_err(|err| err.to_string())
        })
        .collect()
}

pub(crate) fn listing_error_response(err: ListingError) -> Response {
    let (status, message) = match &err {
        ListingError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        ListingError::UnknownUser => (StatusCode::NOT_FOUND, err.to_string()),
        ListingError::NotAHost | ListingError::NotListingOwner => {
            (StatusCode::FORBIDDEN, err.to_string())
        }
        ListingError::Draft(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        ListingError::Media(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        ListingError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        ListingError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, err.to_string())
        }
        ListingError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
    };
    (status, Json(json!({ "error": message }))).into_response()
}
