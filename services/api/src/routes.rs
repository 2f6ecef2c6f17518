use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use stayhub::marketplace::accounts::google::IdentityGateway;
use stayhub::marketplace::accounts::repository::{HostApplicationRepository, UserRepository};
use stayhub::marketplace::accounts::router::account_router;
use stayhub::marketplace::accounts::service::AccountService;
use stayhub::marketplace::accounts::sessions::SessionSigner;
use stayhub::marketplace::bookings::repository::BookingRepository;
use stayhub::marketplace::bookings::router::booking_router;
use stayhub::marketplace::bookings::service::BookingService;
use stayhub::marketplace::listings::repository::ListingRepository;
use stayhub::marketplace::listings::router::{catalog_router, host_router};
use stayhub::marketplace::listings::service::{CatalogService, HostService};
use stayhub::marketplace::media::MediaGateway;

/// Compose the marketplace routers with the operational endpoints.
pub(crate) fn marketplace_router<L, B, U, M, H, G>(
    catalog: Arc<CatalogService<L, B>>,
    host: Arc<HostService<L, U, M>>,
    bookings: Arc<BookingService<L, B>>,
    accounts: Arc<AccountService<U, H, G>>,
    sessions: Arc<SessionSigner>,
) -> Router
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    catalog_router(catalog)
        .merge(host_router(host, sessions.clone()))
        .merge(booking_router(bookings, sessions.clone()))
        .merge(account_router(accounts, sessions))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
