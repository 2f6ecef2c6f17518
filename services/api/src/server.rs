use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryBookingRepository, InMemoryHostApplicationRepository,
    InMemoryListingRepository, InMemoryMediaGateway, InMemoryUserRepository,
};
use crate::routes::marketplace_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stayhub::config::AppConfig;
use stayhub::error::AppError;
use stayhub::marketplace::accounts::google::GoogleIdentityClient;
use stayhub::marketplace::accounts::service::AccountService;
use stayhub::marketplace::accounts::sessions::SessionSigner;
use stayhub::marketplace::bookings::service::BookingService;
use stayhub::marketplace::listings::service::{CatalogService, HostService};
use stayhub::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let sessions = Arc::new(SessionSigner::new(
        &config.auth.token_secret,
        config.auth.session_ttl_hours,
    ));
    let listings = Arc::new(InMemoryListingRepository::default());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let applications = Arc::new(InMemoryHostApplicationRepository::default());
    let media = Arc::new(InMemoryMediaGateway::default());
    let identity = Arc::new(GoogleIdentityClient::from_config(&config.google));

    let catalog = Arc::new(CatalogService::new(listings.clone(), bookings.clone()));
    let host = Arc::new(HostService::new(listings.clone(), users.clone(), media));
    let booking = Arc::new(BookingService::new(listings.clone(), bookings.clone()));
    let accounts = Arc::new(AccountService::new(
        users,
        applications,
        identity,
        sessions.clone(),
    ));

    let app = marketplace_router(catalog, host, booking, accounts, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "stayhub marketplace api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
