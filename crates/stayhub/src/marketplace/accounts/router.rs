use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::marketplace::RepositoryError;

use super::domain::{HostApplicationRequest, LoginRequest, SignupRequest, UserId};
use super::google::{IdentityError, IdentityGateway};
use super::repository::{HostApplicationRepository, UserRepository};
use super::service::{AccountError, AccountService};
use super::sessions::{require_session, SessionClaims, SessionSigner};

/// Account endpoints. Signup, login, logout, and the OAuth callback are
/// public; the session profile and host application routes require a
/// verified session.
pub fn account_router<U, H, G>(
    service: Arc<AccountService<U, H, G>>,
    sessions: Arc<SessionSigner>,
) -> Router
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    let open = Router::new()
        .route("/api/v1/auth/signup", post(signup_handler::<U, H, G>))
        .route("/api/v1/auth/login", post(login_handler::<U, H, G>))
        .route("/api/v1/auth/logout", get(logout_handler::<U, H, G>))
        .route(
            "/api/v1/auth/google/callback",
            get(google_callback_handler::<U, H, G>),
        );

    let guarded = Router::new()
        .route("/api/v1/auth/session", get(session_handler::<U, H, G>))
        .route(
            "/api/v1/host/applications",
            post(apply_for_hosting_handler::<U, H, G>),
        )
        .route_layer(middleware::from_fn_with_state(sessions, require_session));

    open.merge(guarded).with_state(service)
}

pub(crate) async fn signup_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    match service.sign_up(request) {
        Ok(session) => {
            let cookie = service.session_cookie(&session.token);
            (
                StatusCode::CREATED,
                [(header::SET_COOKIE, cookie)],
                Json(json!({
                    "message": "User created and logged in",
                    "user": session.profile,
                })),
            )
                .into_response()
        }
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn login_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    match service.log_in(request) {
        Ok(session) => {
            let cookie = service.session_cookie(&session.token);
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "message": "Logged in", "user": session.profile })),
            )
                .into_response()
        }
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn logout_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    (
        StatusCode::OK,
        [(header::SET_COOKIE, service.clear_session_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

pub(crate) async fn session_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
    Extension(claims): Extension<SessionClaims>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    match service.profile(UserId(claims.user_id)) {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => account_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleCallbackQuery {
    code: Option<String>,
}

pub(crate) async fn google_callback_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    let Some(code) = query.code else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No code provided" })),
        )
            .into_response();
    };

    match service.google_sign_in(&code).await {
        Ok(session) => {
            let cookie = service.session_cookie(&session.token);
            (
                StatusCode::SEE_OTHER,
                [
                    (header::LOCATION, "/".to_string()),
                    (header::SET_COOKIE, cookie),
                ],
            )
                .into_response()
        }
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn apply_for_hosting_handler<U, H, G>(
    State(service): State<Arc<AccountService<U, H, G>>>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<HostApplicationRequest>,
) -> Response
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    match service.apply_for_hosting(UserId(claims.user_id), request) {
        Ok(application) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Application submitted",
                "applicationId": application.id.0,
                "status": application.status.label(),
            })),
        )
            .into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) fn account_error_response(err: AccountError) -> Response {
    let (status, message) = match &err {
        AccountError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        AccountError::UnknownUser | AccountError::ApplicationNotFound => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        AccountError::EmailTaken
        | AccountError::ApplicationAlreadySubmitted
        | AccountError::AlreadyHost => (StatusCode::CONFLICT, err.to_string()),
        AccountError::Signup(_) | AccountError::MissingApplicationField(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        AccountError::Identity(IdentityError::NotConfigured) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        AccountError::Identity(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        AccountError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
}
