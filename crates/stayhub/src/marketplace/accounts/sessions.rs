use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::UserId;

/// Cookie carrying the session token for browser clients.
pub const SESSION_COOKIE: &str = "token";

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i64,
    pub email: String,
    pub exp: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 session tokens. Built once from configuration
/// and shared by reference; no per-request credential mutation.
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u32,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds: ttl_hours.saturating_mul(3600),
        }
    }

    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, SessionError> {
        let exp = Utc::now().timestamp().max(0) as usize + self.ttl_seconds as usize;
        let claims = SessionClaims {
            user_id: user_id.0,
            email: email.to_string(),
            exp,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let data = decode::<SessionClaims>(
            token,
            &self.decoding,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    /// `Set-Cookie` value delivering a fresh session.
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
            self.ttl_seconds
        )
    }

    /// `Set-Cookie` value expiring the session immediately.
    pub fn clear_cookie(&self) -> String {
        format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
    }
}

/// Pull a session token from either a bearer header or the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        if let Ok(raw) = value.to_str() {
            if let Some(token) = raw.strip_prefix("Bearer ") {
                return Some(token.trim().to_string());
            }
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Middleware guarding authenticated routes: verifies the session token
/// and exposes the claims to handlers as a request extension.
pub async fn require_session(
    State(signer): State<Arc<SessionSigner>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = token_from_headers(request.headers()) else {
        return unauthenticated();
    };
    match signer.verify(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(_) => unauthenticated(),
    }
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Not authenticated" })),
    )
        .into_response()
}
