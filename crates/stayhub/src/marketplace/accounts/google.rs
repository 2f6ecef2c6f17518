use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleConfig;

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Identity returned by the OAuth provider after a code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleProfile {
    #[serde(rename = "id")]
    pub subject: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("sign-in with Google is not configured")]
    NotConfigured,
    #[error("identity exchange failed: {0}")]
    Exchange(String),
    #[error("identity provider returned no access token")]
    MissingAccessToken,
}

/// Exchanges an OAuth authorization code for a user profile. Trait seam so
/// the account service can be exercised without the network.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityError>;
}

#[derive(Debug, Clone)]
struct OAuthCredentials {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// Google OAuth client, configured once at startup with immutable
/// credentials. Unconfigured deployments keep the gateway constructible so
/// the rest of the account surface still works; code exchange then answers
/// `NotConfigured`.
#[derive(Debug, Clone)]
pub struct GoogleIdentityClient {
    http: reqwest::Client,
    credentials: Option<OAuthCredentials>,
}

impl GoogleIdentityClient {
    pub fn from_config(config: &GoogleConfig) -> Self {
        let credentials =
            config
                .oauth_credentials()
                .map(|(client_id, client_secret, redirect_uri)| OAuthCredentials {
                    client_id: client_id.to_string(),
                    client_secret: client_secret.to_string(),
                    redirect_uri: redirect_uri.to_string(),
                });
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[async_trait]
impl IdentityGateway for GoogleIdentityClient {
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(IdentityError::NotConfigured)?;

        let token: TokenResponse = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("redirect_uri", credentials.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|err| IdentityError::Exchange(err.to_string()))?
            .json()
            .await
            .map_err(|err| IdentityError::Exchange(err.to_string()))?;

        let access_token = token.access_token.ok_or(IdentityError::MissingAccessToken)?;

        self.http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| IdentityError::Exchange(err.to_string()))?
            .json::<GoogleProfile>()
            .await
            .map_err(|err| IdentityError::Exchange(err.to_string()))
    }
}
