use std::sync::Arc;

use tracing::info;

use crate::marketplace::RepositoryError;

use super::domain::{
    HostApplication, HostApplicationRequest, HostApplicationStatus, LoginRequest,
    NewHostApplication, NewUser, SignupError, SignupRequest, User, UserId, UserProfile,
};
use super::google::{IdentityError, IdentityGateway};
use super::password::{hash_password, verify_password, PasswordError};
use super::repository::{HostApplicationRepository, UserRepository};
use super::sessions::{SessionError, SessionSigner};

/// A signed-in user: the profile plus a fresh session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub profile: UserProfile,
    pub token: String,
}

/// Account lifecycle: signup, sign-in (local and Google), profiles, and
/// host onboarding.
pub struct AccountService<U, H, G> {
    users: Arc<U>,
    applications: Arc<H>,
    identity: Arc<G>,
    sessions: Arc<SessionSigner>,
}

impl<U, H, G> AccountService<U, H, G>
where
    U: UserRepository + 'static,
    H: HostApplicationRepository + 'static,
    G: IdentityGateway + 'static,
{
    pub fn new(
        users: Arc<U>,
        applications: Arc<H>,
        identity: Arc<G>,
        sessions: Arc<SessionSigner>,
    ) -> Self {
        Self {
            users,
            applications,
            identity,
            sessions,
        }
    }

    /// Create a local account and sign it in.
    pub fn sign_up(&self, request: SignupRequest) -> Result<AuthenticatedSession, AccountError> {
        request.validate()?;
        let email = request.email.trim().to_string();

        if self.users.find_by_email(&email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .insert(NewUser {
                email,
                name: request.name.trim().to_string(),
                password_hash: Some(password_hash),
                google_id: None,
            })
            .map_err(|err| match err {
                // Lost a race against a concurrent signup for the same email.
                RepositoryError::Conflict => AccountError::EmailTaken,
                other => AccountError::Repository(other),
            })?;

        info!(user = user.id.0, "account created");
        self.session_for(&user)
    }

    /// Verify local credentials and sign in. One opaque failure for both
    /// the unknown-email and wrong-password cases.
    pub fn log_in(&self, request: LoginRequest) -> Result<AuthenticatedSession, AccountError> {
        let user = self
            .users
            .find_by_email(request.email.trim())?
            .ok_or(AccountError::InvalidCredentials)?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AccountError::InvalidCredentials)?;
        if !verify_password(&request.password, hash)? {
            return Err(AccountError::InvalidCredentials);
        }
        self.session_for(&user)
    }

    /// Complete a Google sign-in: exchange the authorization code, then
    /// link, reuse, or create the matching account.
    pub async fn google_sign_in(&self, code: &str) -> Result<AuthenticatedSession, AccountError> {
        let profile = self.identity.exchange_code(code).await?;

        let user = match self.users.find_by_email(&profile.email)? {
            Some(existing) => {
                if existing.google_id.is_none() {
                    self.users
                        .link_google_identity(existing.id, &profile.subject)?;
                    info!(user = existing.id.0, "google identity linked");
                }
                existing
            }
            None => {
                let created = self.users.insert(NewUser {
                    email: profile.email.clone(),
                    name: profile.name.clone(),
                    password_hash: None,
                    google_id: Some(profile.subject.clone()),
                })?;
                info!(user = created.id.0, "account created via google");
                created
            }
        };

        self.session_for(&user)
    }

    pub fn profile(&self, user_id: UserId) -> Result<UserProfile, AccountError> {
        let user = self.users.fetch(user_id)?.ok_or(AccountError::UnknownUser)?;
        Ok(user.profile())
    }

    /// Submit a host application. One per user; existing hosts cannot
    /// re-apply.
    pub fn apply_for_hosting(
        &self,
        user_id: UserId,
        request: HostApplicationRequest,
    ) -> Result<HostApplication, AccountError> {
        request
            .validate()
            .map_err(AccountError::MissingApplicationField)?;

        let user = self.users.fetch(user_id)?.ok_or(AccountError::UnknownUser)?;
        if user.is_host {
            return Err(AccountError::AlreadyHost);
        }
        if self.applications.for_user(user_id)?.is_some() {
            return Err(AccountError::ApplicationAlreadySubmitted);
        }

        let application = self.applications.insert(NewHostApplication {
            user_id,
            full_name: request.full_name,
            contact_info: request.contact_info,
            bank_name: request.bank_name,
            bank_account: request.bank_account,
        })?;
        info!(user = user_id.0, "host application submitted");
        Ok(application)
    }

    /// Decide a pending application. Approval promotes the applicant to
    /// host.
    pub fn review_application(
        &self,
        applicant: UserId,
        approve: bool,
    ) -> Result<HostApplication, AccountError> {
        let application = self
            .applications
            .for_user(applicant)?
            .ok_or(AccountError::ApplicationNotFound)?;

        let status = if approve {
            HostApplicationStatus::Approved
        } else {
            HostApplicationStatus::Rejected
        };
        let updated = self.applications.set_status(application.id, status)?;

        if approve {
            self.users.promote_to_host(applicant)?;
            info!(user = applicant.0, "host application approved");
        } else {
            info!(user = applicant.0, "host application rejected");
        }
        Ok(updated)
    }

    /// `Set-Cookie` value delivering the given session token.
    pub fn session_cookie(&self, token: &str) -> String {
        self.sessions.session_cookie(token)
    }

    /// `Set-Cookie` value expiring the session.
    pub fn clear_session_cookie(&self) -> String {
        self.sessions.clear_cookie()
    }

    fn session_for(&self, user: &User) -> Result<AuthenticatedSession, AccountError> {
        let token = self.sessions.issue(user.id, &user.email)?;
        Ok(AuthenticatedSession {
            profile: user.profile(),
            token,
        })
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UnknownUser,
    #[error("host application already submitted")]
    ApplicationAlreadySubmitted,
    #[error("no host application on file")]
    ApplicationNotFound,
    #[error("user is already a host")]
    AlreadyHost,
    #[error("{0} is required")]
    MissingApplicationField(&'static str),
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
