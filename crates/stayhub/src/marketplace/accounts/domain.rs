use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier wrapper for host applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostApplicationId(pub i64);

/// A registered account. Local accounts carry a password hash, Google
/// accounts a subject identifier; linking fills in both. Deliberately not
/// serializable: credentials leave this module only via [`UserProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub is_host: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            is_host: self.is_host,
        }
    }
}

/// Client-facing projection of a user; never exposes credentials.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub is_host: bool,
}

/// Insert payload for the user repository; the store assigns the
/// identifier and creation stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Wire request for local signup.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

const MINIMUM_PASSWORD_LENGTH: usize = 8;

impl SignupRequest {
    pub fn validate(&self) -> Result<(), SignupError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(SignupError::InvalidEmail);
        }
        if self.password.chars().count() < MINIMUM_PASSWORD_LENGTH {
            return Err(SignupError::PasswordTooShort {
                minimum: MINIMUM_PASSWORD_LENGTH,
            });
        }
        if self.name.trim().is_empty() {
            return Err(SignupError::MissingName);
        }
        Ok(())
    }
}

/// Validation failures for local signup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    #[error("a valid email address is required")]
    InvalidEmail,
    #[error("password must be at least {minimum} characters")]
    PasswordTooShort { minimum: usize },
    #[error("a display name is required")]
    MissingName,
}

/// Wire request for local login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An application to become a host, one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostApplication {
    pub id: HostApplicationId,
    pub user_id: UserId,
    pub full_name: String,
    pub contact_info: String,
    pub bank_name: String,
    pub bank_account: String,
    pub status: HostApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl HostApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            HostApplicationStatus::Pending => "pending",
            HostApplicationStatus::Approved => "approved",
            HostApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Wire request for submitting a host application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostApplicationRequest {
    pub full_name: String,
    pub contact_info: String,
    pub bank_name: String,
    pub bank_account: String,
}

impl HostApplicationRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        for (field, value) in [
            ("fullName", &self.full_name),
            ("contactInfo", &self.contact_info),
            ("bankName", &self.bank_name),
            ("bankAccount", &self.bank_account),
        ] {
            if value.trim().is_empty() {
                return Err(field);
            }
        }
        Ok(())
    }
}

/// Insert payload for the host application repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHostApplication {
    pub user_id: UserId,
    pub full_name: String,
    pub contact_info: String,
    pub bank_name: String,
    pub bank_account: String,
}
