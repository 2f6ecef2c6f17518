//! Users, host applications, session tokens, and sign-in flows.

pub mod domain;
pub mod google;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod sessions;

pub use domain::{
    HostApplication, HostApplicationId, HostApplicationRequest, HostApplicationStatus,
    LoginRequest, NewHostApplication, NewUser, SignupError, SignupRequest, User, UserId,
    UserProfile,
};
pub use google::{GoogleIdentityClient, GoogleProfile, IdentityError, IdentityGateway};
pub use repository::{HostApplicationRepository, UserRepository};
pub use router::account_router;
pub use service::{AccountError, AccountService, AuthenticatedSession};
pub use sessions::{SessionClaims, SessionError, SessionSigner};
