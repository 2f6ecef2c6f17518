use crate::marketplace::RepositoryError;

use super::domain::{
    HostApplication, HostApplicationId, HostApplicationStatus, NewHostApplication, NewUser, User,
    UserId,
};

/// Storage abstraction for user accounts. `insert` must enforce email
/// uniqueness and answer `Conflict` on a duplicate.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn link_google_identity(&self, id: UserId, google_id: &str) -> Result<(), RepositoryError>;
    fn promote_to_host(&self, id: UserId) -> Result<(), RepositoryError>;
}

/// Storage abstraction for host applications, unique per user.
pub trait HostApplicationRepository: Send + Sync {
    fn insert(&self, application: NewHostApplication) -> Result<HostApplication, RepositoryError>;
    fn for_user(&self, user_id: UserId) -> Result<Option<HostApplication>, RepositoryError>;
    fn set_status(
        &self,
        id: HostApplicationId,
        status: HostApplicationStatus,
    ) -> Result<HostApplication, RepositoryError>;
}
