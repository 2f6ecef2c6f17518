use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::RepositoryError;

use super::domain::{Listing, ListingId, NewListing};
use super::search::SearchFilters;

/// Storage abstraction for listings so the services can be exercised in
/// isolation. `filter` applies the structural criteria only; date-window
/// gating stays in the availability rules.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: NewListing) -> Result<Listing, RepositoryError>;
    fn update(&self, listing: Listing) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn remove(&self, id: ListingId) -> Result<(), RepositoryError>;
    fn for_host(&self, host_id: UserId) -> Result<Vec<Listing>, RepositoryError>;
    fn filter(&self, filters: &SearchFilters) -> Result<Vec<Listing>, RepositoryError>;
}
