use std::sync::Arc;

use tracing::info;

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::accounts::repository::UserRepository;
use crate::marketplace::availability::is_open_for;
use crate::marketplace::bookings::repository::BookingRepository;
use crate::marketplace::media::{MediaError, MediaGateway, PhotoUpload};
use crate::marketplace::RepositoryError;

use super::domain::{
    DraftError, Listing, ListingDraft, ListingId, ListingPhoto, ListingSummary, ListingUpdate,
    NewListing,
};
use super::repository::ListingRepository;
use super::search::SearchFilters;

/// Public read side of the catalog: browse/search and listing detail.
pub struct CatalogService<L, B> {
    listings: Arc<L>,
    bookings: Arc<B>,
}

impl<L, B> CatalogService<L, B>
where
    L: ListingRepository + 'static,
    B: BookingRepository + 'static,
{
    pub fn new(listings: Arc<L>, bookings: Arc<B>) -> Self {
        Self { listings, bookings }
    }

    /// Search the catalog. Structural filters are delegated to the store;
    /// when a stay window is present, each candidate is gated through the
    /// same availability predicate the booking path uses.
    pub fn search(&self, filters: &SearchFilters) -> Result<Vec<ListingSummary>, ListingError> {
        let candidates = self.listings.filter(filters)?;
        let mut results = Vec::with_capacity(candidates.len());
        for listing in candidates {
            if let Some(span) = filters.stay {
                let booked = self.bookings.booked_spans(listing.id)?;
                if !is_open_for(&listing.stay_terms(&booked), span) {
                    continue;
                }
            }
            results.push(listing.summary());
        }
        Ok(results)
    }

    pub fn detail(&self, id: ListingId) -> Result<Listing, ListingError> {
        self.listings.fetch(id)?.ok_or(ListingError::NotFound)
    }
}

/// Host-facing side: publishing, revising, and retiring listings. Photo
/// bytes go through the media gateway before the aggregate is stored.
pub struct HostService<L, U, M> {
    listings: Arc<L>,
    users: Arc<U>,
    media: Arc<M>,
}

impl<L, U, M> HostService<L, U, M>
where
    L: ListingRepository + 'static,
    U: UserRepository + 'static,
    M: MediaGateway + 'static,
{
    pub fn new(listings: Arc<L>, users: Arc<U>, media: Arc<M>) -> Self {
        Self {
            listings,
            users,
            media,
        }
    }

    /// Publish a new listing: host check, draft validation, photo upload,
    /// insert. An empty blackout set marks the listing always-available,
    /// matching how hosts express "no closed dates" at intake.
    pub async fn publish(
        &self,
        host_id: UserId,
        draft: ListingDraft,
        photos: Vec<PhotoUpload>,
    ) -> Result<Listing, ListingError> {
        self.require_host(host_id)?;
        draft.validate()?;

        let mut stored = Vec::with_capacity(photos.len());
        for upload in photos {
            let photo = self.media.store_photo(upload).await?;
            stored.push(ListingPhoto {
                asset_id: photo.asset_id,
                url: photo.public_url,
            });
        }

        let is_always_available = draft.blackouts.is_empty();
        let listing = self.listings.insert(NewListing {
            host_id,
            title: draft.title,
            entire_unit: draft.entire_unit,
            rooms: draft.rooms,
            washrooms: draft.washrooms,
            capacity: draft.capacity,
            description: draft.description,
            location: draft.location,
            price_per_night: draft.price_per_night,
            is_always_available,
            photos: stored,
            blackouts: draft.blackouts,
        })?;

        info!(
            listing = listing.id.0,
            host = host_id.0,
            photos = listing.photos.len(),
            "listing published"
        );
        Ok(listing)
    }

    pub fn host_listings(&self, host_id: UserId) -> Result<Vec<ListingSummary>, ListingError> {
        self.require_host(host_id)?;
        let listings = self.listings.for_host(host_id)?;
        Ok(listings.iter().map(Listing::summary).collect())
    }

    /// Apply a partial revision. Only the owning host may touch a listing,
    /// and the revised aggregate must still pass draft validation.
    pub fn revise(
        &self,
        host_id: UserId,
        listing_id: ListingId,
        update: ListingUpdate,
    ) -> Result<Listing, ListingError> {
        let mut listing = self.owned_listing(host_id, listing_id)?;
        update.apply(&mut listing);

        let revised = ListingDraft {
            title: listing.title.clone(),
            entire_unit: listing.entire_unit,
            rooms: listing.rooms,
            washrooms: listing.washrooms,
            capacity: listing.capacity,
            description: listing.description.clone(),
            location: listing.location.clone(),
            price_per_night: listing.price_per_night,
            blackouts: listing.blackouts.clone(),
        };
        revised.validate()?;

        self.listings.update(listing.clone())?;
        info!(listing = listing.id.0, host = host_id.0, "listing revised");
        Ok(listing)
    }

    /// Retire a listing. Photos and blackout ranges live inside the
    /// aggregate, so removal drops them with it.
    pub fn retire(&self, host_id: UserId, listing_id: ListingId) -> Result<(), ListingError> {
        let listing = self.owned_listing(host_id, listing_id)?;
        self.listings.remove(listing.id)?;
        info!(listing = listing.id.0, host = host_id.0, "listing retired");
        Ok(())
    }

    fn require_host(&self, host_id: UserId) -> Result<(), ListingError> {
        let user = self
            .users
            .fetch(host_id)?
            .ok_or(ListingError::UnknownUser)?;
        if !user.is_host {
            return Err(ListingError::NotAHost);
        }
        Ok(())
    }

    fn owned_listing(
        &self,
        host_id: UserId,
        listing_id: ListingId,
    ) -> Result<Listing, ListingError> {
        self.require_host(host_id)?;
        let listing = self
            .listings
            .fetch(listing_id)?
            .ok_or(ListingError::NotFound)?;
        if listing.host_id != host_id {
            return Err(ListingError::NotListingOwner);
        }
        Ok(listing)
    }
}

/// Error raised by the catalog and host services.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("listing not found")]
    NotFound,
    #[error("user not found")]
    UnknownUser,
    #[error("only approved hosts can manage listings")]
    NotAHost,
    #[error("listing belongs to another host")]
    NotListingOwner,
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
