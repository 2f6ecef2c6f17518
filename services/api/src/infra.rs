use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use stayhub::marketplace::accounts::domain::{
    HostApplication, HostApplicationId, HostApplicationStatus, NewHostApplication, NewUser, User,
    UserId,
};
use stayhub::marketplace::accounts::repository::{HostApplicationRepository, UserRepository};
use stayhub::marketplace::availability::DateRange;
use stayhub::marketplace::bookings::domain::{Booking, BookingId, NewBooking};
use stayhub::marketplace::bookings::repository::{BookingRepository, ReservationError};
use stayhub::marketplace::listings::domain::{Listing, ListingId, NewListing};
use stayhub::marketplace::listings::repository::ListingRepository;
use stayhub::marketplace::listings::search::SearchFilters;
use stayhub::marketplace::media::{MediaError, MediaGateway, PhotoUpload, StoredPhoto};
use stayhub::marketplace::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryListingRepository {
    listings: Mutex<HashMap<ListingId, Listing>>,
    sequence: AtomicI64,
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, listing: NewListing) -> Result<Listing, RepositoryError> {
        let id = ListingId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = Listing {
            id,
            host_id: listing.host_id,
            title: listing.title,
            entire_unit: listing.entire_unit,
            rooms: listing.rooms,
            washrooms: listing.washrooms,
            capacity: listing.capacity,
            description: listing.description,
            location: listing.location,
            price_per_night: listing.price_per_night,
            is_always_available: listing.is_always_available,
            photos: listing.photos,
            blackouts: listing.blackouts,
            created_at: Utc::now(),
        };
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, listing: Listing) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        if !guard.contains_key(&listing.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(listing.id, listing);
        Ok(())
    }

    fn fetch(&self, id: ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn remove(&self, id: ListingId) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("listing mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn for_host(&self, host_id: UserId) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        let mut listings: Vec<Listing> = guard
            .values()
            .filter(|listing| listing.host_id == host_id)
            .cloned()
            .collect();
        listings.sort_by_key(|listing| listing.id);
        Ok(listings)
    }

    fn filter(&self, filters: &SearchFilters) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("listing mutex poisoned");
        let mut listings: Vec<Listing> = guard
            .values()
            .filter(|listing| filters.matches_profile(listing))
            .cloned()
            .collect();
        listings.sort_by_key(|listing| listing.id);
        Ok(listings)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
    sequence: AtomicI64,
}

impl BookingRepository for InMemoryBookingRepository {
    fn reserve(&self, booking: NewBooking) -> Result<Booking, ReservationError> {
        // One lock across the conflict check and the insert: overlapping
        // reservations cannot interleave.
        let mut guard = self.bookings.lock().expect("booking mutex poisoned");
        let span = booking.span();
        let conflict = guard
            .iter()
            .filter(|existing| existing.listing_id == booking.listing_id)
            .any(|existing| existing.span().overlaps(&span));
        if conflict {
            return Err(ReservationError::SpanConflict);
        }

        let stored = Booking {
            id: BookingId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1),
            guest_id: booking.guest_id,
            listing_id: booking.listing_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: booking.guests,
            total_price: booking.total_price,
            created_at: Utc::now(),
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    fn booked_spans(&self, listing_id: ListingId) -> Result<Vec<DateRange>, RepositoryError> {
        let guard = self.bookings.lock().expect("booking mutex poisoned");
        Ok(guard
            .iter()
            .filter(|booking| booking.listing_id == listing_id)
            .map(Booking::span)
            .collect())
    }

    fn for_guest(&self, guest_id: UserId) -> Result<Vec<Booking>, RepositoryError> {
        let guard = self.bookings.lock().expect("booking mutex poisoned");
        Ok(guard
            .iter()
            .filter(|booking| booking.guest_id == guest_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
    sequence: AtomicI64,
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        if guard.values().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let id = UserId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = User {
            id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            google_id: user.google_id,
            is_host: false,
            created_at: Utc::now(),
        };
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.values().find(|user| user.email == email).cloned())
    }

    fn link_google_identity(&self, id: UserId, google_id: &str) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        let user = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        user.google_id = Some(google_id.to_string());
        Ok(())
    }

    fn promote_to_host(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        let user = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        user.is_host = true;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryHostApplicationRepository {
    applications: Mutex<HashMap<HostApplicationId, HostApplication>>,
    sequence: AtomicI64,
}

impl HostApplicationRepository for InMemoryHostApplicationRepository {
    fn insert(&self, application: NewHostApplication) -> Result<HostApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.user_id == application.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        let id = HostApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let stored = HostApplication {
            id,
            user_id: application.user_id,
            full_name: application.full_name,
            contact_info: application.contact_info,
            bank_name: application.bank_name,
            bank_account: application.bank_account,
            status: HostApplicationStatus::Pending,
            submitted_at: Utc::now(),
        };
        guard.insert(id, stored.clone());
        Ok(stored)
    }

    fn for_user(&self, user_id: UserId) -> Result<Option<HostApplication>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|application| application.user_id == user_id)
            .cloned())
    }

    fn set_status(
        &self,
        id: HostApplicationId,
        status: HostApplicationStatus,
    ) -> Result<HostApplication, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let application = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        application.status = status;
        Ok(application.clone())
    }
}

/// Media adapter for local runs: keeps photo bytes in memory and hands out
/// deterministic URLs. Production wiring swaps in the Drive-backed store
/// from the library.
#[derive(Debug, Default)]
pub(crate) struct InMemoryMediaGateway {
    photos: Mutex<Vec<PhotoUpload>>,
    sequence: AtomicI64,
}

#[async_trait]
impl MediaGateway for InMemoryMediaGateway {
    async fn store_photo(&self, upload: PhotoUpload) -> Result<StoredPhoto, MediaError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let asset_id = format!("local-{id}");
        let public_url = format!("https://media.stayhub.local/{asset_id}/{}", upload.file_name);
        let mut guard = self.photos.lock().expect("media mutex poisoned");
        guard.push(upload);
        Ok(StoredPhoto {
            asset_id,
            public_url,
        })
    }
}

/// Identity gateway for deployments without Google credentials: every
/// exchange reports the feature as unconfigured.
#[derive(Debug, Default)]
pub(crate) struct DisabledIdentityGateway;

#[async_trait]
impl stayhub::marketplace::accounts::google::IdentityGateway for DisabledIdentityGateway {
    async fn exchange_code(
        &self,
        _code: &str,
    ) -> Result<
        stayhub::marketplace::accounts::google::GoogleProfile,
        stayhub::marketplace::accounts::google::IdentityError,
    > {
        Err(stayhub::marketplace::accounts::google::IdentityError::NotConfigured)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
