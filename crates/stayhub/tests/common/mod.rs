#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use stayhub::marketplace::accounts::domain::{
    HostApplication, HostApplicationId, HostApplicationRequest, HostApplicationStatus,
    NewHostApplication, NewUser, SignupRequest, User, UserId, UserProfile,
};
use stayhub::marketplace::accounts::google::{GoogleProfile, IdentityError, IdentityGateway};
use stayhub::marketplace::accounts::repository::{HostApplicationRepository, UserRepository};
use stayhub::marketplace::accounts::service::AccountService;
use stayhub::marketplace::accounts::sessions::SessionSigner;
use stayhub::marketplace::availability::DateRange;
use stayhub::marketplace::bookings::domain::{Booking, BookingId, NewBooking};
use stayhub::marketplace::bookings::repository::{BookingRepository, ReservationError};
use stayhub::marketplace::bookings::service::BookingService;
use stayhub::marketplace::listings::domain::{
    Listing, ListingDraft, ListingId, Location, NewListing,
};
use stayhub::marketplace::listings::repository::ListingRepository;
use stayhub::marketplace::listings::search::SearchFilters;
use stayhub::marketplace::listings::service::{CatalogService, HostService};
use stayhub::marketplace::media::{MediaError, MediaGateway, PhotoUpload, StoredPhoto};
use stayhub::marketplace::RepositoryError;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end).expect("ordered range")
}

#[derive(Default)]
pub struct MemoryListings {
    listings: Mutex<HashMap<ListingId, Listing>>,
    sequence: AtomicI64,
}

impl ListingRepository for MemoryListings {
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
pub struct MemoryBookings {
    bookings: Mutex<Vec<Booking>>,
    sequence: AtomicI64,
}

impl BookingRepository for MemoryBookings {
    fn reserve(&self, booking: NewBooking) -> Result<Booking, ReservationError> {
        let mut guard = self.bookings.lock().expect("booking mutex poisoned");
        let span = booking.span();
        if guard
            .iter()
            .filter(|existing| existing.listing_id == booking.listing_id)
            .any(|existing| existing.span().overlaps(&span))
        {
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
pub struct MemoryUsers {
    users: Mutex<HashMap<UserId, User>>,
    sequence: AtomicI64,
}

impl UserRepository for MemoryUsers {
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
pub struct MemoryApplications {
    applications: Mutex<HashMap<HostApplicationId, HostApplication>>,
    sequence: AtomicI64,
}

impl HostApplicationRepository for MemoryApplications {
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

/// Media gateway double that records every upload.
#[derive(Debug, Default)]
pub struct FakeMediaGateway {
    uploads: Mutex<Vec<PhotoUpload>>,
    sequence: AtomicI64,
}

impl FakeMediaGateway {
    pub fn uploads(&self) -> Vec<PhotoUpload> {
        self.uploads.lock().expect("media mutex poisoned").clone()
    }
}

#[async_trait]
impl MediaGateway for FakeMediaGateway {
    async fn store_photo(&self, upload: PhotoUpload) -> Result<StoredPhoto, MediaError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let asset_id = format!("fake-{id}");
        let public_url = format!("https://photos.test/{asset_id}/{}", upload.file_name);
        self.uploads
            .lock()
            .expect("media mutex poisoned")
            .push(upload);
        Ok(StoredPhoto {
            asset_id,
            public_url,
        })
    }
}

/// Identity gateway double returning a preconfigured profile.
#[derive(Debug, Default)]
pub struct FakeIdentityGateway {
    profile: Mutex<Option<GoogleProfile>>,
}

impl FakeIdentityGateway {
    pub fn set_profile(&self, profile: GoogleProfile) {
        *self.profile.lock().expect("identity mutex poisoned") = Some(profile);
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    async fn exchange_code(&self, _code: &str) -> Result<GoogleProfile, IdentityError> {
        self.profile
            .lock()
            .expect("identity mutex poisoned")
            .clone()
            .ok_or_else(|| IdentityError::Exchange("no profile configured".to_string()))
    }
}

/// The full marketplace wired against in-memory collaborators.
pub struct TestMarketplace {
    pub users: Arc<MemoryUsers>,
    pub applications: Arc<MemoryApplications>,
    pub listings: Arc<MemoryListings>,
    pub booking_store: Arc<MemoryBookings>,
    pub media: Arc<FakeMediaGateway>,
    pub identity: Arc<FakeIdentityGateway>,
    pub sessions: Arc<SessionSigner>,
    pub accounts: AccountService<MemoryUsers, MemoryApplications, FakeIdentityGateway>,
    pub host_desk: HostService<MemoryListings, MemoryUsers, FakeMediaGateway>,
    pub catalog: CatalogService<MemoryListings, MemoryBookings>,
    pub booking_desk: BookingService<MemoryListings, MemoryBookings>,
}

pub fn marketplace() -> TestMarketplace {
    let users = Arc::new(MemoryUsers::default());
    let applications = Arc::new(MemoryApplications::default());
    let listings = Arc::new(MemoryListings::default());
    let booking_store = Arc::new(MemoryBookings::default());
    let media = Arc::new(FakeMediaGateway::default());
    let identity = Arc::new(FakeIdentityGateway::default());
    let sessions = Arc::new(SessionSigner::new("integration-test-secret", 24));

    let accounts = AccountService::new(
        users.clone(),
        applications.clone(),
        identity.clone(),
        sessions.clone(),
    );
    let host_desk = HostService::new(listings.clone(), users.clone(), media.clone());
    let catalog = CatalogService::new(listings.clone(), booking_store.clone());
    let booking_desk = BookingService::new(listings.clone(), booking_store.clone());

    TestMarketplace {
        users,
        applications,
        listings,
        booking_store,
        media,
        identity,
        sessions,
        accounts,
        host_desk,
        catalog,
        booking_desk,
    }
}

/// Sign up a user and walk them through host approval.
pub fn approved_host(market: &TestMarketplace, email: &str) -> UserProfile {
    let session = market
        .accounts
        .sign_up(SignupRequest {
            email: email.to_string(),
            password: "long enough password".to_string(),
            name: "Host".to_string(),
        })
        .expect("host signs up");
    market
        .accounts
        .apply_for_hosting(
            session.profile.id,
            HostApplicationRequest {
                full_name: "Test Host".to_string(),
                contact_info: email.to_string(),
                bank_name: "Test Bank".to_string(),
                bank_account: "000-111".to_string(),
            },
        )
        .expect("application submitted");
    market
        .accounts
        .review_application(session.profile.id, true)
        .expect("application approved");
    market
        .accounts
        .profile(session.profile.id)
        .expect("refreshed profile")
}

pub fn signed_up_guest(market: &TestMarketplace, email: &str) -> UserProfile {
    market
        .accounts
        .sign_up(SignupRequest {
            email: email.to_string(),
            password: "long enough password".to_string(),
            name: "Guest".to_string(),
        })
        .expect("guest signs up")
        .profile
}

pub fn sample_draft(blackouts: Vec<DateRange>) -> ListingDraft {
    ListingDraft {
        title: "Harbourside loft".to_string(),
        entire_unit: true,
        rooms: 2,
        washrooms: 1,
        capacity: 4,
        description: Some("Bright loft near the ferry.".to_string()),
        location: Location {
            state: Some("Nova Scotia".to_string()),
            country: Some("Canada".to_string()),
            latitude: None,
            longitude: None,
        },
        price_per_night: 100.0,
        blackouts,
    }
}

pub async fn published_listing(
    market: &TestMarketplace,
    host: UserId,
    blackouts: Vec<DateRange>,
) -> Listing {
    market
        .host_desk
        .publish(host, sample_draft(blackouts), Vec::new())
        .await
        .expect("listing published")
}
