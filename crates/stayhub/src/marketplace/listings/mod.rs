//! Listing aggregate, search filters, and the catalog/host services.

pub mod domain;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;

pub use domain::{
    DraftError, Listing, ListingDraft, ListingId, ListingPhoto, ListingSummary, ListingUpdate,
    Location, NewListing,
};
pub use repository::ListingRepository;
pub use router::{catalog_router, host_router};
pub use search::SearchFilters;
pub use service::{CatalogService, HostService, ListingError};
