use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::accounts::domain::UserId;
use crate::marketplace::availability::{DateRange, StayTerms};

/// Identifier wrapper for published listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub i64);

/// Where the unit sits. Coordinates are optional; intake only collects
/// them when the host pins the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub state: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A photo already pushed to the media backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPhoto {
    pub asset_id: String,
    pub url: String,
}

/// A published unit, including its blackout calendar and photo set. The
/// children live inside the aggregate, so retiring a listing drops them
/// with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub host_id: UserId,
    pub title: String,
    pub entire_unit: bool,
    pub rooms: u32,
    pub washrooms: u32,
    pub capacity: u32,
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: f64,
    pub is_always_available: bool,
    pub photos: Vec<ListingPhoto>,
    pub blackouts: Vec<DateRange>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    /// Bookability inputs for the availability rules, paired with the spans
    /// of this listing's confirmed bookings.
    pub fn stay_terms<'a>(&'a self, booked: &'a [DateRange]) -> StayTerms<'a> {
        StayTerms {
            capacity: self.capacity,
            price_per_night: self.price_per_night,
            is_always_available: self.is_always_available,
            blackouts: &self.blackouts,
            booked,
        }
    }

    /// Card-sized projection used by search results and the host dashboard.
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id,
            title: self.title.clone(),
            rooms: self.rooms,
            washrooms: self.washrooms,
            capacity: self.capacity,
            price_per_night: self.price_per_night,
            location_state: self.location.state.clone(),
            location_country: self.location.country.clone(),
            cover_photo: self.photos.first().map(|photo| photo.url.clone()),
        }
    }
}

/// Search-result card: the subset of fields the browse surfaces need, plus
/// the first photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: ListingId,
    pub title: String,
    pub rooms: u32,
    pub washrooms: u32,
    pub capacity: u32,
    pub price_per_night: f64,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub cover_photo: Option<String>,
}

/// Host-supplied description of a new unit, before photos are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub entire_unit: bool,
    pub rooms: u32,
    pub washrooms: u32,
    pub capacity: u32,
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: f64,
    pub blackouts: Vec<DateRange>,
}

impl ListingDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingField("title"));
        }
        if self.rooms == 0 {
            return Err(DraftError::ZeroField("rooms"));
        }
        if self.washrooms == 0 {
            return Err(DraftError::ZeroField("washrooms"));
        }
        if self.capacity == 0 {
            return Err(DraftError::ZeroField("capacity"));
        }
        if !self.price_per_night.is_finite() || self.price_per_night <= 0.0 {
            return Err(DraftError::InvalidPrice);
        }
        Ok(())
    }
}

/// Validation failures for listing drafts and revisions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be at least 1")]
    ZeroField(&'static str),
    #[error("price per night must be a positive amount")]
    InvalidPrice,
}

/// Insert payload handed to the listing repository; the store assigns the
/// identifier and creation stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub host_id: UserId,
    pub title: String,
    pub entire_unit: bool,
    pub rooms: u32,
    pub washrooms: u32,
    pub capacity: u32,
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: f64,
    pub is_always_available: bool,
    pub photos: Vec<ListingPhoto>,
    pub blackouts: Vec<DateRange>,
}

/// Partial revision of a listing. `None` leaves a field untouched;
/// replacing the blackout set also re-derives the always-available flag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub entire_unit: Option<bool>,
    pub rooms: Option<u32>,
    pub washrooms: Option<u32>,
    pub capacity: Option<u32>,
    pub description: Option<String>,
    pub price_per_night: Option<f64>,
    pub blackouts: Option<Vec<DateRange>>,
}

impl ListingUpdate {
    pub fn apply(self, listing: &mut Listing) {
        if let Some(title) = self.title {
            listing.title = title;
        }
        if let Some(entire_unit) = self.entire_unit {
            listing.entire_unit = entire_unit;
        }
        if let Some(rooms) = self.rooms {
            listing.rooms = rooms;
        }
        if let Some(washrooms) = self.washrooms {
            listing.washrooms = washrooms;
        }
        if let Some(capacity) = self.capacity {
            listing.capacity = capacity;
        }
        if let Some(description) = self.description {
            listing.description = Some(description);
        }
        if let Some(price) = self.price_per_night {
            listing.price_per_night = price;
        }
        if let Some(blackouts) = self.blackouts {
            listing.is_always_available = blackouts.is_empty();
            listing.blackouts = blackouts;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            title: "Lakeside A-frame".to_string(),
            entire_unit: true,
            rooms: 2,
            washrooms: 1,
            capacity: 4,
            description: None,
            location: Location::default(),
            price_per_night: 120.0,
            blackouts: Vec::new(),
        }
    }

    #[test]
    fn draft_requires_title_and_positive_counts() {
        assert!(draft().validate().is_ok());

        let mut blank = draft();
        blank.title = "  ".to_string();
        assert_eq!(blank.validate(), Err(DraftError::MissingField("title")));

        let mut empty = draft();
        empty.capacity = 0;
        assert_eq!(empty.validate(), Err(DraftError::ZeroField("capacity")));

        let mut free = draft();
        free.price_per_night = 0.0;
        assert_eq!(free.validate(), Err(DraftError::InvalidPrice));
    }

    #[test]
    fn update_rederives_always_available_from_blackouts() {
        let mut listing = Listing {
            id: ListingId(1),
            host_id: UserId(7),
            title: "Cabin".to_string(),
            entire_unit: true,
            rooms: 1,
            washrooms: 1,
            capacity: 2,
            description: None,
            location: Location::default(),
            price_per_night: 90.0,
            is_always_available: true,
            photos: Vec::new(),
            blackouts: Vec::new(),
            created_at: Utc::now(),
        };

        let blackout = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid"),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid"),
        )
        .expect("ordered");
        ListingUpdate {
            blackouts: Some(vec![blackout]),
            ..ListingUpdate::default()
        }
        .apply(&mut listing);
        assert!(!listing.is_always_available);

        ListingUpdate {
            blackouts: Some(Vec::new()),
            ..ListingUpdate::default()
        }
        .apply(&mut listing);
        assert!(listing.is_always_available);
    }
}
