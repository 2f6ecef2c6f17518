use crate::marketplace::availability::DateRange;

use super::domain::Listing;

/// Structural search criteria plus an optional requested stay window. The
/// window is only populated when the caller supplied both dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub place: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub rooms: Option<u32>,
    pub guests: Option<u32>,
    pub stay: Option<DateRange>,
}

impl SearchFilters {
    /// Case-insensitive match against everything except the stay window,
    /// which needs booking data and is applied by the catalog service.
    pub fn matches_profile(&self, listing: &Listing) -> bool {
        if let Some(place) = &self.place {
            let needle = place.to_lowercase();
            let hit = [&listing.location.state, &listing.location.country]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if listing.price_per_night < min_price {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if listing.price_per_night > max_price {
                return false;
            }
        }
        if let Some(rooms) = self.rooms {
            if listing.rooms < rooms {
                return false;
            }
        }
        if let Some(guests) = self.guests {
            if listing.capacity < guests {
                return false;
            }
        }
        true
    }
}
