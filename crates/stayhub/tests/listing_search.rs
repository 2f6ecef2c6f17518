mod common;

use common::{approved_host, date, marketplace, published_listing, range, sample_draft, signed_up_guest};
use stayhub::marketplace::bookings::domain::BookingRequest;
use stayhub::marketplace::listings::search::SearchFilters;
use stayhub::marketplace::listings::service::ListingError;

#[tokio::test]
async fn structural_filters_narrow_the_catalog() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");

    published_listing(&market, host.id, Vec::new()).await;

    let mut budget_draft = sample_draft(Vec::new());
    budget_draft.title = "Canal-side room".to_string();
    budget_draft.price_per_night = 40.0;
    budget_draft.capacity = 2;
    budget_draft.rooms = 1;
    budget_draft.location.state = Some("Utrecht".to_string());
    budget_draft.location.country = Some("Netherlands".to_string());
    market
        .host_desk
        .publish(host.id, budget_draft, Vec::new())
        .await
        .expect("second listing published");

    let canada = market
        .catalog
        .search(&SearchFilters {
            place: Some("canada".to_string()),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert_eq!(canada.len(), 1);
    assert_eq!(canada[0].title, "Harbourside loft");

    let cheap = market
        .catalog
        .search(&SearchFilters {
            max_price: Some(50.0),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert_eq!(cheap.len(), 1);
    assert_eq!(cheap[0].title, "Canal-side room");

    let big_party = market
        .catalog
        .search(&SearchFilters {
            guests: Some(3),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert_eq!(big_party.len(), 1);
    assert_eq!(big_party[0].capacity, 4);
}

#[tokio::test]
async fn dated_search_and_booking_agree_on_availability() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");
    let guest = signed_up_guest(&market, "guest@example.com");
    let blackout = range(date(2025, 8, 10), date(2025, 8, 12));
    let listing = published_listing(&market, host.id, vec![blackout]).await;
    let today = date(2025, 1, 1);

    let blocked_window = range(date(2025, 8, 11), date(2025, 8, 14));
    let hidden = market
        .catalog
        .search(&SearchFilters {
            stay: Some(blocked_window),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert!(hidden.is_empty());

    // The same window cannot be booked either: one semantics, two paths.
    let err = market
        .booking_desk
        .book(
            guest.id,
            &BookingRequest {
                listing_id: listing.id,
                start_date: blocked_window.start,
                end_date: blocked_window.end,
                guests: 2,
            },
            today,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        stayhub::marketplace::bookings::service::BookingError::Rejected(
            stayhub::marketplace::availability::StayRejection::DatesUnavailable
        )
    ));

    let open_window = range(date(2025, 8, 13), date(2025, 8, 16));
    let visible = market
        .catalog
        .search(&SearchFilters {
            stay: Some(open_window),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert_eq!(visible.len(), 1);
}

#[tokio::test]
async fn booked_spans_hide_listings_from_dated_search() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");
    let guest = signed_up_guest(&market, "guest@example.com");
    let listing = published_listing(&market, host.id, Vec::new()).await;
    let today = date(2025, 1, 1);

    market
        .booking_desk
        .book(
            guest.id,
            &BookingRequest {
                listing_id: listing.id,
                start_date: date(2025, 9, 1),
                end_date: date(2025, 9, 5),
                guests: 2,
            },
            today,
        )
        .expect("stay books");

    let overlapping = market
        .catalog
        .search(&SearchFilters {
            stay: Some(range(date(2025, 9, 4), date(2025, 9, 7))),
            ..SearchFilters::default()
        })
        .expect("search runs");
    assert!(overlapping.is_empty());

    let undated = market
        .catalog
        .search(&SearchFilters::default())
        .expect("search runs");
    assert_eq!(undated.len(), 1);
}

#[tokio::test]
async fn detail_returns_the_full_aggregate_or_not_found() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");
    let blackout = range(date(2025, 8, 10), date(2025, 8, 12));
    let listing = published_listing(&market, host.id, vec![blackout]).await;

    let detail = market.catalog.detail(listing.id).expect("detail loads");
    assert_eq!(detail.blackouts, vec![blackout]);
    assert!(!detail.is_always_available);

    let missing = market
        .catalog
        .detail(stayhub::marketplace::listings::domain::ListingId(999))
        .unwrap_err();
    assert!(matches!(missing, ListingError::NotFound));
}
