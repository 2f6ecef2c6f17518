mod common;

use common::{approved_host, date, marketplace, range, sample_draft, signed_up_guest};
use stayhub::marketplace::listings::domain::{DraftError, ListingUpdate};
use stayhub::marketplace::listings::service::ListingError;
use stayhub::marketplace::media::PhotoUpload;

fn photo(name: &str) -> PhotoUpload {
    PhotoUpload {
        file_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        content: vec![0xff, 0xd8, 0xff],
    }
}

#[tokio::test]
async fn publishing_uploads_photos_and_keeps_their_order() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");

    let listing = market
        .host_desk
        .publish(
            host.id,
            sample_draft(Vec::new()),
            vec![photo("front.jpg"), photo("kitchen.jpg")],
        )
        .await
        .expect("listing published");

    assert_eq!(listing.photos.len(), 2);
    assert!(listing.photos[0].url.ends_with("front.jpg"));
    assert!(listing.photos[1].url.ends_with("kitchen.jpg"));
    assert_eq!(listing.summary().cover_photo, Some(listing.photos[0].url.clone()));

    let uploads = market.media.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].file_name, "front.jpg");
}

#[tokio::test]
async fn empty_blackout_set_means_always_available() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");

    let open = market
        .host_desk
        .publish(host.id, sample_draft(Vec::new()), Vec::new())
        .await
        .expect("published");
    assert!(open.is_always_available);

    let blackout = range(date(2025, 11, 1), date(2025, 11, 3));
    let seasonal = market
        .host_desk
        .publish(host.id, sample_draft(vec![blackout]), Vec::new())
        .await
        .expect("published");
    assert!(!seasonal.is_always_available);
}

#[tokio::test]
async fn non_hosts_cannot_publish() {
    let market = marketplace();
    let guest = signed_up_guest(&market, "guest@example.com");

    let err = market
        .host_desk
        .publish(guest.id, sample_draft(Vec::new()), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::NotAHost));
    assert!(market.media.uploads().is_empty());
}

#[tokio::test]
async fn drafts_are_validated_before_any_upload() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");

    let mut draft = sample_draft(Vec::new());
    draft.capacity = 0;
    let err = market
        .host_desk
        .publish(host.id, draft, vec![photo("front.jpg")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ListingError::Draft(DraftError::ZeroField("capacity"))
    ));
    assert!(market.media.uploads().is_empty());
}

#[tokio::test]
async fn only_the_owner_can_revise_or_retire() {
    let market = marketplace();
    let owner = approved_host(&market, "owner@example.com");
    let rival = approved_host(&market, "rival@example.com");

    let listing = market
        .host_desk
        .publish(owner.id, sample_draft(Vec::new()), Vec::new())
        .await
        .expect("published");

    let revise = market.host_desk.revise(
        rival.id,
        listing.id,
        ListingUpdate {
            title: Some("Hijacked".to_string()),
            ..ListingUpdate::default()
        },
    );
    assert!(matches!(
        revise.unwrap_err(),
        ListingError::NotListingOwner
    ));

    let retire = market.host_desk.retire(rival.id, listing.id);
    assert!(matches!(retire.unwrap_err(), ListingError::NotListingOwner));

    // The owner can do both.
    let revised = market
        .host_desk
        .revise(
            owner.id,
            listing.id,
            ListingUpdate {
                price_per_night: Some(130.0),
                ..ListingUpdate::default()
            },
        )
        .expect("owner revises");
    assert_eq!(revised.price_per_night, 130.0);

    market
        .host_desk
        .retire(owner.id, listing.id)
        .expect("owner retires");
    assert!(market
        .catalog
        .search(&Default::default())
        .expect("search runs")
        .is_empty());
}

#[tokio::test]
async fn revisions_must_still_validate() {
    let market = marketplace();
    let host = approved_host(&market, "host@example.com");
    let listing = market
        .host_desk
        .publish(host.id, sample_draft(Vec::new()), Vec::new())
        .await
        .expect("published");

    let err = market
        .host_desk
        .revise(
            host.id,
            listing.id,
            ListingUpdate {
                price_per_night: Some(-5.0),
                ..ListingUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ListingError::Draft(DraftError::InvalidPrice)));

    // The stored listing is untouched.
    let detail = market.catalog.detail(listing.id).expect("detail loads");
    assert_eq!(detail.price_per_night, 100.0);
}

#[tokio::test]
async fn host_dashboard_lists_only_their_listings() {
    let market = marketplace();
    let first = approved_host(&market, "first@example.com");
    let second = approved_host(&market, "second@example.com");

    market
        .host_desk
        .publish(first.id, sample_draft(Vec::new()), Vec::new())
        .await
        .expect("published");
    let mut other = sample_draft(Vec::new());
    other.title = "City studio".to_string();
    market
        .host_desk
        .publish(second.id, other, Vec::new())
        .await
        .expect("published");

    let mine = market
        .host_desk
        .host_listings(first.id)
        .expect("dashboard loads");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Harbourside loft");
}
