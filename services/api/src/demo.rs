use crate::infra::{
    DisabledIdentityGateway, InMemoryBookingRepository, InMemoryHostApplicationRepository,
    InMemoryListingRepository, InMemoryMediaGateway, InMemoryUserRepository,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::fmt::Display;
use std::sync::Arc;
use stayhub::error::AppError;
use stayhub::marketplace::accounts::domain::{HostApplicationRequest, SignupRequest};
use stayhub::marketplace::accounts::service::AccountService;
use stayhub::marketplace::accounts::sessions::SessionSigner;
use stayhub::marketplace::availability::DateRange;
use stayhub::marketplace::bookings::domain::BookingRequest;
use stayhub::marketplace::bookings::service::BookingService;
use stayhub::marketplace::listings::domain::{ListingDraft, Location};
use stayhub::marketplace::listings::search::SearchFilters;
use stayhub::marketplace::listings::service::{CatalogService, HostService};
use stayhub::marketplace::media::PhotoUpload;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Anchor date for the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the double-booking demonstration at the end.
    #[arg(long)]
    pub(crate) skip_conflict: bool,
}

fn demo_error(err: impl Display) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}

/// Walk the whole marketplace in one process: onboarding, host approval,
/// publishing, search, booking, and the reservation guard.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let sessions = Arc::new(SessionSigner::new("stayhub-demo-secret", 24));
    let listings = Arc::new(InMemoryListingRepository::default());
    let bookings = Arc::new(InMemoryBookingRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let applications = Arc::new(InMemoryHostApplicationRepository::default());
    let media = Arc::new(InMemoryMediaGateway::default());

    let accounts = Arc::new(AccountService::new(
        users.clone(),
        applications,
        Arc::new(DisabledIdentityGateway),
        sessions,
    ));
    let host_desk = Arc::new(HostService::new(listings.clone(), users.clone(), media));
    let catalog = Arc::new(CatalogService::new(listings.clone(), bookings.clone()));
    let booking_desk = Arc::new(BookingService::new(listings, bookings));

    println!("== StayHub marketplace demo ({today}) ==\n");

    let host = accounts
        .sign_up(SignupRequest {
            email: "marta@host.example".to_string(),
            password: "harbour lights".to_string(),
            name: "Marta".to_string(),
        })
        .map_err(demo_error)?;
    let guest = accounts
        .sign_up(SignupRequest {
            email: "jonas@guest.example".to_string(),
            password: "wandering fox".to_string(),
            name: "Jonas".to_string(),
        })
        .map_err(demo_error)?;
    println!(
        "signed up host {} and guest {}",
        host.profile.email, guest.profile.email
    );

    accounts
        .apply_for_hosting(
            host.profile.id,
            HostApplicationRequest {
                full_name: "Marta Hosten".to_string(),
                contact_info: "marta@host.example".to_string(),
                bank_name: "Harbour Credit Union".to_string(),
                bank_account: "NL00 HARB 0000 1234 56".to_string(),
            },
        )
        .map_err(demo_error)?;
    let application = accounts
        .review_application(host.profile.id, true)
        .map_err(demo_error)?;
    println!("host application {}\n", application.status.label());

    let blackout = DateRange::new(today + Duration::days(10), today + Duration::days(12))
        .map_err(demo_error)?;
    let listing = host_desk
        .publish(
            host.profile.id,
            ListingDraft {
                title: "Harbourside loft with skylight".to_string(),
                entire_unit: true,
                rooms: 2,
                washrooms: 1,
                capacity: 4,
                description: Some("Top-floor loft a short walk from the ferry.".to_string()),
                location: Location {
                    state: Some("Nova Scotia".to_string()),
                    country: Some("Canada".to_string()),
                    latitude: Some(44.65),
                    longitude: Some(-63.57),
                },
                price_per_night: 100.0,
                blackouts: vec![blackout],
            },
            vec![
                PhotoUpload {
                    file_name: "loft-front.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    content: b"demo-front".to_vec(),
                },
                PhotoUpload {
                    file_name: "loft-skylight.jpg".to_string(),
                    content_type: "image/jpeg".to_string(),
                    content: b"demo-skylight".to_vec(),
                },
            ],
        )
        .await
        .map_err(demo_error)?;
    println!(
        "published listing #{} '{}' at ${}/night with {} photos",
        listing.id.0,
        listing.title,
        listing.price_per_night,
        listing.photos.len()
    );

    let window = DateRange::new(today + Duration::days(1), today + Duration::days(4))
        .map_err(demo_error)?;
    let results = catalog
        .search(&SearchFilters {
            place: Some("canada".to_string()),
            guests: Some(2),
            stay: Some(window),
            ..SearchFilters::default()
        })
        .map_err(demo_error)?;
    println!(
        "search for 2 guests in Canada over {} to {} found:",
        window.start, window.end
    );
    println!(
        "{}\n",
        serde_json::to_string_pretty(&results).map_err(demo_error)?
    );

    let request = BookingRequest {
        listing_id: listing.id,
        start_date: today + Duration::days(1),
        end_date: today + Duration::days(4),
        guests: 2,
    };
    let booking = booking_desk
        .book(guest.profile.id, &request, today)
        .map_err(demo_error)?;
    println!(
        "booked {} nights for a total of ${} (booking #{})",
        (booking.check_out - booking.check_in).num_days(),
        booking.total_price,
        booking.id.0
    );

    if !args.skip_conflict {
        match booking_desk.book(guest.profile.id, &request, today) {
            Err(err) => println!("repeat booking over the same dates refused: {err}"),
            Ok(_) => println!("repeat booking unexpectedly succeeded"),
        }
    }

    let history = booking_desk
        .bookings_for_guest(guest.profile.id)
        .map_err(demo_error)?;
    println!(
        "\nguest booking history:\n{}",
        serde_json::to_string_pretty(&history).map_err(demo_error)?
    );

    Ok(())
}
