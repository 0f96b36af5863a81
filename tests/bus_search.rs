//! Route search: substring matching over active buses, the inactive-bus
//! exclusion, and the display-only placeholder ranges.

mod common;

use common::*;
use ebus::backend::{collections, DocumentStore};
use ebus::console::roles::Role;
use ebus::console::search::{search_active_buses, DEFAULT_CAPACITY};

#[tokio::test]
async fn partial_lowercase_queries_match_active_buses() {
    let backend = new_backend();
    let dev = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    seed_bus(&backend, &dev, "KA-01-1111", "Delhi Central", "Mumbai Station", true).await;

    let hits = search_active_buses(backend.as_ref(), "delhi", "mumbai")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bus.bus_number, "KA-01-1111");

    // Queries are trimmed and case-folded before matching
    let padded = search_active_buses(backend.as_ref(), "  DELHI ", " Mumbai")
        .await
        .unwrap();
    assert_eq!(padded.len(), 1);
}

#[tokio::test]
async fn inactive_buses_are_excluded_even_when_the_route_matches() {
    let backend = new_backend();
    let dev = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    seed_bus(&backend, &dev, "KA-01-1111", "Delhi Central", "Mumbai Station", false).await;

    let hits = search_active_buses(backend.as_ref(), "delhi", "mumbai")
        .await
        .unwrap();
    assert!(hits.is_empty(), "inactive buses never appear in results");
}

#[tokio::test]
async fn both_route_ends_must_match() {
    let backend = new_backend();
    let dev = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    seed_bus(&backend, &dev, "KA-01-1111", "Delhi Central", "Mumbai Station", true).await;
    seed_bus(&backend, &dev, "KA-01-2222", "Delhi Central", "Goa Junction", true).await;

    // Source matches both buses, destination narrows it to one
    let hits = search_active_buses(backend.as_ref(), "delhi", "goa")
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bus.bus_number, "KA-01-2222");

    let none = search_active_buses(backend.as_ref(), "delhi", "chennai")
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn placeholders_stay_in_their_display_ranges() {
    let backend = new_backend();
    let dev = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    seed_bus(&backend, &dev, "KA-01-1111", "Delhi Central", "Mumbai Station", true).await;

    // Randomized per search; the bounds must hold on every run
    for _ in 0..20 {
        let before = chrono::Local::now();
        let hits = search_active_buses(backend.as_ref(), "delhi", "mumbai")
            .await
            .unwrap();
        let hit = &hits[0];
        assert_eq!(hit.seat_capacity, 40, "capacity comes from the record");
        assert!(hit.available_seats < hit.seat_capacity);
        assert!(hit.estimated_arrival >= before);
        assert!(hit.estimated_arrival <= before + chrono::Duration::minutes(61));
    }
}

#[tokio::test]
async fn zero_capacity_records_fall_back_to_the_default() {
    let backend = new_backend();
    // Written directly: the bus form would have rejected capacity 0
    let doc = serde_json::json!({
        "busNumber": "KA-09-0000",
        "route": "NH48",
        "source": "Delhi Central",
        "destination": "Mumbai Station",
        "departureTime": "08:00",
        "arrivalTime": "14:30",
        "fare": 450.0,
        "capacity": 0,
        "driverId": "legacy",
        "driverName": "Legacy Driver",
        "driverEmail": "legacy@example.com",
        "isActive": true,
    });
    backend
        .put(
            collections::BUSES,
            "legacy-bus",
            doc.as_object().cloned().unwrap(),
        )
        .await
        .unwrap();

    let hits = search_active_buses(backend.as_ref(), "delhi", "mumbai")
        .await
        .unwrap();
    assert_eq!(hits[0].seat_capacity, DEFAULT_CAPACITY);
    assert!(hits[0].available_seats < DEFAULT_CAPACITY);
}

#[tokio::test]
async fn empty_route_ends_are_rejected_before_the_backend() {
    let backend = new_backend();
    backend.break_collection(collections::BUSES);
    let mut app = new_app(&backend);
    app.start().await;

    // The broken collection is never touched; validation fires first
    assert!(!app.search("", "mumbai").await);
    assert!(!app.search("delhi", "   ").await);
    assert!(app
        .active_notices()
        .iter()
        .any(|n| n.message == "Please enter both source and destination"));
    assert!(app.last_results().is_none());
}

#[tokio::test]
async fn search_failures_surface_the_wrapped_store_error() {
    let backend = new_backend();
    backend.break_collection(collections::BUSES);
    let mut app = new_app(&backend);
    app.start().await;

    assert!(!app.search("delhi", "mumbai").await);
    assert!(app
        .active_notices()
        .iter()
        .any(|n| n.message.starts_with("Error searching buses: ")));
}

#[tokio::test]
async fn empty_results_render_the_no_buses_block() {
    let backend = new_backend();
    let mut app = new_app(&backend);
    app.start().await;
    app.navigate(ebus::console::router::Page::Search).await;

    assert!(app.search("delhi", "mumbai").await);
    let page = app.render();
    assert!(page.contains("No buses found"));
    assert!(page.contains("Try adjusting your search criteria"));
}

#[tokio::test]
async fn results_render_with_booking_hint_and_stub_reply() {
    let backend = new_backend();
    let dev = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    seed_bus(&backend, &dev, "KA-01-1111", "Delhi Central", "Mumbai Station", true).await;
    let mut app = new_app(&backend);
    app.start().await;
    app.navigate(ebus::console::router::Page::Search).await;

    assert!(app.search("delhi", "mumbai").await);
    let page = app.render();
    assert!(page.contains("KA-01-1111"));
    assert!(page.contains("Delhi Central → Mumbai Station"));
    assert!(page.contains("Available Seats:"));

    // Booking is a stub either by result index or raw id
    assert_eq!(
        app.book("1"),
        "Booking feature will be implemented in the next version!"
    );
    assert_eq!(
        app.book("some-raw-id"),
        "Booking feature will be implemented in the next version!"
    );
}
