//! Bus search.
//!
//! Matching is case-insensitive substring containment on both ends of the
//! route, restricted to active buses. Arrival estimates and seat counts are
//! display-only placeholders until live tracking and seat inventory exist;
//! they are randomized fresh on every search.

use chrono::{DateTime, Duration, Local};
use log::info;
use rand::Rng;
use serde_json::json;

use crate::backend::collections;
use crate::backend::documents::{from_document, DocumentStore, StoreError};
use crate::logbuffer;
use crate::models::BusRecord;

/// Seat capacity assumed for listings whose record carries none.
pub const DEFAULT_CAPACITY: u32 = 40;

/// One search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub bus: BusRecord,
    pub estimated_arrival: DateTime<Local>,
    pub available_seats: u32,
    pub seat_capacity: u32,
}

/// Search active buses whose source and destination both contain the given
/// fragments. Inputs are trimmed and lowercased here; callers validate
/// non-emptiness first.
pub async fn search_active_buses(
    store: &dyn DocumentStore,
    source: &str,
    destination: &str,
) -> Result<Vec<SearchHit>, StoreError> {
    let source = source.trim().to_lowercase();
    let destination = destination.trim().to_lowercase();
    let rows = store
        .query_eq(collections::BUSES, "isActive", json!(true))
        .await?;

    let now = Local::now();
    let mut rng = rand::thread_rng();
    let mut hits = Vec::new();
    for (id, doc) in rows {
        let bus: BusRecord = match from_document(doc) {
            Ok(bus) => bus,
            Err(e) => {
                logbuffer::warning("search", &format!("skipping unreadable bus {}: {}", id, e));
                continue;
            }
        };
        if bus.source.to_lowercase().contains(&source)
            && bus.destination.to_lowercase().contains(&destination)
        {
            let seat_capacity = if bus.capacity == 0 {
                DEFAULT_CAPACITY
            } else {
                bus.capacity
            };
            hits.push(SearchHit {
                id,
                estimated_arrival: now + Duration::minutes(rng.gen_range(0i64..60)),
                available_seats: rng.gen_range(0..seat_capacity),
                seat_capacity,
                bus,
            });
        }
    }
    info!("Bus search completed: {} matches", hits.len());
    Ok(hits)
}

/// Booking is not built yet; the button records intent and says so.
pub fn book_bus(bus_id: &str) -> &'static str {
    info!("Booking requested for bus {}", logbuffer::escape_line(bus_id));
    "Booking feature will be implemented in the next version!"
}
