//! Dashboard loading.
//!
//! Exactly one panel is shown per role. The admin panel is three counters,
//! each computed by an ordered list of counting strategies; a strategy
//! failure falls through to the next, and an exhausted list renders the
//! literal `Error`. Metrics are isolated: one failing counter never blocks
//! or corrupts the others.

use log::info;
use serde_json::{json, Value};

use super::roles::Role;
use super::session::SessionContext;
use crate::backend::collections;
use crate::backend::documents::{from_document, DocumentStore, StoreError};
use crate::logbuffer;
use crate::models::BusRecord;
use crate::validation::ValidationError;

/// One admin statistic, from first render to resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Loading,
    Count(usize),
    Error,
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading..."),
            Self::Count(n) => write!(f, "{}", n),
            Self::Error => f.write_str("Error"),
        }
    }
}

/// One way of counting documents in a collection.
#[derive(Debug, Clone)]
pub enum CountStrategy {
    /// Count every document.
    Scan,
    /// Backend-filtered equality count.
    Filtered { field: &'static str, value: Value },
    /// Full scan counted client-side against the same equality.
    ScanFilter { field: &'static str, value: Value },
}

impl CountStrategy {
    fn name(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Filtered { .. } => "filtered",
            Self::ScanFilter { .. } => "scan-filter",
        }
    }
}

/// A counter and its ordered strategy list.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub label: &'static str,
    pub collection: &'static str,
    pub strategies: Vec<CountStrategy>,
}

fn buses_metric() -> MetricSpec {
    MetricSpec {
        label: "buses",
        collection: collections::BUSES,
        strategies: vec![CountStrategy::Scan],
    }
}

fn drivers_metric() -> MetricSpec {
    MetricSpec {
        label: "drivers",
        collection: collections::USERS,
        strategies: vec![
            CountStrategy::Filtered {
                field: "role",
                value: json!(Role::Driver),
            },
            CountStrategy::ScanFilter {
                field: "role",
                value: json!(Role::Driver),
            },
        ],
    }
}

fn riders_metric() -> MetricSpec {
    MetricSpec {
        label: "riders",
        collection: collections::USERS,
        strategies: vec![
            CountStrategy::Filtered {
                field: "role",
                value: json!(Role::Rider),
            },
            CountStrategy::ScanFilter {
                field: "role",
                value: json!(Role::Rider),
            },
        ],
    }
}

/// The three admin counters in display order.
pub fn admin_metric_specs() -> [MetricSpec; 3] {
    [buses_metric(), drivers_metric(), riders_metric()]
}

async fn run_strategy(
    store: &dyn DocumentStore,
    collection: &str,
    strategy: &CountStrategy,
) -> Result<usize, StoreError> {
    match strategy {
        CountStrategy::Scan => Ok(store.get_all(collection).await?.len()),
        CountStrategy::Filtered { field, value } => Ok(store
            .query_eq(collection, field, value.clone())
            .await?
            .len()),
        CountStrategy::ScanFilter { field, value } => Ok(store
            .get_all(collection)
            .await?
            .iter()
            .filter(|(_, doc)| doc.get(*field) == Some(value))
            .count()),
    }
}

/// Run one counter to resolution. Strategy failures are recorded and fall
/// through; they never escape to the caller.
pub async fn run_metric(store: &dyn DocumentStore, spec: &MetricSpec) -> MetricValue {
    for strategy in &spec.strategies {
        match run_strategy(store, spec.collection, strategy).await {
            Ok(count) => {
                info!("Loaded {} count via {}: {}", spec.label, strategy.name(), count);
                return MetricValue::Count(count);
            }
            Err(e) => {
                logbuffer::failure(
                    "admin-stats",
                    &format!("{} {} strategy failed: {}", spec.label, strategy.name(), e),
                );
            }
        }
    }
    MetricValue::Error
}

/// The admin panel counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminStats {
    pub buses: MetricValue,
    pub drivers: MetricValue,
    pub riders: MetricValue,
}

impl Default for AdminStats {
    fn default() -> Self {
        Self {
            buses: MetricValue::Loading,
            drivers: MetricValue::Loading,
            riders: MetricValue::Loading,
        }
    }
}

pub async fn load_admin_stats(store: &dyn DocumentStore) -> AdminStats {
    info!("Loading admin stats");
    let stats = AdminStats {
        buses: run_metric(store, &buses_metric()).await,
        drivers: run_metric(store, &drivers_metric()).await,
        riders: run_metric(store, &riders_metric()).await,
    };
    info!(
        "Admin stats updated: buses={} drivers={} riders={}",
        stats.buses, stats.drivers, stats.riders
    );
    stats
}

/// The driver panel: the session driver's own buses.
#[derive(Debug, Clone, Default)]
pub struct DriverDashboard {
    pub buses: Vec<(String, BusRecord)>,
}

impl DriverDashboard {
    pub fn count(&self) -> usize {
        self.buses.len()
    }
}

/// Driver panel content, or the error placeholder when the query failed.
#[derive(Debug, Clone)]
pub enum DriverPanel {
    Loaded(DriverDashboard),
    Unavailable,
}

pub async fn load_driver_dashboard(
    store: &dyn DocumentStore,
    uid: &str,
) -> Result<DriverDashboard, StoreError> {
    let rows = store
        .query_eq(collections::BUSES, "driverId", json!(uid))
        .await?;
    let mut buses = Vec::with_capacity(rows.len());
    for (id, doc) in rows {
        match from_document::<BusRecord>(doc) {
            Ok(bus) => buses.push((id, bus)),
            Err(e) => {
                logbuffer::warning("driver-data", &format!("skipping unreadable bus {}: {}", id, e));
            }
        }
    }
    info!("Driver data loaded: {} buses", buses.len());
    Ok(DriverDashboard { buses })
}

/// The one panel a signed-in session gets to see.
#[derive(Debug, Clone)]
pub enum DashboardView {
    Admin(AdminStats),
    Driver(DriverPanel),
    /// The rider panel loads nothing.
    Rider,
}

/// Load the dashboard for the current session. Panel-level failures stay
/// inside the returned view; only a missing session is an error.
pub async fn load_dashboard(
    store: &dyn DocumentStore,
    session: &SessionContext,
) -> Result<DashboardView, ValidationError> {
    let role = session.role().ok_or(ValidationError::NotAuthenticated)?;
    info!("Loading dashboard for {}", role);
    match role {
        Role::Admin => Ok(DashboardView::Admin(load_admin_stats(store).await)),
        Role::Driver => {
            let uid = session.uid().ok_or(ValidationError::NotAuthenticated)?;
            match load_driver_dashboard(store, uid).await {
                Ok(dashboard) => Ok(DashboardView::Driver(DriverPanel::Loaded(dashboard))),
                Err(e) => {
                    logbuffer::failure("driver-data", &format!("error loading driver data: {}", e));
                    Ok(DashboardView::Driver(DriverPanel::Unavailable))
                }
            }
        }
        Role::Rider => Ok(DashboardView::Rider),
    }
}
