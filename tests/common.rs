//! Test utilities & fixtures shared by the integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use ebus::backend::{collections, documents, Credential, DocumentStore, MemoryBackend};
use ebus::config::Config;
use ebus::console::app::ConsoleApp;
use ebus::console::auth::{AuthGateway, Registration};
use ebus::console::roles::Role;
use ebus::console::session::SessionContext;
use ebus::models::BusRecord;
use serde_json::json;

/// Matches the shipped default in `SecurityConfig`.
pub const ADMIN_CODE: &str = "EBUS_ADMIN_2024";

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "secret123";

/// Config pointing at an ephemeral backend with quiet logging.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.backend.ephemeral = true;
    config.logging.level = "error".into();
    config.logging.file = None;
    config
}

pub fn new_backend() -> Arc<MemoryBackend> {
    Arc::new(MemoryBackend::new())
}

pub fn new_app(backend: &Arc<MemoryBackend>) -> ConsoleApp {
    ConsoleApp::new(test_config(), backend.clone(), backend.clone())
}

pub fn gateway(backend: &Arc<MemoryBackend>) -> AuthGateway {
    AuthGateway::new(backend.clone(), backend.clone(), ADMIN_CODE.to_string())
}

/// A filled-in registration for a standard test user.
pub fn registration(first: &str, email: &str, role: Role) -> Registration {
    Registration {
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        password: TEST_PASSWORD.to_string(),
        confirm_password: TEST_PASSWORD.to_string(),
        phone: "9876543210".to_string(),
        role,
        admin_code: if role == Role::Admin {
            ADMIN_CODE.to_string()
        } else {
            String::new()
        },
    }
}

/// Register an account with [`TEST_PASSWORD`] and return its uid.
pub async fn seed_user(
    backend: &Arc<MemoryBackend>,
    first: &str,
    email: &str,
    role: Role,
) -> String {
    gateway(backend)
        .register(&registration(first, email, role))
        .await
        .expect("registration should succeed");
    uid_of(backend, email).await
}

/// Look up a registered user's uid through the store.
pub async fn uid_of(backend: &Arc<MemoryBackend>, email: &str) -> String {
    let rows = backend
        .query_eq(collections::USERS, "email", json!(email))
        .await
        .expect("users query");
    rows.first()
        .map(|(id, _)| id.clone())
        .expect("user record exists")
}

/// Insert a bus document directly, bypassing the form controller.
pub async fn seed_bus(
    backend: &Arc<MemoryBackend>,
    driver_uid: &str,
    number: &str,
    source: &str,
    destination: &str,
    active: bool,
) -> String {
    let record = BusRecord {
        bus_number: number.to_string(),
        route: format!("{source} - {destination}"),
        source: source.to_string(),
        destination: destination.to_string(),
        departure_time: "08:00".to_string(),
        arrival_time: "14:30".to_string(),
        fare: 450.0,
        capacity: 40,
        driver_id: driver_uid.to_string(),
        driver_name: "Test Driver".to_string(),
        driver_email: "driver@example.com".to_string(),
        is_active: active,
        created_at: None,
        updated_at: None,
    };
    let doc = documents::to_document(&record).expect("serialize bus");
    backend
        .add(collections::BUSES, doc)
        .await
        .expect("add bus")
}

/// A signed-in session without going through the provider.
pub fn session_for(uid: &str, email: &str, role: Role) -> SessionContext {
    SessionContext::signed_in(
        Credential {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: Some("Test Driver".to_string()),
        },
        role,
    )
}
