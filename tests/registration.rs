//! Registration flows: the admin code gate, role stamping, and the
//! admin-created driver stub.

mod common;

use common::*;
use ebus::backend::{collections, DocumentStore, IdentityProvider};
use ebus::console::forms::{self, CreateDriverForm};
use ebus::console::roles::Role;
use ebus::console::router::Page;
use ebus::models::UserRecord;
use serde_json::json;

#[tokio::test]
async fn admin_code_is_checked_before_any_backend_call() {
    let backend = new_backend();
    // Even a broken users collection never gets touched
    backend.break_collection(collections::USERS);

    let mut registration = registration("Mallory", "mallory@example.com", Role::Admin);
    registration.admin_code = "WRONG_CODE".into();
    let err = gateway(&backend)
        .register(&registration)
        .await
        .expect_err("wrong code must be rejected");
    assert_eq!(err.to_string(), "Invalid admin verification code");

    backend.restore(collections::USERS);
    // No credential, no account, no record
    assert!(backend.current().is_none());
    let signin = backend.sign_in("mallory@example.com", TEST_PASSWORD).await;
    assert_eq!(
        signin.expect_err("no account").to_string(),
        "No user found with this email address."
    );
    let rows = backend.get_all(collections::USERS).await.unwrap();
    assert!(rows.is_empty(), "no record should have been written");
}

#[tokio::test]
async fn admin_registration_with_valid_code_is_verified() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Asha", "asha@example.com", Role::Admin).await;

    // Registration never signs the new account in
    assert!(backend.current().is_none());

    let doc = backend
        .get(collections::USERS, &uid)
        .await
        .unwrap()
        .expect("record stored under the account uid");
    assert_eq!(doc.get("role"), Some(&json!("admin")));
    assert_eq!(doc.get("isVerified"), Some(&json!(true)));
    assert_eq!(doc.get("isActive"), Some(&json!(true)));
    assert!(doc.contains_key("createdAt"), "creation stamp resolved");

    let credential = backend
        .sign_in("asha@example.com", TEST_PASSWORD)
        .await
        .expect("seeded password verifies");
    assert_eq!(credential.uid, uid);
    assert_eq!(credential.display_name.as_deref(), Some("Asha Tester"));
}

#[tokio::test]
async fn non_admin_roles_register_unverified() {
    let backend = new_backend();
    let driver_uid = seed_user(&backend, "Dev", "dev@example.com", Role::Driver).await;
    let rider_uid = seed_user(&backend, "Ria", "ria@example.com", Role::Rider).await;

    for (uid, role) in [(driver_uid, "driver"), (rider_uid, "rider")] {
        let doc = backend.get(collections::USERS, &uid).await.unwrap().unwrap();
        assert_eq!(doc.get("role"), Some(&json!(role)));
        assert_eq!(doc.get("isVerified"), Some(&json!(false)));
    }
}

#[tokio::test]
async fn duplicate_email_maps_to_fixed_message() {
    let backend = new_backend();
    seed_user(&backend, "Asha", "asha@example.com", Role::Rider).await;

    let err = gateway(&backend)
        .register(&registration("Asha", "asha@example.com", Role::Rider))
        .await
        .expect_err("second registration must fail");
    assert_eq!(err.to_string(), "Email address is already registered.");
}

#[tokio::test]
async fn password_rules_surface_exact_messages() {
    let backend = new_backend();
    let gateway = gateway(&backend);

    let mut mismatched = registration("Asha", "asha@example.com", Role::Rider);
    mismatched.confirm_password = "different".into();
    assert_eq!(
        gateway.register(&mismatched).await.unwrap_err().to_string(),
        "Passwords do not match"
    );

    let mut short = registration("Asha", "asha@example.com", Role::Rider);
    short.password = "abc".into();
    short.confirm_password = "abc".into();
    assert_eq!(
        gateway.register(&short).await.unwrap_err().to_string(),
        "Password must be at least 6 characters"
    );

    let blank = registration("", "asha@example.com", Role::Rider);
    assert_eq!(
        gateway.register(&blank).await.unwrap_err().to_string(),
        "Please fill in all required fields"
    );

    // None of the failures created an account
    let rows = backend.get_all(collections::USERS).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn successful_register_routes_back_to_login() {
    let backend = new_backend();
    let mut app = new_app(&backend);
    app.start().await;

    let ok = app
        .register(registration("Asha", "asha@example.com", Role::Rider))
        .await;
    assert!(ok);
    assert_eq!(app.router().current(), Page::Login);
    assert!(!app.session().is_signed_in());
    let notices = app.active_notices();
    assert!(notices
        .iter()
        .any(|n| n.message == "Registration successful! You can now login."));
}

#[tokio::test]
async fn admin_creates_driver_stub_with_temp_credentials() {
    let backend = new_backend();
    let admin_uid = seed_user(&backend, "Asha", "asha@example.com", Role::Admin).await;
    let session = session_for(&admin_uid, "asha@example.com", Role::Admin);

    let message = forms::submit_create_driver(
        backend.as_ref(),
        &session,
        &CreateDriverForm {
            name: "Ram Kumar Das".into(),
            email: "ram@example.com".into(),
            password: "temp-pass-1".into(),
            phone: "9811111111".into(),
            license_number: "DL-0420110012345".into(),
        },
    )
    .await
    .expect("driver stub created");
    assert_eq!(
        message,
        "Driver account created successfully! Driver can now register with these credentials."
    );

    let rows = backend
        .query_eq(collections::USERS, "email", json!("ram@example.com"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    let (_, doc) = &rows[0];
    assert_eq!(doc.get("firstName"), Some(&json!("Ram")));
    assert_eq!(doc.get("lastName"), Some(&json!("Kumar Das")));
    assert_eq!(doc.get("role"), Some(&json!("driver")));
    assert_eq!(doc.get("tempPassword"), Some(&json!("temp-pass-1")));
    assert_eq!(doc.get("needsPasswordChange"), Some(&json!(true)));
    assert_eq!(doc.get("createdBy"), Some(&json!(admin_uid)));
    assert_eq!(doc.get("isActive"), Some(&json!(true)));
    assert!(doc.contains_key("createdAt"));

    // The stub reads back as a user record even though it has no account yet
    let record: UserRecord = ebus::backend::documents::from_document(doc.clone()).unwrap();
    assert_eq!(record.license_number.as_deref(), Some("DL-0420110012345"));
    assert!(!record.is_verified);
}

#[tokio::test]
async fn create_driver_requires_every_field() {
    let backend = new_backend();
    let admin_uid = seed_user(&backend, "Asha", "asha@example.com", Role::Admin).await;
    let session = session_for(&admin_uid, "asha@example.com", Role::Admin);

    let err = forms::submit_create_driver(
        backend.as_ref(),
        &session,
        &CreateDriverForm {
            name: "Ram Kumar".into(),
            email: String::new(),
            password: "temp-pass-1".into(),
            phone: "9811111111".into(),
            license_number: "DL-1".into(),
        },
    )
    .await
    .expect_err("missing email");
    assert_eq!(err.to_string(), "Please fill in all required fields");
}
