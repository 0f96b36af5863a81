//! Contact message submission and the signed-in contact-details form.

mod common;

use common::*;
use ebus::backend::{collections, DocumentStore};
use ebus::console::forms::{
    prefill_contact_details, submit_contact_details, submit_contact_message, ContactDetailsForm,
    ContactMessageForm,
};
use ebus::console::roles::Role;
use ebus::console::session::SessionContext;
use serde_json::json;

fn message_form() -> ContactMessageForm {
    ContactMessageForm {
        name: "Ravi Nair".to_string(),
        email: "ravi@example.com".to_string(),
        subject: "Route query".to_string(),
        message: "Is the 08:00 Delhi bus running tomorrow?".to_string(),
    }
}

fn details_form() -> ContactDetailsForm {
    ContactDetailsForm {
        phone: "9876543210".to_string(),
        secondary_phone: String::new(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        emergency_contact: "9000000000".to_string(),
    }
}

#[tokio::test]
async fn empty_message_blocks_the_write() {
    let backend = new_backend();
    let form = ContactMessageForm {
        message: "   ".to_string(),
        ..message_form()
    };

    let err = submit_contact_message(backend.as_ref(), &SessionContext::signed_out(), &form)
        .await
        .expect_err("blank message must be rejected");
    assert_eq!(err.to_string(), "Please fill in all required fields");

    let stored = backend.get_all(collections::CONTACT_MESSAGES).await.unwrap();
    assert!(stored.is_empty(), "validation failures must not write");
}

#[tokio::test]
async fn visitors_can_send_messages_without_an_account() {
    let backend = new_backend();
    let ok = submit_contact_message(
        backend.as_ref(),
        &SessionContext::signed_out(),
        &message_form(),
    )
    .await
    .unwrap();
    assert_eq!(ok, "Message sent successfully! We will get back to you soon.");

    let stored = backend.get_all(collections::CONTACT_MESSAGES).await.unwrap();
    assert_eq!(stored.len(), 1);
    let (_, doc) = &stored[0];
    assert_eq!(doc["name"], json!("Ravi Nair"));
    assert_eq!(doc["subject"], json!("Route query"));
    assert!(doc.get("userId").is_none(), "anonymous messages carry no uid");
    // The sentinel must be resolved to a real timestamp on the write path
    assert!(doc["timestamp"].is_string());
}

#[tokio::test]
async fn signed_in_messages_carry_the_sender_uid() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Ravi", "ravi@example.com", Role::Rider).await;
    let session = session_for(&uid, "ravi@example.com", Role::Rider);

    submit_contact_message(backend.as_ref(), &session, &message_form())
        .await
        .unwrap();

    let stored = backend.get_all(collections::CONTACT_MESSAGES).await.unwrap();
    assert_eq!(stored[0].1["userId"], json!(uid));
}

#[tokio::test]
async fn message_fields_are_trimmed_before_storage() {
    let backend = new_backend();
    let form = ContactMessageForm {
        name: "  Ravi Nair  ".to_string(),
        email: " ravi@example.com ".to_string(),
        subject: " Route query ".to_string(),
        message: " Hello ".to_string(),
    };
    submit_contact_message(backend.as_ref(), &SessionContext::signed_out(), &form)
        .await
        .unwrap();

    let stored = backend.get_all(collections::CONTACT_MESSAGES).await.unwrap();
    let (_, doc) = &stored[0];
    assert_eq!(doc["name"], json!("Ravi Nair"));
    assert_eq!(doc["email"], json!("ravi@example.com"));
    assert_eq!(doc["message"], json!("Hello"));
}

#[tokio::test]
async fn message_store_failures_surface_as_a_wrapped_notice() {
    let backend = new_backend();
    backend.break_collection(collections::CONTACT_MESSAGES);
    let mut app = new_app(&backend);
    app.start().await;

    assert!(!app.send_message(&message_form()).await);
    assert!(app
        .active_notices()
        .iter()
        .any(|n| n.message.starts_with("Error sending message: ")));
}

#[tokio::test]
async fn contact_details_require_a_session() {
    let backend = new_backend();
    let err = submit_contact_details(
        backend.as_ref(),
        &SessionContext::signed_out(),
        &details_form(),
    )
    .await
    .expect_err("signed-out update must fail");
    assert_eq!(err.to_string(), "User not authenticated");

    let err = prefill_contact_details(backend.as_ref(), &SessionContext::signed_out())
        .await
        .expect_err("signed-out prefill must fail");
    assert_eq!(err.to_string(), "User not authenticated");
}

#[tokio::test]
async fn missing_contact_fields_are_named_in_the_error() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Asha", "asha@example.com", Role::Driver).await;
    let session = session_for(&uid, "asha@example.com", Role::Driver);

    let form = ContactDetailsForm {
        phone: String::new(),
        state: "  ".to_string(),
        ..details_form()
    };
    let err = submit_contact_details(backend.as_ref(), &session, &form)
        .await
        .expect_err("missing fields rejected");
    assert_eq!(
        err.to_string(),
        "Please fill in all required fields: phone, state"
    );

    // Secondary phone is the one optional field
    let form = ContactDetailsForm {
        secondary_phone: String::new(),
        ..details_form()
    };
    assert!(submit_contact_details(backend.as_ref(), &session, &form)
        .await
        .is_ok());
}

#[tokio::test]
async fn contact_update_merges_without_touching_the_rest_of_the_record() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Asha", "asha@example.com", Role::Driver).await;
    let session = session_for(&uid, "asha@example.com", Role::Driver);

    let ok = submit_contact_details(backend.as_ref(), &session, &details_form())
        .await
        .unwrap();
    assert_eq!(ok, "Contact information updated successfully!");

    let doc = backend.get(collections::USERS, &uid).await.unwrap().unwrap();
    assert_eq!(doc["phone"], json!("9876543210"));
    assert_eq!(doc["city"], json!("Bengaluru"));
    assert_eq!(doc["emergencyContact"], json!("9000000000"));
    // Optional secondary phone is stored even when left blank
    assert_eq!(doc["secondaryPhone"], json!(""));
    assert!(doc["updatedAt"].is_string());
    // Fields the form does not own survive the merge
    assert_eq!(doc["role"], json!("driver"));
    assert_eq!(doc["firstName"], json!("Asha"));
    assert_eq!(doc["email"], json!("asha@example.com"));
}

#[tokio::test]
async fn prefill_reflects_the_stored_contact_fields() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Asha", "asha@example.com", Role::Driver).await;
    let session = session_for(&uid, "asha@example.com", Role::Driver);

    // Before any update, only the registration phone is present
    let blank = prefill_contact_details(backend.as_ref(), &session).await.unwrap();
    assert_eq!(blank.phone, "9876543210");
    assert!(blank.address.is_empty());

    submit_contact_details(backend.as_ref(), &session, &details_form())
        .await
        .unwrap();
    let filled = prefill_contact_details(backend.as_ref(), &session).await.unwrap();
    assert_eq!(filled.address, "12 MG Road");
    assert_eq!(filled.city, "Bengaluru");
    assert_eq!(filled.state, "Karnataka");
    assert_eq!(filled.emergency_contact, "9000000000");
}

#[tokio::test]
async fn contact_update_failures_name_the_action() {
    let backend = new_backend();
    let uid = seed_user(&backend, "Asha", "asha@example.com", Role::Driver).await;
    let session = session_for(&uid, "asha@example.com", Role::Driver);
    backend.break_collection(collections::USERS);

    let err = submit_contact_details(backend.as_ref(), &session, &details_form())
        .await
        .expect_err("broken store must fail the update");
    assert!(
        err.to_string().starts_with("Error updating contact information: "),
        "{err}"
    );
}

#[tokio::test]
async fn message_notice_lands_in_the_contact_form_slot() {
    let backend = new_backend();
    let mut app = new_app(&backend);
    app.start().await;

    assert!(app.send_message(&message_form()).await);
    let notices = app.active_notices();
    let notice = notices.iter().find(|n| n.slot == "contactForm").unwrap();
    assert_eq!(
        notice.message,
        "Message sent successfully! We will get back to you soon."
    );
}
