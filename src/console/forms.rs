//! Form controllers.
//!
//! Every submission follows the same contract: normalize the raw fields,
//! validate synchronously, perform exactly one backend write, and hand back
//! the notice text. Validation failures happen before any backend call and
//! surface their exact message; backend failures come back wrapped as
//! `Error {action}: {message}`. On success the caller resets the form and
//! runs the follow-up refresh; on failure everything stays as typed.

use log::info;
use serde_json::json;

use super::auth::{AuthGateway, GatewayError, Registration};
use super::roles::Role;
use super::search::{self, SearchHit};
use super::session::SessionContext;
use crate::backend::collections;
use crate::backend::documents::{
    server_timestamp, to_document, Document, DocumentStore, StoreError,
};
use crate::backend::identity::Credential;
use crate::logbuffer;
use crate::models::{BusClass, BusRecord, BusTypeRecord, ContactMessage, FuelType, UserRecord};
use crate::validation::{self, ValidationError};

/// Why a form submission was rejected.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// A backend write or query failed mid-operation.
    #[error("Error {action}: {message}")]
    Operation { action: &'static str, message: String },
}

impl FormError {
    fn operation(action: &'static str, source: StoreError) -> Self {
        Self::Operation {
            action,
            message: source.to_string(),
        }
    }
}

fn require_session(session: &SessionContext) -> Result<&Credential, ValidationError> {
    session.identity().ok_or(ValidationError::NotAuthenticated)
}

/// Sign in with a claimed role. Empty fields are rejected before the
/// provider is contacted.
pub async fn submit_login(
    gateway: &AuthGateway,
    email: &str,
    password: &str,
    claimed: Role,
) -> Result<&'static str, FormError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::AllFieldsRequired.into());
    }
    gateway.sign_in(email.trim(), password, claimed).await?;
    Ok("Login successful!")
}

/// Self-registration. String fields are trimmed here; passwords are taken
/// as typed.
pub async fn submit_register(
    gateway: &AuthGateway,
    registration: Registration,
) -> Result<&'static str, FormError> {
    let registration = Registration {
        first_name: registration.first_name.trim().to_string(),
        last_name: registration.last_name.trim().to_string(),
        email: registration.email.trim().to_string(),
        phone: registration.phone.trim().to_string(),
        admin_code: registration.admin_code.trim().to_string(),
        ..registration
    };
    gateway.register(&registration).await?;
    Ok("Registration successful! You can now login.")
}

/// Raw fields of the admin create-driver form.
#[derive(Debug, Clone, Default)]
pub struct CreateDriverForm {
    /// Full name; the first space splits first name from the rest.
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub license_number: String,
}

/// File a driver account stub. The driver completes it by registering with
/// the same email later; until then the record carries the temporary
/// password the admin chose.
pub async fn submit_create_driver(
    store: &dyn DocumentStore,
    session: &SessionContext,
    form: &CreateDriverForm,
) -> Result<&'static str, FormError> {
    let admin = require_session(session)?;
    info!("Creating driver account");

    let name = form.name.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();
    let license = form.license_number.trim();
    validation::require_all(&[name, email, &form.password, phone, license])?;

    let (first_name, last_name) = match name.split_once(' ') {
        Some((first, rest)) => (first, rest),
        None => (name, ""),
    };
    let record = UserRecord {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role: Role::Driver,
        is_active: true,
        is_verified: false,
        created_at: None,
        updated_at: None,
        license_number: Some(license.to_string()),
        temp_password: Some(form.password.clone()),
        needs_password_change: Some(true),
        created_by: Some(admin.uid.clone()),
        secondary_phone: None,
        address: None,
        city: None,
        state: None,
        emergency_contact: None,
    };
    let mut doc =
        to_document(&record).map_err(|e| FormError::operation("creating driver account", e))?;
    doc.insert("createdAt".into(), server_timestamp());
    store
        .add(collections::USERS, doc)
        .await
        .map_err(|e| FormError::operation("creating driver account", e))?;

    info!(
        "Driver account created for {}",
        logbuffer::escape_line(email)
    );
    Ok("Driver account created successfully! Driver can now register with these credentials.")
}

/// Raw fields of the bus details form. Fare and capacity arrive as text
/// and parse leniently to zero.
#[derive(Debug, Clone, Default)]
pub struct BusDetailsForm {
    pub bus_number: String,
    pub route: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub fare: String,
    pub capacity: String,
}

/// Add a bus under the signed-in driver.
pub async fn submit_bus_details(
    store: &dyn DocumentStore,
    session: &SessionContext,
    form: &BusDetailsForm,
) -> Result<&'static str, FormError> {
    let driver = require_session(session)?;
    info!("Adding bus information");

    validation::require_named(&[
        ("busNumber", &form.bus_number),
        ("route", &form.route),
        ("source", &form.source),
        ("destination", &form.destination),
        ("departureTime", &form.departure_time),
        ("arrivalTime", &form.arrival_time),
    ])?;
    let fare = validation::decimal_or_zero(&form.fare);
    let capacity = validation::integer_or_zero(&form.capacity);
    validation::validate_fare_and_capacity(fare, capacity)?;

    let record = BusRecord {
        bus_number: form.bus_number.trim().to_string(),
        route: form.route.trim().to_string(),
        source: form.source.trim().to_string(),
        destination: form.destination.trim().to_string(),
        departure_time: form.departure_time.trim().to_string(),
        arrival_time: form.arrival_time.trim().to_string(),
        fare,
        capacity,
        driver_id: driver.uid.clone(),
        driver_name: driver
            .display_name
            .clone()
            .unwrap_or_else(|| driver.email.clone()),
        driver_email: driver.email.clone(),
        is_active: true,
        created_at: None,
        updated_at: None,
    };
    let mut doc =
        to_document(&record).map_err(|e| FormError::operation("adding bus information", e))?;
    doc.insert("createdAt".into(), server_timestamp());
    doc.insert("updatedAt".into(), server_timestamp());
    store
        .add(collections::BUSES, doc)
        .await
        .map_err(|e| FormError::operation("adding bus information", e))?;

    info!(
        "Bus information added: {}",
        logbuffer::escape_line(&record.bus_number)
    );
    Ok("Bus information added successfully!")
}

/// Raw fields of the bus type form. Amenities are free text and optional.
#[derive(Debug, Clone, Default)]
pub struct BusTypeForm {
    pub bus_type: String,
    pub amenities: String,
    pub fuel_type: String,
    pub manufacturing_year: String,
}

/// File the vehicle profile for the signed-in driver.
pub async fn submit_bus_type(
    store: &dyn DocumentStore,
    session: &SessionContext,
    form: &BusTypeForm,
) -> Result<&'static str, FormError> {
    let driver = require_session(session)?;
    info!("Adding bus type information");

    // Unchosen selects come through empty; a zero year means unfilled.
    let bus_type = BusClass::parse(&form.bus_type);
    let fuel_type = FuelType::parse(&form.fuel_type);
    let manufacturing_year = validation::integer_or_zero(&form.manufacturing_year);
    let (Some(bus_type), Some(fuel_type)) = (bus_type, fuel_type) else {
        return Err(ValidationError::RequiredFields.into());
    };
    if manufacturing_year == 0 {
        return Err(ValidationError::RequiredFields.into());
    }

    let record = BusTypeRecord {
        bus_type,
        amenities: form.amenities.trim().to_string(),
        fuel_type,
        manufacturing_year,
        driver_id: driver.uid.clone(),
        driver_email: driver.email.clone(),
        created_at: None,
    };
    let mut doc = to_document(&record)
        .map_err(|e| FormError::operation("adding bus type information", e))?;
    doc.insert("createdAt".into(), server_timestamp());
    store
        .add(collections::BUS_TYPES, doc)
        .await
        .map_err(|e| FormError::operation("adding bus type information", e))?;

    info!("Bus type information added: {}", record.bus_type.label());
    Ok("Bus type information added successfully!")
}

/// Raw fields of the contact details form. Secondary phone is optional and
/// stored even when empty.
#[derive(Debug, Clone, Default)]
pub struct ContactDetailsForm {
    pub phone: String,
    pub secondary_phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub emergency_contact: String,
}

/// Current contact fields of the signed-in user, for pre-filling the form.
/// A missing record yields an empty form.
pub async fn prefill_contact_details(
    store: &dyn DocumentStore,
    session: &SessionContext,
) -> Result<ContactDetailsForm, FormError> {
    let user = require_session(session)?;
    let doc = store
        .get(collections::USERS, &user.uid)
        .await
        .map_err(|e| FormError::operation("updating contact information", e))?;
    let Some(doc) = doc else {
        return Ok(ContactDetailsForm::default());
    };
    let text = |field: &str| {
        doc.get(field)
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string()
    };
    Ok(ContactDetailsForm {
        phone: text("phone"),
        secondary_phone: text("secondaryPhone"),
        address: text("address"),
        city: text("city"),
        state: text("state"),
        emergency_contact: text("emergencyContact"),
    })
}

/// Merge updated contact fields into the signed-in user's record.
pub async fn submit_contact_details(
    store: &dyn DocumentStore,
    session: &SessionContext,
    form: &ContactDetailsForm,
) -> Result<&'static str, FormError> {
    let user = require_session(session)?;
    info!("Updating contact information");

    let phone = form.phone.trim();
    let secondary_phone = form.secondary_phone.trim();
    let address = form.address.trim();
    let city = form.city.trim();
    let state = form.state.trim();
    let emergency_contact = form.emergency_contact.trim();
    validation::require_named(&[
        ("phone", phone),
        ("address", address),
        ("city", city),
        ("state", state),
        ("emergencyContact", emergency_contact),
    ])?;

    let mut fields = Document::new();
    fields.insert("phone".into(), json!(phone));
    fields.insert("secondaryPhone".into(), json!(secondary_phone));
    fields.insert("address".into(), json!(address));
    fields.insert("city".into(), json!(city));
    fields.insert("state".into(), json!(state));
    fields.insert("emergencyContact".into(), json!(emergency_contact));
    fields.insert("updatedAt".into(), server_timestamp());
    store
        .update(collections::USERS, &user.uid, fields)
        .await
        .map_err(|e| FormError::operation("updating contact information", e))?;

    info!("Contact information updated");
    Ok("Contact information updated successfully!")
}

/// Raw fields of the public contact form.
#[derive(Debug, Clone, Default)]
pub struct ContactMessageForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Record a contact message. Works signed in or out; a session only adds
/// the sender's uid to the stored message.
pub async fn submit_contact_message(
    store: &dyn DocumentStore,
    session: &SessionContext,
    form: &ContactMessageForm,
) -> Result<&'static str, FormError> {
    info!("Contact message submitted");
    let name = form.name.trim();
    let email = form.email.trim();
    let subject = form.subject.trim();
    let message = form.message.trim();
    validation::require_all(&[name, email, subject, message])?;

    let record = ContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        subject: subject.to_string(),
        message: message.to_string(),
        timestamp: None,
        user_id: session.uid().map(str::to_string),
    };
    let mut doc = to_document(&record).map_err(|e| FormError::operation("sending message", e))?;
    doc.insert("timestamp".into(), server_timestamp());
    store
        .add(collections::CONTACT_MESSAGES, doc)
        .await
        .map_err(|e| FormError::operation("sending message", e))?;

    info!("Contact message saved");
    Ok("Message sent successfully! We will get back to you soon.")
}

/// Run a bus search. Both route ends are required before the backend is
/// queried.
pub async fn submit_search(
    store: &dyn DocumentStore,
    source: &str,
    destination: &str,
) -> Result<Vec<SearchHit>, FormError> {
    if source.trim().is_empty() || destination.trim().is_empty() {
        return Err(ValidationError::MissingSearchRoute.into());
    }
    search::search_active_buses(store, source, destination)
        .await
        .map_err(|e| FormError::operation("searching buses", e))
}
