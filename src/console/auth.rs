//! Authentication gateway.
//!
//! Bridges the identity provider and the `users` collection for the three
//! console flows: sign-in with a claimed role, self-registration, and
//! sign-out. It also owns [`AuthGateway::resolve_transition`], the only code
//! that produces a new [`SessionContext`]; the engine feeds it every
//! credential-state change, including the initial one.
//!
//! Flow rules, in the order they are enforced:
//!
//! - Sign-in authenticates first, then checks the stored account record. A
//!   missing record or a role that differs from the claimed one closes the
//!   provider session again before the failure is reported; the
//!   credential-state channel then carries only the settled outcome.
//! - A claimed-admin registration is gated on the configured registration
//!   code before any backend call is made.
//! - Registration never signs the new account in.

use std::sync::Arc;

use log::info;

use super::roles::Role;
use super::session::SessionContext;
use crate::backend::collections;
use crate::backend::documents::{self, DocumentStore, StoreError};
use crate::backend::identity::{AuthError, Credential, IdentityProvider};
use crate::logbuffer;
use crate::models::UserRecord;
use crate::validation::{self, ValidationError};

/// Sign-in and registration failures, rendered verbatim as notices.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid user type selected")]
    RoleMismatch,
    #[error("User not found in database")]
    MissingRecord,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a self-registration submission carries.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub role: Role,
    pub admin_code: String,
}

pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
    admin_registration_code: String,
}

impl AuthGateway {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
        admin_registration_code: String,
    ) -> Self {
        Self {
            provider,
            store,
            admin_registration_code,
        }
    }

    /// Sign in and check the stored role against the claimed one.
    ///
    /// The session itself is not written here; the provider publishes the
    /// settled credential state and the engine resolves it through
    /// [`Self::resolve_transition`].
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        claimed: Role,
    ) -> Result<Credential, GatewayError> {
        let credential = self.provider.sign_in(email, password).await?;
        match self.fetch_record(&credential.uid).await {
            Ok(Some(record)) if record.role == claimed => {
                info!(
                    "Login successful for {} as {}",
                    logbuffer::escape_line(email),
                    record.role
                );
                Ok(credential)
            }
            Ok(Some(record)) => {
                let _ = self.provider.sign_out().await;
                logbuffer::warning(
                    "login",
                    &format!(
                        "invalid user type for {}: stored {}, claimed {}",
                        logbuffer::escape_line(email),
                        record.role,
                        claimed
                    ),
                );
                Err(GatewayError::RoleMismatch)
            }
            Ok(None) => {
                let _ = self.provider.sign_out().await;
                logbuffer::failure(
                    "login",
                    &format!("user not in database: {}", logbuffer::escape_line(email)),
                );
                Err(GatewayError::MissingRecord)
            }
            // The record fetch failed; the transient provider session is
            // left for the state-change resolution, whose own failing fetch
            // forces the sign-out.
            Err(e) => Err(e.into()),
        }
    }

    /// Create the provider account and its `users` record.
    pub async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        validation::require_all(&[
            &registration.first_name,
            &registration.last_name,
            &registration.email,
            &registration.phone,
        ])?;
        validation::validate_password(&registration.password, &registration.confirm_password)?;
        if registration.role == Role::Admin {
            validation::validate_admin_code(&registration.admin_code, &self.admin_registration_code)?;
        }

        let credential = self
            .provider
            .sign_up(&registration.email, &registration.password)
            .await?;
        let record = UserRecord {
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            role: registration.role,
            is_active: true,
            is_verified: registration.role == Role::Admin,
            created_at: None,
            updated_at: None,
            license_number: None,
            temp_password: None,
            needs_password_change: None,
            created_by: None,
            secondary_phone: None,
            address: None,
            city: None,
            state: None,
            emergency_contact: None,
        };
        self.provider
            .update_display_name(&credential.uid, &record.full_name())
            .await?;

        let mut doc = documents::to_document(&record)?;
        doc.insert("createdAt".to_string(), documents::server_timestamp());
        self.store.put(collections::USERS, &credential.uid, doc).await?;

        info!(
            "Registration successful for {} as {}",
            logbuffer::escape_line(&registration.email),
            registration.role
        );
        Ok(())
    }

    /// End the provider session. The session context clears when the
    /// resulting state change is resolved.
    pub async fn sign_out(&self) -> Result<(), GatewayError> {
        self.provider.sign_out().await?;
        info!("Logout successful");
        Ok(())
    }

    /// Resolve a credential transition into the next session state.
    ///
    /// A present credential with a readable record commits the identity and
    /// its stored role. A missing record, or a record that cannot be
    /// fetched, forces a provider sign-out and yields the signed-out state.
    pub async fn resolve_transition(&self, credential: Option<Credential>) -> SessionContext {
        let Some(credential) = credential else {
            return SessionContext::signed_out();
        };
        match self.fetch_record(&credential.uid).await {
            Ok(Some(record)) => {
                info!(
                    "Auth state: {} signed in as {}",
                    logbuffer::escape_line(&credential.email),
                    record.role
                );
                SessionContext::signed_in(credential, record.role)
            }
            Ok(None) => {
                logbuffer::warning("auth-state", "user document not found; signing out");
                let _ = self.provider.sign_out().await;
                SessionContext::signed_out()
            }
            Err(e) => {
                logbuffer::failure("auth-state", &format!("error fetching user data: {}", e));
                let _ = self.provider.sign_out().await;
                SessionContext::signed_out()
            }
        }
    }

    async fn fetch_record(&self, uid: &str) -> Result<Option<UserRecord>, StoreError> {
        match self.store.get(collections::USERS, uid).await? {
            Some(doc) => Ok(Some(documents::from_document(doc)?)),
            None => Ok(None),
        }
    }
}
