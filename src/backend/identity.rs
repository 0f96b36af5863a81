//! Identity provider seam.
//!
//! Authentication lives in an external service; the console holds an
//! `Arc<dyn IdentityProvider>` and reacts to credential-state transitions
//! through a watch channel. Receivers always observe the latest state, in
//! order, collapsing intermediate values when they lag.

use async_trait::async_trait;
use tokio::sync::watch;

/// A signed-in identity as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// Provider failures. The `Display` strings are the fixed user-facing
/// messages shown in form notices; [`AuthError::Other`] carries the
/// provider's raw message for codes outside the table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("No user found with this email address.")]
    UserNotFound,
    #[error("Incorrect password.")]
    WrongPassword,
    #[error("Email address is already registered.")]
    EmailAlreadyInUse,
    #[error("Password is too weak. Use at least 6 characters.")]
    WeakPassword,
    #[error("Invalid email address format.")]
    InvalidEmail,
    #[error("Too many failed attempts. Please try again later.")]
    TooManyRequests,
    #[error("Permission denied. Please check your authentication.")]
    PermissionDenied,
    #[error("{0}")]
    Other(String),
}

impl AuthError {
    /// Wrap a provider message, substituting the generic line when the
    /// provider gave none.
    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.is_empty() {
            Self::Other("An unexpected error occurred.".to_string())
        } else {
            Self::Other(message)
        }
    }
}

/// External identity service.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate and publish the new credential state.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Credential, AuthError>;

    /// Create an account. Does not change the signed-in state.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Credential, AuthError>;

    /// Set the profile display name for `uid`.
    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<(), AuthError>;

    /// End the session and publish the signed-out state.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to credential-state transitions. The receiver starts out
    /// holding the current state.
    fn subscribe(&self) -> watch::Receiver<Option<Credential>>;

    /// The credential currently signed in, if any.
    fn current(&self) -> Option<Credential> {
        self.subscribe().borrow().clone()
    }
}
