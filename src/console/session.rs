//! Session state.

use crate::backend::Credential;

use super::roles::Role;

/// # Session Context
///
/// The single record of who is signed in, held by the console engine.
/// Exactly one code path writes it: the credential-state resolution in the
/// auth gateway (sign-out included, since sign-out arrives as a state
/// transition). Every other component reads it by shared reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    identity: Option<Credential>,
    role: Option<Role>,
}

impl SessionContext {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Credential, role: Role) -> Self {
        Self {
            identity: Some(identity),
            role: Some(role),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Credential> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn uid(&self) -> Option<&str> {
        self.identity.as_ref().map(|cred| cred.uid.as_str())
    }

    /// Name used in the signed-in greeting: the profile display name when
    /// set, otherwise the account email.
    pub fn greeting_name(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(|cred| cred.display_name.as_deref().unwrap_or(cred.email.as_str()))
    }
}
