//! Synchronous form-field validation.
//!
//! Every form controller runs these checks before touching the backend; a
//! failure blocks the write entirely and is reported in place as a notice.
//! Error display strings are the exact user-facing messages.

use std::fmt::Write as _;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures, rendered verbatim in the UI notice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    AllFieldsRequired,

    #[error("Please fill in all required fields")]
    RequiredFields,

    #[error("Please fill in all required fields: {fields}")]
    RequiredFieldsNamed { fields: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Invalid admin verification code")]
    AdminCodeMismatch,

    #[error("Invalid email address format.")]
    InvalidEmail,

    #[error("Fare and capacity must be greater than 0")]
    NonPositiveFareOrCapacity,

    #[error("Please enter both source and destination")]
    MissingSearchRoute,

    #[error("User not authenticated")]
    NotAuthenticated,
}

/// Check a named set of fields; empty (after trim) field names are joined
/// into the error message so the notice tells the user exactly what is left.
pub fn require_named(pairs: &[(&str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = pairs
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    let mut fields = String::new();
    for (i, name) in missing.iter().enumerate() {
        if i > 0 {
            let _ = write!(fields, ", ");
        }
        let _ = write!(fields, "{}", name);
    }
    Err(ValidationError::RequiredFieldsNamed { fields })
}

/// Check fields without naming them in the message (forms whose notice is
/// the generic "Please fill in all required fields").
pub fn require_all(values: &[&str]) -> Result<(), ValidationError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationError::RequiredFields);
    }
    Ok(())
}

/// Registration password rules: confirmation equality first, then length.
pub fn validate_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Minimal structural email check; full verification belongs to the identity
/// provider, which reports its own invalid-email code.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let trimmed = email.trim();
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    let shape_ok = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !trimmed.contains(char::is_whitespace);
    if !shape_ok {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(trimmed.to_string())
}

/// Fare and capacity are checked together and share one message.
pub fn validate_fare_and_capacity(fare: f64, capacity: u32) -> Result<(), ValidationError> {
    if fare <= 0.0 || capacity == 0 {
        return Err(ValidationError::NonPositiveFareOrCapacity);
    }
    Ok(())
}

/// Admin self-registration gate: the submitted code must equal the
/// configured registration code exactly.
pub fn validate_admin_code(submitted: &str, expected: &str) -> Result<(), ValidationError> {
    if submitted.trim() != expected {
        return Err(ValidationError::AdminCodeMismatch);
    }
    Ok(())
}

/// Lenient decimal parse: unparseable input counts as zero, which the
/// positive-value checks then reject.
pub fn decimal_or_zero(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Lenient integer parse with the same zero fallback.
pub fn integer_or_zero(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}
