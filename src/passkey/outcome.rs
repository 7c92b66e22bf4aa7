//! Maps operation failures to stable, user-facing messages.
//!
//! The order of the checks in [`classify`] is significant: a cancelled ceremony
//! whose message mentions a timeout still reads as a cancellation.

use super::error::{CeremonyErrorKind, PasskeyError};
use std::fmt;
use tracing::error;

/// Marker searched for in platform messages that report a timeout without
/// using the `TimeoutError` name.
const TIMEOUT_MARKER: &str = "timed out";

pub const MSG_REGISTRATION_DENIED: &str = "Registration was canceled or denied";
pub const MSG_AUTHENTICATION_DENIED: &str = "Authentication was canceled or denied";
pub const MSG_OPERATION_DENIED: &str = "Operation was canceled or denied";
pub const MSG_ALREADY_REGISTERED: &str = "This authenticator is already registered";
pub const MSG_CANCELED: &str = "Operation canceled";
pub const MSG_TIMED_OUT: &str = "Operation timed out, please retry";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Register,
    Authenticate,
    Delete,
    Update,
}

impl Operation {
    /// Message used when a failure carries nothing more specific.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch credentials",
            Self::Register => "Registration failed",
            Self::Authenticate => "Authentication failed",
            Self::Delete => "Failed to delete credential",
            Self::Update => "Failed to update credential",
        }
    }

    fn denied_message(self) -> &'static str {
        match self {
            Self::Register => MSG_REGISTRATION_DENIED,
            Self::Authenticate => MSG_AUTHENTICATION_DENIED,
            _ => MSG_OPERATION_DENIED,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch_credentials",
            Self::Register => "register_passkey",
            Self::Authenticate => "authenticate_with_passkey",
            Self::Delete => "delete_credential",
            Self::Update => "update_credential_name",
        };
        formatter.write_str(name)
    }
}

/// Produces the user-facing message for a failed operation.
#[must_use]
pub fn classify(err: &PasskeyError, operation: Operation) -> String {
    if let PasskeyError::Ceremony(ceremony) = err {
        if ceremony.kind == CeremonyErrorKind::NotAllowed {
            return operation.denied_message().to_string();
        }
        if ceremony.kind == CeremonyErrorKind::InvalidState && operation == Operation::Register {
            return MSG_ALREADY_REGISTERED.to_string();
        }
        if ceremony.kind == CeremonyErrorKind::Abort {
            return MSG_CANCELED.to_string();
        }
    }

    if is_timeout(err) {
        return MSG_TIMED_OUT.to_string();
    }

    if let PasskeyError::Http {
        message: Some(message),
        ..
    } = err
    {
        if !message.trim().is_empty() {
            return message.clone();
        }
    }

    let detail = err.detail();
    if detail.trim().is_empty() {
        operation.default_message().to_string()
    } else {
        detail
    }
}

/// Classifies the failure and logs the raw cause.
#[must_use]
pub fn report(err: &PasskeyError, operation: Operation) -> String {
    let message = classify(err, operation);
    error!(%operation, cause = ?err, "{operation} failed: {err}");
    message
}

fn is_timeout(err: &PasskeyError) -> bool {
    match err {
        PasskeyError::Ceremony(ceremony) => {
            ceremony.kind == CeremonyErrorKind::Timeout || ceremony.message.contains(TIMEOUT_MARKER)
        }
        PasskeyError::Timeout(_) => true,
        _ => false,
    }
}
