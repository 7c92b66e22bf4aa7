//! Failure model for passkey operations. Every failure that can reach the outcome
//! classifier is one of these variants, so classification is a plain `match`
//! instead of probing fields on an unknown value.

use std::fmt;
use thiserror::Error;

/// Condition names reported by a platform authenticator ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CeremonyErrorKind {
    /// The user declined, closed the prompt, or the OS denied the request.
    NotAllowed,
    /// A credential from `excludeCredentials` already lives on the authenticator.
    InvalidState,
    /// The ceremony was aborted (navigation, abort signal).
    Abort,
    /// The ceremony exceeded its timeout.
    Timeout,
    Security,
    NotSupported,
    Other(String),
}

impl CeremonyErrorKind {
    /// Maps a DOMException-style name (`NotAllowedError`, ...) to a kind.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "InvalidStateError" => Self::InvalidState,
            "AbortError" => Self::Abort,
            "TimeoutError" => Self::Timeout,
            "SecurityError" => Self::Security,
            "NotSupportedError" => Self::NotSupported,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotAllowed => "NotAllowedError",
            Self::InvalidState => "InvalidStateError",
            Self::Abort => "AbortError",
            Self::Timeout => "TimeoutError",
            Self::Security => "SecurityError",
            Self::NotSupported => "NotSupportedError",
            Self::Other(name) => name,
        }
    }
}

/// A failure raised by the platform's credential ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyError {
    pub kind: CeremonyErrorKind,
    pub message: String,
}

impl CeremonyError {
    pub fn new(kind: CeremonyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CeremonyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(formatter, "{}", self.kind.name())
        } else {
            write!(formatter, "{}: {}", self.kind.name(), self.message)
        }
    }
}

impl std::error::Error for CeremonyError {}

#[derive(Debug, Error)]
pub enum PasskeyError {
    #[error("Passkeys are not supported on this platform")]
    Unsupported,
    #[error("Ceremony error: {0}")]
    Ceremony(#[from] CeremonyError),
    #[error("Failed to create credential")]
    CreationFailed,
    #[error("Failed to get credential")]
    RetrievalFailed,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {body}")]
    Http {
        status: u16,
        /// `message` field of a structured backend error, if the body had one.
        message: Option<String>,
        /// Sanitized response body.
        body: String,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl PasskeyError {
    /// The human-readable detail of the failure, without the variant prefix.
    /// Empty when the failure carries no message of its own.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Ceremony(err) => err.message.clone(),
            Self::Network(message)
            | Self::Timeout(message)
            | Self::Parse(message)
            | Self::Serialization(message)
            | Self::Encoding(message)
            | Self::Config(message) => message.clone(),
            // The body stays in logs; it may be an HTML proxy page.
            Self::Http { status, .. } => format!("Request failed with status code {status}"),
            Self::Unsupported | Self::CreationFailed | Self::RetrievalFailed => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CeremonyError, CeremonyErrorKind, PasskeyError};

    #[test]
    fn ceremony_kind_parses_dom_exception_names() {
        assert_eq!(
            CeremonyErrorKind::from_name("NotAllowedError"),
            CeremonyErrorKind::NotAllowed
        );
        assert_eq!(
            CeremonyErrorKind::from_name("InvalidStateError"),
            CeremonyErrorKind::InvalidState
        );
        assert_eq!(
            CeremonyErrorKind::from_name("ConstraintError"),
            CeremonyErrorKind::Other("ConstraintError".to_string())
        );
        assert_eq!(CeremonyErrorKind::Abort.name(), "AbortError");
    }

    #[test]
    fn ceremony_error_display_includes_name_and_message() {
        let err = CeremonyError::new(CeremonyErrorKind::NotAllowed, "user closed the dialog");
        assert_eq!(err.to_string(), "NotAllowedError: user closed the dialog");
        let err = CeremonyError::new(CeremonyErrorKind::Abort, "");
        assert_eq!(err.to_string(), "AbortError");
    }

    #[test]
    fn detail_strips_variant_prefix() {
        assert_eq!(PasskeyError::Network("refused".into()).detail(), "refused");
        let http = PasskeyError::Http {
            status: 500,
            message: None,
            body: String::new(),
        };
        assert_eq!(http.detail(), "Request failed with status code 500");
    }

    #[test]
    fn http_detail_never_exposes_the_body() {
        let http = PasskeyError::Http {
            status: 502,
            message: None,
            body: "<html><body><h1>502 Bad Gateway</h1></body></html>".to_string(),
        };
        assert_eq!(http.detail(), "Request failed with status code 502");
    }
}
