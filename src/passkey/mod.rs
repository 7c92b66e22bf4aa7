//! Passkey (WebAuthn) client: backend API, platform boundary, outcome
//! classification, and the ceremony orchestrator that ties them together.
//!
//! ## Registration
//!
//! 1. **Options:** POST `/registration/options` with the display name and origin.
//! 2. **Ceremony:** the decoded options go to the [`Platform`] creation ceremony.
//! 3. **Verify:** the attestation is posted to `/registration/verify`, then the
//!    credential list is reloaded.
//!
//! ## Authentication
//!
//! 1. **Options:** POST `/authentication/options`; the response carries a
//!    `sessionId` that the verify call echoes back.
//! 2. **Ceremony:** the [`Platform`] retrieval ceremony signs the challenge.
//! 3. **Verify:** the assertion is posted to `/authentication/verify` and the
//!    backend's response is handed back untouched.

pub mod api;
pub mod ceremony;
mod client;
pub mod encoding;
pub mod error;
pub mod outcome;
pub mod platform;
pub mod relay;
pub mod state;
pub mod types;

pub use self::api::{ApiClient, ApiConfig};
pub use self::ceremony::PasskeyManager;
pub use self::error::{CeremonyError, CeremonyErrorKind, PasskeyError};
pub use self::outcome::Operation;
pub use self::platform::Platform;
pub use self::relay::RelayPlatform;
pub use self::state::{SessionState, SessionStore};
pub use self::types::Credential;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
