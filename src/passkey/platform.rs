//! Platform authenticator boundary.
//!
//! The orchestrator never talks to an authenticator directly. It converts the
//! server's options into the binary request types below and hands them to a
//! [`Platform`], which runs the interactive ceremony and returns the raw result.
//!
//! ### Absent versus empty
//! `AssertionRequest::allow_credentials` is `None` when the server sent an empty
//! allow-list. `None` tells the authenticator to offer discoverable credentials;
//! `Some(vec![])` would be an allow-list that matches nothing.

use super::{
    encoding::{self, base64url},
    error::PasskeyError,
    types::{
        AuthenticationOptions, AuthenticatorSelection, PubKeyCredParam, RegistrationOptions,
        RelyingParty,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";
/// The backend only needs the public key, never an attestation trust chain.
pub const ATTESTATION_NONE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUser {
    #[serde(with = "base64url")]
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDescriptor {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(with = "base64url")]
    pub id: Vec<u8>,
}

impl CredentialDescriptor {
    fn public_key(id: Vec<u8>) -> Self {
        Self {
            type_: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            id,
        }
    }
}

/// Decoded input for the credential-creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    #[serde(with = "base64url")]
    pub challenge: Vec<u8>,
    pub rp: RelyingParty,
    pub user: PlatformUser,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout: u64,
    pub authenticator_selection: AuthenticatorSelection,
    pub exclude_credentials: Vec<CredentialDescriptor>,
    pub attestation: String,
}

impl CreationRequest {
    /// Decodes server registration options into a platform request.
    ///
    /// # Errors
    /// Returns `PasskeyError::Encoding` if the challenge, user id, or an excluded
    /// credential id is not valid base64url.
    pub fn from_options(options: &RegistrationOptions) -> Result<Self, PasskeyError> {
        let exclude_credentials = options
            .exclude_credentials
            .iter()
            .map(|id| encoding::decode(id).map(CredentialDescriptor::public_key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            challenge: encoding::decode(&options.challenge)?,
            rp: options.rp.clone(),
            user: PlatformUser {
                id: encoding::decode(&options.user.id)?,
                name: options.user.name.clone(),
                display_name: options.user.display_name.clone(),
            },
            pub_key_cred_params: options.pub_key_cred_params.clone(),
            timeout: options.timeout,
            authenticator_selection: options.authenticator_selection.clone(),
            exclude_credentials,
            attestation: ATTESTATION_NONE.to_string(),
        })
    }
}

/// Decoded input for the credential-retrieval ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionRequest {
    #[serde(with = "base64url")]
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub timeout: u64,
    pub user_verification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<CredentialDescriptor>>,
}

impl AssertionRequest {
    /// Decodes server authentication options into a platform request.
    ///
    /// # Errors
    /// Returns `PasskeyError::Encoding` if the challenge or an allowed credential
    /// id is not valid base64url.
    pub fn from_options(options: &AuthenticationOptions) -> Result<Self, PasskeyError> {
        let allow_credentials = if options.allow_credentials.is_empty() {
            None
        } else {
            Some(
                options
                    .allow_credentials
                    .iter()
                    .map(|id| encoding::decode(id).map(CredentialDescriptor::public_key))
                    .collect::<Result<Vec<_>, _>>()?,
            )
        };

        Ok(Self {
            challenge: encoding::decode(&options.challenge)?,
            rp_id: options.rp_id.clone(),
            timeout: options.timeout,
            user_verification: options.user_verification.clone(),
            allow_credentials,
        })
    }
}

/// Result of a creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationCredential {
    #[serde(with = "base64url")]
    pub raw_id: Vec<u8>,
    #[serde(with = "base64url")]
    pub attestation_object: Vec<u8>,
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Vec<u8>,
    /// `None` when the platform does not expose transport hints.
    #[serde(default)]
    pub transports: Option<Vec<String>>,
}

/// Result of a retrieval ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionCredential {
    #[serde(with = "base64url")]
    pub raw_id: Vec<u8>,
    #[serde(with = "base64url")]
    pub authenticator_data: Vec<u8>,
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Vec<u8>,
    #[serde(with = "base64url")]
    pub signature: Vec<u8>,
    #[serde(default, with = "base64url::option")]
    pub user_handle: Option<Vec<u8>>,
}

/// A platform that can run WebAuthn ceremonies.
///
/// Ceremonies may suspend for as long as the user takes; the platform enforces
/// the `timeout` hint. `Ok(None)` means the platform finished without producing
/// a credential, which is distinct from a cancellation error.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Whether public-key credentials are available at all.
    fn is_supported(&self) -> bool;

    async fn create(
        &self,
        request: &CreationRequest,
    ) -> Result<Option<AttestationCredential>, PasskeyError>;

    async fn get(
        &self,
        request: &AssertionRequest,
    ) -> Result<Option<AssertionCredential>, PasskeyError>;
}
