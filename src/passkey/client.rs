//! Client helpers for the passkey endpoints.

use super::{
    api::ApiClient,
    error::PasskeyError,
    types::{
        AuthenticationOptions, AuthenticationOptionsRequest, AuthenticationVerifyRequest,
        CredentialListResponse, CredentialRecord, RegistrationOptions, RegistrationOptionsRequest,
        RegistrationVerifyRequest, RegistrationVerifyResponse, UpdateCredentialRequest,
    },
};
use serde_json::Value;

impl ApiClient {
    /// List the passkeys of the current user.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    pub async fn list_credentials(&self) -> Result<Vec<CredentialRecord>, PasskeyError> {
        let response: CredentialListResponse = self.get_json(&["credentials"]).await?;
        Ok(response.credentials.unwrap_or_default())
    }

    /// Request registration options for a new passkey.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    pub async fn registration_options(
        &self,
        request: &RegistrationOptionsRequest,
    ) -> Result<RegistrationOptions, PasskeyError> {
        self.post_json(&["registration", "options"], request).await
    }

    /// Submit the attestation produced by the platform.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    pub async fn registration_verify(
        &self,
        request: &RegistrationVerifyRequest,
    ) -> Result<RegistrationVerifyResponse, PasskeyError> {
        self.post_json(&["registration", "verify"], request).await
    }

    /// Request an authentication challenge.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    pub async fn authentication_options(
        &self,
        request: &AuthenticationOptionsRequest,
    ) -> Result<AuthenticationOptions, PasskeyError> {
        self.post_json(&["authentication", "options"], request).await
    }

    /// Submit the assertion produced by the platform. The body is returned as-is.
    ///
    /// # Errors
    /// Returns a transport, HTTP, or parse error.
    pub async fn authentication_verify(
        &self,
        request: &AuthenticationVerifyRequest,
    ) -> Result<Value, PasskeyError> {
        self.post_json(&["authentication", "verify"], request).await
    }

    /// Delete a passkey by its resource name.
    ///
    /// # Errors
    /// Returns a transport or HTTP error.
    pub async fn delete_credential(&self, name: &str) -> Result<(), PasskeyError> {
        self.delete(&["credentials", name]).await
    }

    /// Rename a passkey.
    ///
    /// # Errors
    /// Returns a transport or HTTP error.
    pub async fn update_credential(
        &self,
        name: &str,
        request: &UpdateCredentialRequest,
    ) -> Result<(), PasskeyError> {
        self.put_json(&["credentials", name], request).await
    }
}
