//! Passkey ceremony orchestration.
//!
//! ### Flow Overview
//! 1. **Options**: ask the backend for a single-use challenge (`/registration/options`
//!    or `/authentication/options`).
//! 2. **Preparation**: decode the base64url fields into binary platform requests.
//! 3. **Interaction**: run the platform ceremony, which may wait on the user.
//! 4. **Finalization**: re-encode the authenticator output and post it to the
//!    matching `verify` endpoint.
//!
//! Every operation runs under the store's busy guard: `loading` is set and the
//! previous error cleared on entry, a failure is classified into `error` and
//! returned unchanged to the caller, and `loading` is released on every exit.

use super::{
    api::ApiClient,
    encoding::encode,
    error::PasskeyError,
    outcome::{self, Operation},
    platform::{AssertionRequest, CreationRequest, Platform},
    state::SessionStore,
    types::{
        AuthenticationOptionsRequest, AuthenticationVerifyRequest, Credential,
        RegistrationOptionsRequest, RegistrationVerifyRequest, UpdateCredentialRequest,
    },
};
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tracing::{debug, info, instrument};

pub struct PasskeyManager {
    api: ApiClient,
    platform: Arc<dyn Platform>,
    origin: String,
    store: SessionStore,
}

impl PasskeyManager {
    /// `origin` is sent with every ceremony so the backend can check it against
    /// the client data.
    pub fn new(api: ApiClient, platform: Arc<dyn Platform>, origin: impl Into<String>) -> Self {
        Self {
            api,
            platform,
            origin: origin.into(),
            store: SessionStore::new(),
        }
    }

    /// Read side of the session state.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.platform.is_supported()
    }

    /// Reloads the credential list from the backend.
    ///
    /// # Errors
    /// Returns the transport, HTTP, or parse failure; the classified message is
    /// stored in the session state.
    #[instrument(skip(self))]
    pub async fn fetch_credentials(&self) -> Result<(), PasskeyError> {
        self.run(Operation::Fetch, self.refresh()).await
    }

    /// Registers a new passkey and refreshes the list. Returns `true` once the
    /// backend accepted the attestation.
    ///
    /// # Errors
    /// Returns `PasskeyError::Unsupported` without touching state when the
    /// platform has no public-key credential support. Any other failure is
    /// classified into the session state and returned.
    #[instrument(skip(self))]
    pub async fn register_passkey(&self, display_name: Option<&str>) -> Result<bool, PasskeyError> {
        if !self.is_supported() {
            return Err(PasskeyError::Unsupported);
        }

        self.run(Operation::Register, async {
            let display_name = display_name.map(str::to_string);

            let options = self
                .api
                .registration_options(&RegistrationOptionsRequest {
                    display_name: display_name.clone(),
                    origin: self.origin.clone(),
                })
                .await?;

            let request = CreationRequest::from_options(&options)?;
            debug!(
                rp = %request.rp.id,
                excluded = request.exclude_credentials.len(),
                "starting creation ceremony"
            );

            let credential = self
                .platform
                .create(&request)
                .await?
                .ok_or(PasskeyError::CreationFailed)?;

            let verify = RegistrationVerifyRequest {
                credential_id: encode(&credential.raw_id),
                attestation_object: encode(&credential.attestation_object),
                client_data_json: encode(&credential.client_data_json),
                transports: credential.transports.unwrap_or_default(),
                display_name,
                origin: self.origin.clone(),
            };
            let registered = self.api.registration_verify(&verify).await?;
            info!(
                name = registered.name.as_deref().unwrap_or_default(),
                "passkey registered"
            );

            self.refresh().await?;
            Ok(true)
        })
        .await
    }

    /// Signs in with a passkey and returns the backend's verify response as-is.
    /// The credential list is not refreshed.
    ///
    /// # Errors
    /// Same contract as [`PasskeyManager::register_passkey`].
    #[instrument(skip(self))]
    pub async fn authenticate_with_passkey(
        &self,
        username: Option<&str>,
    ) -> Result<Value, PasskeyError> {
        if !self.is_supported() {
            return Err(PasskeyError::Unsupported);
        }

        self.run(Operation::Authenticate, async {
            let options = self
                .api
                .authentication_options(&AuthenticationOptionsRequest {
                    username: username.map(str::to_string),
                    origin: self.origin.clone(),
                })
                .await?;

            let request = AssertionRequest::from_options(&options)?;
            debug!(
                rp_id = %request.rp_id,
                discoverable = request.allow_credentials.is_none(),
                "starting retrieval ceremony"
            );

            let credential = self
                .platform
                .get(&request)
                .await?
                .ok_or(PasskeyError::RetrievalFailed)?;

            let verify = AuthenticationVerifyRequest {
                session_id: options.session_id,
                credential_id: encode(&credential.raw_id),
                authenticator_data: encode(&credential.authenticator_data),
                client_data_json: encode(&credential.client_data_json),
                signature: encode(&credential.signature),
                user_handle: credential.user_handle.as_deref().map(encode),
                origin: self.origin.clone(),
            };

            let response = self.api.authentication_verify(&verify).await?;
            info!("passkey authentication verified");
            Ok(response)
        })
        .await
    }

    /// Deletes a passkey by resource name (not its credential id) and refreshes
    /// the list.
    ///
    /// # Errors
    /// Returns the transport or HTTP failure; the classified message is stored.
    #[instrument(skip(self))]
    pub async fn delete_credential(&self, name: &str) -> Result<(), PasskeyError> {
        self.run(Operation::Delete, async {
            self.api.delete_credential(name).await?;
            self.refresh().await
        })
        .await
    }

    /// Renames a passkey and refreshes the list.
    ///
    /// # Errors
    /// Returns the transport or HTTP failure; the classified message is stored.
    #[instrument(skip(self))]
    pub async fn update_credential_name(
        &self,
        name: &str,
        display_name: &str,
    ) -> Result<(), PasskeyError> {
        self.run(Operation::Update, async {
            let request = UpdateCredentialRequest {
                display_name: display_name.to_string(),
            };
            self.api.update_credential(name, &request).await?;
            self.refresh().await
        })
        .await
    }

    /// Runs `body` under the busy guard, storing the classified message on failure.
    async fn run<T>(
        &self,
        operation: Operation,
        body: impl Future<Output = Result<T, PasskeyError>>,
    ) -> Result<T, PasskeyError> {
        let _busy = self.store.acquire().await;
        match body.await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.store.set_error(outcome::report(&err, operation));
                Err(err)
            }
        }
    }

    /// Fetches and swaps in the credential list. Callers hold the busy guard.
    async fn refresh(&self) -> Result<(), PasskeyError> {
        let credentials: Vec<Credential> = self
            .api
            .list_credentials()
            .await?
            .into_iter()
            .map(Credential::from)
            .collect();
        debug!(count = credentials.len(), "credential list refreshed");
        self.store.set_credentials(credentials);
        Ok(())
    }
}
