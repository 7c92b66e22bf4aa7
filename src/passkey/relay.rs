//! Platform adapter that relays ceremonies to an external authenticator command.
//!
//! The command receives one JSON document on stdin:
//! `{"type": "webauthn.create" | "webauthn.get", "publicKey": {...}}` where every
//! binary field is base64url text. It answers on stdout with either
//! `{"credential": {...}}`, `{"credential": null}` when no credential was
//! produced, or `{"error": {"name": "NotAllowedError", "message": "..."}}`.

use super::{
    error::{CeremonyError, CeremonyErrorKind, PasskeyError},
    platform::{
        AssertionCredential, AssertionRequest, AttestationCredential, CreationRequest, Platform,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::process::Stdio;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, instrument};

const CREATE: &str = "webauthn.create";
const GET: &str = "webauthn.get";

#[derive(Serialize)]
struct RelayRequest<'a, T> {
    #[serde(rename = "type")]
    type_: &'static str,
    #[serde(rename = "publicKey")]
    public_key: &'a T,
}

#[derive(Deserialize)]
struct RelayResponse<T> {
    credential: Option<T>,
    #[serde(default)]
    error: Option<RelayError>,
}

#[derive(Deserialize)]
struct RelayError {
    name: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Default)]
pub struct RelayPlatform {
    program: Option<String>,
    args: Vec<String>,
}

impl RelayPlatform {
    /// Builds a relay from a whitespace-separated command line. `None` or a
    /// blank command yields a platform without passkey support.
    #[must_use]
    pub fn new(command: Option<&str>) -> Self {
        let mut parts = command.unwrap_or_default().split_whitespace().map(str::to_string);
        match parts.next() {
            Some(program) => Self::from_args(program, parts.collect()),
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn from_args(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: Some(program.into()),
            args,
        }
    }

    #[instrument(skip(self, public_key), fields(program = ?self.program))]
    async fn relay<R: Serialize + Sync, T: DeserializeOwned>(
        &self,
        type_: &'static str,
        public_key: &R,
    ) -> Result<Option<T>, PasskeyError> {
        let program = self.program.as_deref().ok_or(PasskeyError::Unsupported)?;

        let payload = serde_json::to_vec(&RelayRequest { type_, public_key }).map_err(|err| {
            PasskeyError::Serialization(format!("Failed to encode request: {err}"))
        })?;

        let mut child = Command::new(program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                PasskeyError::Config(format!("Failed to start authenticator {program}: {err}"))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await.map_err(|err| {
                PasskeyError::Config(format!("Failed to write to authenticator: {err}"))
            })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| PasskeyError::Config(format!("Authenticator did not finish: {err}")))?;
        debug!(status = %output.status, "authenticator exited");

        if !output.status.success() && output.stdout.iter().all(u8::is_ascii_whitespace) {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CeremonyError::new(
                CeremonyErrorKind::Other("AuthenticatorError".to_string()),
                stderr,
            )
            .into());
        }

        parse_response(&output.stdout)
    }
}

/// Parses the authenticator's stdout into a credential, no credential, or a
/// ceremony error.
fn parse_response<T: DeserializeOwned>(stdout: &[u8]) -> Result<Option<T>, PasskeyError> {
    let response: RelayResponse<T> = serde_json::from_slice(stdout).map_err(|err| {
        PasskeyError::Parse(format!("Invalid authenticator response: {err}"))
    })?;

    if let Some(error) = response.error {
        let kind = CeremonyErrorKind::from_name(&error.name);
        return Err(CeremonyError::new(kind, error.message).into());
    }

    Ok(response.credential)
}

#[async_trait]
impl Platform for RelayPlatform {
    fn is_supported(&self) -> bool {
        self.program.is_some()
    }

    async fn create(
        &self,
        request: &CreationRequest,
    ) -> Result<Option<AttestationCredential>, PasskeyError> {
        self.relay(CREATE, request).await
    }

    async fn get(
        &self,
        request: &AssertionRequest,
    ) -> Result<Option<AssertionCredential>, PasskeyError> {
        self.relay(GET, request).await
    }
}
