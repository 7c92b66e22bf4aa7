//! Types for passkey API requests and responses, and the credential shape
//! handed to consumers.

use serde::{Deserialize, Serialize};

/// A registered passkey, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub metadata: CredentialMetadata,
    pub spec: CredentialSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialMetadata {
    pub name: String,
    pub creation_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSpec {
    pub username: String,
    pub credential_id: String,
    pub public_key: String,
    pub signature_count: u64,
    pub display_name: String,
    pub aaguid: String,
    pub discoverable: bool,
    pub user_verified: bool,
    pub backup_eligible: bool,
    pub backed_up: bool,
    pub transports: Vec<String>,
    pub created_at: String,
    pub last_used_at: Option<String>,
}

/// A credential as returned by `GET /credentials`. The list endpoint only sends
/// a subset of the fields; anything missing takes its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialRecord {
    pub name: String,
    pub credential_id: String,
    pub display_name: Option<String>,
    pub created_at: Option<String>,
    pub last_used_at: Option<String>,
    pub backed_up: Option<bool>,
    pub transports: Option<Vec<String>>,
    pub username: Option<String>,
    pub public_key: Option<String>,
    pub signature_count: Option<u64>,
    pub aaguid: Option<String>,
    pub discoverable: Option<bool>,
    pub user_verified: Option<bool>,
    pub backup_eligible: Option<bool>,
}

impl From<CredentialRecord> for Credential {
    fn from(record: CredentialRecord) -> Self {
        let created_at = record.created_at.unwrap_or_default();
        Self {
            metadata: CredentialMetadata {
                name: record.name,
                creation_timestamp: created_at.clone(),
            },
            spec: CredentialSpec {
                username: record.username.unwrap_or_default(),
                credential_id: record.credential_id,
                public_key: record.public_key.unwrap_or_default(),
                signature_count: record.signature_count.unwrap_or(0),
                display_name: record.display_name.unwrap_or_default(),
                aaguid: record.aaguid.unwrap_or_default(),
                discoverable: record.discoverable.unwrap_or(false),
                user_verified: record.user_verified.unwrap_or(false),
                backup_eligible: record.backup_eligible.unwrap_or(false),
                backed_up: record.backed_up.unwrap_or(false),
                transports: record.transports.unwrap_or_default(),
                created_at,
                last_used_at: record.last_used_at,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialListResponse {
    #[serde(default)]
    pub credentials: Option<Vec<CredentialRecord>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelyingParty {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub type_: String,
    pub alg: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<String>,
    pub resident_key: String,
    pub user_verification: String,
}

/// Server-issued registration challenge. Single use: a new attempt needs a
/// fresh fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptions {
    pub challenge: String,
    pub rp: RelyingParty,
    pub user: UserEntity,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout: u64,
    pub authenticator_selection: AuthenticatorSelection,
    #[serde(default)]
    pub exclude_credentials: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationVerifyRequest {
    pub credential_id: String,
    pub attestation_object: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub transports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub origin: String,
}

/// Body of a successful `/registration/verify`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationVerifyResponse {
    pub name: Option<String>,
    pub credential_id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptionsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub origin: String,
}

/// Server-issued authentication challenge. `session_id` ties it to the verify
/// call and must be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptions {
    pub challenge: String,
    pub rp_id: String,
    pub timeout: u64,
    pub user_verification: String,
    #[serde(default)]
    pub allow_credentials: Vec<String>,
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationVerifyRequest {
    pub session_id: String,
    pub credential_id: String,
    pub authenticator_data: String,
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    pub signature: String,
    /// Serialized as `null` when the authenticator returned no handle.
    pub user_handle: Option<String>,
    pub origin: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialRequest {
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_record_maps_to_fully_populated_credential() {
        let record: CredentialRecord = serde_json::from_value(json!({
            "name": "passkey-1",
            "credentialId": "AQID",
            "createdAt": "2024-05-01T10:00:00Z",
            "backedUp": true
        }))
        .unwrap();
        let credential = Credential::from(record);

        assert_eq!(credential.metadata.name, "passkey-1");
        assert_eq!(credential.metadata.creation_timestamp, "2024-05-01T10:00:00Z");
        assert_eq!(credential.spec.username, "");
        assert_eq!(credential.spec.public_key, "");
        assert_eq!(credential.spec.aaguid, "");
        assert_eq!(credential.spec.display_name, "");
        assert_eq!(credential.spec.signature_count, 0);
        assert!(!credential.spec.discoverable);
        assert!(!credential.spec.user_verified);
        assert!(!credential.spec.backup_eligible);
        assert!(credential.spec.backed_up);
        assert!(credential.spec.transports.is_empty());
        assert_eq!(credential.spec.last_used_at, None);
    }

    #[test]
    fn null_fields_are_defaulted_too() {
        let record: CredentialRecord = serde_json::from_value(json!({
            "name": "passkey-2",
            "credentialId": "BAUG",
            "displayName": null,
            "lastUsedAt": null,
            "transports": null
        }))
        .unwrap();
        let credential = Credential::from(record);
        assert_eq!(credential.spec.display_name, "");
        assert!(credential.spec.transports.is_empty());
        assert_eq!(credential.spec.last_used_at, None);
    }

    #[test]
    fn authentication_verify_keeps_null_user_handle() {
        let request = AuthenticationVerifyRequest {
            session_id: "s-1".into(),
            credential_id: "id".into(),
            authenticator_data: "ad".into(),
            client_data_json: "cd".into(),
            signature: "sig".into(),
            user_handle: None,
            origin: "https://blog.example".into(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["userHandle"], serde_json::Value::Null);
        assert!(value.as_object().unwrap().contains_key("userHandle"));
        assert_eq!(value["clientDataJSON"], "cd");
        assert_eq!(value["sessionId"], "s-1");
    }

    #[test]
    fn registration_options_parse_wire_shape() {
        let options: RegistrationOptions = serde_json::from_value(json!({
            "challenge": "Y2hhbGxlbmdl",
            "rp": { "id": "blog.example", "name": "Blog" },
            "user": { "id": "dXNlcg", "name": "alice", "displayName": "Alice" },
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
            "timeout": 60000,
            "authenticatorSelection": {
                "residentKey": "preferred",
                "userVerification": "required"
            },
            "excludeCredentials": ["AQID"]
        }))
        .unwrap();
        assert_eq!(options.user.display_name, "Alice");
        assert_eq!(options.pub_key_cred_params[0].alg, -7);
        assert_eq!(options.authenticator_selection.authenticator_attachment, None);
        assert_eq!(options.exclude_credentials, vec!["AQID".to_string()]);
    }
}
