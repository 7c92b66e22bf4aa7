//! Base64URL transcoding between the backend's wire strings and the binary
//! buffers the platform credential API works with. The wire form is URL-safe and
//! never padded; decoding also tolerates padded input.

use super::error::PasskeyError;
use base64ct::{Base64, Base64UrlUnpadded, Encoding};

/// Encodes bytes as URL-safe base64 without `=` padding.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decodes a URL-safe (optionally unpadded) base64 string.
///
/// # Errors
/// Returns `PasskeyError::Encoding` if the input is not valid base64.
pub fn decode(text: &str) -> Result<Vec<u8>, PasskeyError> {
    let mut standard: String = text
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat('=').take(padding));

    Base64::decode_vec(&standard)
        .map_err(|err| PasskeyError::Encoding(format!("Invalid base64url value: {err}")))
}

/// Serde helpers for binary fields carried as base64url strings.
pub mod base64url {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::decode(&text).map_err(D::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer, de::Error};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            bytes: &Option<Vec<u8>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match bytes {
                Some(bytes) => serializer.serialize_str(&super::super::encode(bytes)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<u8>>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| super::super::decode(&text).map_err(D::Error::custom))
                .transpose()
        }
    }
}
