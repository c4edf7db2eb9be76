//! Secret resolution: fetch, decode, parse.
//!
//! Turns a raw store payload into a flat [`SecretMap`]. Payloads that decode
//! fine but are not a JSON object resolve to an empty map, so a target that
//! asks for keys simply sees them as absent.

use ::base64::Engine;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::store::{RawPayload, SecretStore};
use crate::core::types::SecretMap;
use crate::core::value::SecretValue;
use crate::error::{Result, SecretError};

/// Fetch and decode a secret into its text form.
///
/// Text payloads are returned as-is; binary payloads are base64-decoded and
/// must be UTF-8.
///
/// # Errors
///
/// Returns `SecretError::Fetch` from the store, or `SecretError::Decode` when
/// a binary payload is not valid base64 or not UTF-8.
pub fn fetch_text(
    store: &dyn SecretStore,
    identifier: &str,
    region: &str,
) -> Result<Zeroizing<String>> {
    debug!(identifier, region, store = store.name(), "fetching secret");
    let payload = store.fetch(identifier, region)?;
    decode(identifier, payload)
}

/// Resolve a secret into a [`SecretMap`].
///
/// # Errors
///
/// Same as [`fetch_text`]. A payload that is not a JSON object is not an
/// error; it yields an empty map.
pub fn resolve(store: &dyn SecretStore, identifier: &str, region: &str) -> Result<SecretMap> {
    let text = fetch_text(store, identifier, region)?;
    let map = parse(identifier, &text);
    debug!(identifier, keys = map.len(), "secret resolved");
    Ok(map)
}

/// Decode a raw payload into text.
pub fn decode(identifier: &str, payload: RawPayload) -> Result<Zeroizing<String>> {
    match payload {
        RawPayload::Text(text) => Ok(Zeroizing::new(text)),
        RawPayload::Binary(bytes) => {
            let decode_err = |reason: String| SecretError::Decode {
                identifier: identifier.to_string(),
                reason,
            };

            let trimmed: Vec<u8> = bytes
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            let decoded = Zeroizing::new(
                ::base64::engine::general_purpose::STANDARD
                    .decode(&trimmed)
                    .map_err(|e| decode_err(format!("invalid base64: {}", e)))?,
            );
            let text = String::from_utf8(decoded.to_vec())
                .map_err(|e| decode_err(format!("UTF-8 error: {}", e)))?;
            Ok(Zeroizing::new(text))
        }
    }
}

/// Parse decoded text as a flat JSON object.
///
/// Anything other than a JSON object yields an empty map.
pub fn parse(identifier: &str, text: &str) -> SecretMap {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(object)) => object
            .into_iter()
            .map(|(key, value)| (key, SecretValue::from(value)))
            .collect(),
        Ok(_) => {
            warn!(identifier, "secret payload is not a JSON object, no keys available");
            SecretMap::new()
        }
        Err(e) => {
            warn!(identifier, error = %e, "secret payload is not valid JSON, no keys available");
            SecretMap::new()
        }
    }
}
