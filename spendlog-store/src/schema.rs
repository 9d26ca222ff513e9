//! Versioned list blobs.
//!
//! Lists are written as `{"schemaVersion": N, "items": [...]}`. A bare JSON
//! array is the unversioned layout written by the original web client and is
//! read as version 0.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::debug;

use crate::blob::BlobStore;
use crate::error::StoreError;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Version assigned to bare-array blobs.
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

/// A decoded list together with the version it was stored at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    /// Version found in the blob.
    pub version: u32,
    /// The list items.
    pub items: Vec<T>,
}

impl<T> Versioned<T> {
    /// Returns true if the blob predates the current schema.
    pub fn is_outdated(&self) -> bool {
        self.version < SCHEMA_VERSION
    }
}

/// Decodes a list blob, accepting both the envelope and a bare array.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedSchema`] for a newer version and
/// [`StoreError::Parse`] for values that are not lists.
pub fn decode_list<T: DeserializeOwned>(key: &str, value: Value) -> Result<Versioned<T>, StoreError> {
    match value {
        Value::Null => Ok(Versioned {
            version: SCHEMA_VERSION,
            items: Vec::new(),
        }),
        Value::Array(_) => {
            debug!(key, "Reading unversioned list blob");
            Ok(Versioned {
                version: LEGACY_SCHEMA_VERSION,
                items: serde_json::from_value(value)?,
            })
        }
        Value::Object(mut map) => {
            let version = map
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| StoreError::Parse(format!("{key}: missing schemaVersion")))?;
            if version > SCHEMA_VERSION {
                return Err(StoreError::UnsupportedSchema {
                    key: key.to_string(),
                    found: version,
                    supported: SCHEMA_VERSION,
                });
            }
            let items = map.remove("items").unwrap_or(Value::Array(Vec::new()));
            Ok(Versioned {
                version,
                items: serde_json::from_value(items)?,
            })
        }
        other => Err(StoreError::Parse(format!(
            "{key}: expected a list, found {other}"
        ))),
    }
}

/// Encodes a list in the current envelope.
///
/// # Errors
///
/// Returns error if an item fails to serialize.
pub fn encode_list<T: Serialize>(items: &[T]) -> Result<Value, StoreError> {
    Ok(json!({
        "schemaVersion": SCHEMA_VERSION,
        "items": serde_json::to_value(items)?,
    }))
}

/// Reads the list stored under `key`; an absent key is an empty list.
///
/// # Errors
///
/// Returns error if the blob store fails or the blob cannot be decoded.
pub async fn read_list<T: DeserializeOwned>(
    blob: &dyn BlobStore,
    key: &str,
) -> Result<Versioned<T>, StoreError> {
    match blob.get(key).await? {
        Some(value) => decode_list(key, value),
        None => Ok(Versioned {
            version: SCHEMA_VERSION,
            items: Vec::new(),
        }),
    }
}

/// Writes `items` under `key` in the current envelope.
///
/// # Errors
///
/// Returns error if serialization or the blob store fails.
pub async fn write_list<T: Serialize>(
    blob: &dyn BlobStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    blob.put(key, encode_list(items)?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_is_legacy() {
        let decoded: Versioned<u32> = decode_list("k", json!([1, 2, 3])).unwrap();
        assert_eq!(decoded.version, LEGACY_SCHEMA_VERSION);
        assert_eq!(decoded.items, vec![1, 2, 3]);
        assert!(decoded.is_outdated());
    }

    #[test]
    fn test_envelope_roundtrip() {
        let encoded = encode_list(&[4u32, 5]).unwrap();
        assert_eq!(encoded["schemaVersion"], SCHEMA_VERSION);

        let decoded: Versioned<u32> = decode_list("k", encoded).unwrap();
        assert_eq!(decoded.version, SCHEMA_VERSION);
        assert_eq!(decoded.items, vec![4, 5]);
        assert!(!decoded.is_outdated());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let err = decode_list::<u32>("k", json!({"schemaVersion": 99, "items": []})).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedSchema { found: 99, .. }));
    }

    #[test]
    fn test_missing_version_rejected() {
        assert!(matches!(
            decode_list::<u32>("k", json!({"items": []})),
            Err(StoreError::Parse(_))
        ));
    }

    #[test]
    fn test_scalar_rejected() {
        assert!(decode_list::<u32>("k", json!("nope")).is_err());
    }

    #[test]
    fn test_null_is_empty() {
        let decoded: Versioned<u32> = decode_list("k", Value::Null).unwrap();
        assert!(decoded.items.is_empty());
    }
}
