use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// An API key: the key name and its private key
///
/// The private key is either a PEM-armored P-256 EC key or a base64-encoded
/// Ed25519 seed. Which one is decided when the key is used for signing.
///
/// Deserializes from both key file shapes in circulation:
/// `{"name": ..., "privateKey": ...}` and the legacy `{"id": ..., "secret": ...}`.
/// For each pair the first non-empty value wins, preferring the newer name.
///
/// # Example
/// ```rust
/// use cdpcurl::ApiKey;
///
/// let current: ApiKey = serde_json::from_str(r#"{"name": "k1", "privateKey": "pk"}"#).unwrap();
/// let legacy: ApiKey = serde_json::from_str(r#"{"id": "k1", "secret": "pk"}"#).unwrap();
/// assert_eq!(current.name(), legacy.name());
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "KeyFile")]
pub struct ApiKey {
    name: String,
    private_key: Secret<String>,
}

impl ApiKey {
    pub fn new(name: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            private_key: Secret::new(private_key.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn private_key(&self) -> &Secret<String> {
        &self.private_key
    }

    /// True when both the name and the private key are non-empty
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.private_key.expose_secret().is_empty()
    }
}

/// On-disk key file, accepting the current and the legacy field names
#[derive(Default, Deserialize)]
#[serde(default)]
struct KeyFile {
    name: String,
    id: String,
    #[serde(rename = "privateKey")]
    private_key: String,
    secret: String,
}

impl From<KeyFile> for ApiKey {
    fn from(file: KeyFile) -> Self {
        let name = if file.name.is_empty() { file.id } else { file.name };
        let private_key = if file.private_key.is_empty() {
            file.secret
        } else {
            file.private_key
        };
        ApiKey::new(name, private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_and_legacy_shapes_match() {
        let current: ApiKey =
            serde_json::from_str(r#"{"name": "organizations/o/apiKeys/k", "privateKey": "c2VjcmV0"}"#)
                .unwrap();
        let legacy: ApiKey =
            serde_json::from_str(r#"{"id": "organizations/o/apiKeys/k", "secret": "c2VjcmV0"}"#)
                .unwrap();

        assert_eq!(current.name(), legacy.name());
        assert_eq!(
            current.private_key().expose_secret(),
            legacy.private_key().expose_secret()
        );
    }

    #[test]
    fn test_new_field_names_take_precedence() {
        let key: ApiKey = serde_json::from_str(
            r#"{"name": "new", "id": "old", "privateKey": "new-pk", "secret": "old-pk"}"#,
        )
        .unwrap();
        assert_eq!(key.name(), "new");
        assert_eq!(key.private_key().expose_secret(), "new-pk");
    }

    #[test]
    fn test_empty_new_field_falls_back_to_legacy() {
        let key: ApiKey =
            serde_json::from_str(r#"{"name": "", "id": "old", "secret": "old-pk"}"#).unwrap();
        assert_eq!(key.name(), "old");
        assert_eq!(key.private_key().expose_secret(), "old-pk");
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let key: ApiKey = serde_json::from_str(r#"{"name": "only-name", "extra": 1}"#).unwrap();
        assert_eq!(key.name(), "only-name");
        assert!(!key.is_complete());
    }

    #[test]
    fn test_debug_does_not_leak_private_key() {
        let key = ApiKey::new("k", "super-secret-material");
        assert!(!format!("{key:?}").contains("super-secret-material"));
    }
}
