//! Storage key derivation.
//!
//! Key format: `{aspect}/{id}.{ext}` when an aspect class is known, `{id}.{ext}`
//! otherwise.

use base64::Engine;
use rand::RngCore;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::AspectClass;

/// Number of random bytes behind every key (256 bits).
pub const KEY_ENTROPY_BYTES: usize = 32;

/// An immutable object storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Derive a fresh key from the thread-local CSPRNG.
    pub fn generate(aspect: Option<AspectClass>, extension: &str) -> Self {
        let mut bytes = [0u8; KEY_ENTROPY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self::from_random_bytes(&bytes, aspect, extension)
    }

    /// Build a key from caller-supplied random bytes.
    pub fn from_random_bytes(
        bytes: &[u8; KEY_ENTROPY_BYTES],
        aspect: Option<AspectClass>,
        extension: &str,
    ) -> Self {
        let id = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        let extension = extension.trim_start_matches('.');
        match aspect {
            Some(class) => StorageKey(format!("{}/{}.{}", class.as_str(), id, extension)),
            None => StorageKey(format!("{}.{}", id, extension)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading path segment, i.e. the aspect class for prefixed keys.
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once('/').map(|(prefix, _)| prefix)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_prefixed_with_aspect_class() {
        let bytes = [0u8; KEY_ENTROPY_BYTES];
        let key = StorageKey::from_random_bytes(&bytes, Some(AspectClass::Landscape), "mp4");
        assert_eq!(key.as_str(), format!("landscape/{}.mp4", "A".repeat(43)));
        assert_eq!(key.prefix(), Some("landscape"));
    }

    #[test]
    fn test_key_without_aspect_has_no_prefix() {
        let bytes = [0xffu8; KEY_ENTROPY_BYTES];
        let key = StorageKey::from_random_bytes(&bytes, None, ".png");
        assert!(key.as_str().ends_with(".png"));
        assert!(!key.as_str().contains('/'));
        assert_eq!(key.prefix(), None);
    }

    #[test]
    fn test_key_is_url_safe() {
        let bytes: [u8; KEY_ENTROPY_BYTES] = std::array::from_fn(|i| (i as u8).wrapping_mul(37) | 0xf8);
        let key = StorageKey::from_random_bytes(&bytes, Some(AspectClass::Portrait), "mp4");
        let id = key
            .as_str()
            .trim_start_matches("portrait/")
            .trim_end_matches(".mp4");
        assert_eq!(id.len(), 43);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let a = StorageKey::generate(Some(AspectClass::Other), "mp4");
        let b = StorageKey::generate(Some(AspectClass::Other), "mp4");
        assert_ne!(a, b);
        assert_eq!(a.prefix(), Some("other"));
    }
}
