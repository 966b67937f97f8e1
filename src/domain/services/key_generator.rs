//! API Key Generator
//!
//! Mints consumer keys for the gateway's key-auth plugin.

use crate::domain::value_objects::ApiKey;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Length of generated keys, in characters.
pub const KEY_LENGTH: usize = 32;

/// Generate a random URL-safe key.
///
/// Keys are bearer credentials, so characters are drawn from the operating
/// system CSPRNG rather than a seeded generator.
pub fn generate_key() -> ApiKey {
    let key: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect();
    ApiKey::new(key)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_length() {
        assert_eq!(generate_key().len(), KEY_LENGTH);
    }

    #[test]
    fn test_key_is_url_safe() {
        let key = generate_key();
        assert!(key.expose().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys: HashSet<String> = (0..100)
            .map(|_| generate_key().expose().to_string())
            .collect();
        assert_eq!(keys.len(), 100);
    }
}
