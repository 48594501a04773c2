//! Stored API key for the planner assistant.
//!
//! The key sits in the same key-value storage as everything else and is only
//! ever sent as the `x-api-key` request header.

use crate::error::Result;
use crate::storage::keys;
use crate::traits::KeyValueStore;

/// The stored key, if any.
///
/// # Errors
///
/// Returns an error if the storage cannot be read.
pub fn api_key(kv: &dyn KeyValueStore) -> Result<Option<String>> {
    Ok(kv.get(keys::API_KEY)?.filter(|k| !k.trim().is_empty()))
}

/// Store a key, trimmed. A blank key clears the stored one.
///
/// Returns whether a key is stored afterwards.
///
/// # Errors
///
/// Returns an error if the storage cannot be written.
pub fn set_api_key(kv: &dyn KeyValueStore, key: &str) -> Result<bool> {
    let key = key.trim();
    if key.is_empty() {
        clear_api_key(kv)?;
        return Ok(false);
    }
    kv.set(keys::API_KEY, key)?;
    Ok(true)
}

/// Remove the stored key.
///
/// # Errors
///
/// Returns an error if the storage cannot be written.
pub fn clear_api_key(kv: &dyn KeyValueStore) -> Result<()> {
    kv.remove(keys::API_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn test_set_trims_key() {
        let kv = MemoryStore::new();
        assert!(set_api_key(&kv, "  sk-ant-123 \n").unwrap());
        assert_eq!(api_key(&kv).unwrap().as_deref(), Some("sk-ant-123"));
    }

    #[test]
    fn test_blank_input_clears_key() {
        let kv = MemoryStore::new();
        set_api_key(&kv, "sk-ant-123").unwrap();

        assert!(!set_api_key(&kv, "   ").unwrap());
        assert!(api_key(&kv).unwrap().is_none());
        assert!(kv.get(keys::API_KEY).unwrap().is_none());
    }

    #[test]
    fn test_clear_without_key() {
        let kv = MemoryStore::new();
        clear_api_key(&kv).unwrap();
        assert!(api_key(&kv).unwrap().is_none());
    }
}
