//! Browser LocalStorage backend

use anyhow::{Result, anyhow};

use super::KeyValueStore;

/// `window.localStorage`; every call is a no-op when storage is unavailable
/// (private browsing, sandboxed iframes)
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage = Self::storage().ok_or_else(|| anyhow!("localStorage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|e| anyhow!("localStorage.setItem({key}) failed: {e:?}"))
    }
}
