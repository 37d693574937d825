use web_sys::Storage;

use super::{KeyValueStore, PersistenceError, PersistenceResult};

/// Browser LocalStorage
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// LocalStorage of the current window, if the browser allows it
    pub fn open() -> PersistenceResult<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable {
                reason: "window.localStorage is not accessible".to_string(),
            })?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Unavailable {
                reason: format!("{:?}", e),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        // Quota exceeded and private-mode restrictions surface here
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::WriteRejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
