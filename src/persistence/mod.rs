//! Local key-value persistence
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, fallback when storage is unavailable)
//! - `FileStore`: one file per key in a directory (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

mod file;
mod memory;
#[cfg(target_arch = "wasm32")]
mod local_storage;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage-layer errors
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// String key-value store, the shape of browser LocalStorage
pub trait KeyValueStore {
    /// Value for `key`, `None` if absent
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).set(key, value)
    }
}
