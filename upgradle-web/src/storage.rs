//! `localStorage`-backed persistence for the game engine.
use upgradle_game::GameStorage;

use crate::dom::{js_error_message, local_storage};

/// Web-specific game storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebGameStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl GameStorage for WebGameStorage {
    type Error = WebStorageError;

    fn save_snapshot(&self, key: &str, snapshot: &str) -> Result<(), Self::Error> {
        let storage =
            local_storage().map_err(|e| WebStorageError::Unavailable(js_error_message(&e)))?;
        storage
            .set_item(key, snapshot)
            .map_err(|e| WebStorageError::Storage(js_error_message(&e)))
    }

    fn load_snapshot(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let storage =
            local_storage().map_err(|e| WebStorageError::Unavailable(js_error_message(&e)))?;
        storage
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(js_error_message(&e)))
    }

    fn delete_snapshot(&self, key: &str) -> Result<(), Self::Error> {
        let storage =
            local_storage().map_err(|e| WebStorageError::Unavailable(js_error_message(&e)))?;
        storage
            .remove_item(key)
            .map_err(|e| WebStorageError::Storage(js_error_message(&e)))
    }
}
