use std::cell::RefCell;
use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, Storage};

use crate::error::StorageError;

/// Almacenamiento clave/valor del navegador
///
/// En el navegador es `localStorage`; en tests un `MemoryStore`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// `window.localStorage`
#[derive(Clone, Copy, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = get_local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let storage = get_local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

/// Store en memoria (tests y entornos sin localStorage)
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

pub fn save_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
    store.set(key, &json)
}

pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("⚠️ [STORAGE] Valor corrupto en '{}': {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_helpers_round_trip_through_memory_store() {
        let store = MemoryStore::new();
        save_json(&store, "numbers", &vec![1, 2, 3]).unwrap();
        assert_eq!(store.get("numbers").as_deref(), Some("[1,2,3]"));
        assert_eq!(load_json::<Vec<i32>>(&store, "numbers"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn corrupt_json_loads_as_none() {
        let store = MemoryStore::new();
        store.set("user", "{not json").unwrap();
        assert_eq!(load_json::<Vec<i32>>(&store, "user"), None);
        assert_eq!(load_json::<Vec<i32>>(&store, "missing"), None);
    }
}
