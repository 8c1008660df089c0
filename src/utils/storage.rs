// ============================================================================
// STORAGE - Acceso clave/valor persistente (localStorage o memoria)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("localStorage no disponible")]
    Unavailable,
    #[error("error leyendo '{0}' de storage")]
    Read(String),
    #[error("error guardando '{0}' en storage")]
    Write(String),
}

/// Almacén clave/valor síncrono. En el navegador es `localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `localStorage` del navegador. Se resuelve en cada llamada: si el usuario
/// lo deshabilita (modo privado, política del navegador) las operaciones
/// devuelven `StorageError::Unavailable` en vez de hacer panic.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn raw() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::raw()?
            .get_item(key)
            .map_err(|_| StorageError::Read(key.to_string()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::raw()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::raw()?
            .remove_item(key)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

/// Storage en memoria (builds nativos y tests). Los clones comparten datos.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
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

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage deshabilitado: todas las operaciones fallan.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl KeyValueStorage for UnavailableStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Storage por defecto de la plataforma
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_clones_share_items() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").unwrap();
        assert_eq!(other.get_item("k").unwrap(), Some("v".to_string()));
        other.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn unavailable_storage_always_errors() {
        let storage = UnavailableStorage;
        assert_eq!(storage.get_item("k"), Err(StorageError::Unavailable));
        assert_eq!(storage.set_item("k", "v"), Err(StorageError::Unavailable));
        assert_eq!(storage.remove_item("k"), Err(StorageError::Unavailable));
    }
}
