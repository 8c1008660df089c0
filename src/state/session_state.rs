// ============================================================================
// SESSION STORE - Token bearer persistido (única clave en storage)
// ============================================================================
// Única interfaz de sesión: get/set/clear + suscripción. No valida forma ni
// caducidad del token; la expiración se descubre cuando el servidor rechaza.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::utils::constants::TOKEN_STORAGE_KEY;
use crate::utils::storage::KeyValueStorage;

type SessionListener = Rc<dyn Fn(bool)>;

#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
    listeners: Rc<RefCell<Vec<SessionListener>>>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Token actual. Si el storage falla se comporta como sin sesión.
    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("⚠️ [SESSION] No se pudo leer el token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Guarda el token (la última escritura gana)
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.set_item(TOKEN_STORAGE_KEY, token) {
            log::error!("❌ [SESSION] No se pudo guardar el token: {}", e);
        }
        self.notify();
    }

    /// Borra el token. Idempotente y nunca falla.
    pub fn clear_token(&self) {
        if let Err(e) = self.storage.remove_item(TOKEN_STORAGE_KEY) {
            log::warn!("⚠️ [SESSION] No se pudo borrar el token: {}", e);
        }
        self.notify();
    }

    /// Recibe `true` si hay sesión tras el cambio
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(bool) + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        let authenticated = self.is_authenticated();
        let listeners: Vec<SessionListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(authenticated);
        }
    }
}
