// ============================================================================
// DRAFT - Valores de un formulario de página completa
// ============================================================================
// Cada notificación repinta la app entera; los valores escritos viven en el
// controlador de la página y la vista los vuelve a sembrar en cada render.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::utils::validators::ValidationErrors;

pub struct Draft<D> {
    values: Rc<RefCell<D>>,
    errors: Rc<RefCell<ValidationErrors>>,
}

impl<D> Clone for Draft<D> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            errors: self.errors.clone(),
        }
    }
}

impl<D: Clone + Default> Default for Draft<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: Clone + Default> Draft<D> {
    pub fn new(values: D) -> Self {
        Self {
            values: Rc::new(RefCell::new(values)),
            errors: Rc::new(RefCell::new(ValidationErrors::new())),
        }
    }

    pub fn values(&self) -> D {
        self.values.borrow().clone()
    }

    /// Lectura sin clonar (filas dinámicas, selección de checkboxes)
    pub fn with<R>(&self, read: impl FnOnce(&D) -> R) -> R {
        read(&self.values.borrow())
    }

    pub fn update<F>(&self, change: F)
    where
        F: FnOnce(&mut D),
    {
        change(&mut self.values.borrow_mut());
    }

    pub fn errors(&self) -> ValidationErrors {
        self.errors.borrow().clone()
    }

    pub fn set_errors(&self, errors: ValidationErrors) {
        *self.errors.borrow_mut() = errors;
    }

    /// Tras un alta correcta el formulario vuelve a estar vacío
    pub fn reset(&self) {
        *self.values.borrow_mut() = D::default();
        self.set_errors(ValidationErrors::new());
    }

    /// Guarda los errores de validación del intento; los valores no se tocan
    pub fn settle<T, E>(&self, result: &Result<T, E>, validation: impl FnOnce(&E) -> Option<&ValidationErrors>) {
        match result {
            Ok(_) => self.reset(),
            Err(error) => self.set_errors(validation(error).cloned().unwrap_or_default()),
        }
    }
}
