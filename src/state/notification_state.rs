// ============================================================================
// NOTIFICATIONS - Snackbar único, se oculta solo tras un tiempo fijo
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::state::reactivity::ReactiveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationSeverity {
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationSeverity::Success => "snackbar-success",
            NotificationSeverity::Error => "snackbar-error",
            NotificationSeverity::Info => "snackbar-info",
            NotificationSeverity::Warning => "snackbar-warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: NotificationSeverity,
    pub visible: bool,
}

/// Centro de notificaciones. No hay cola: `show` reemplaza la visible.
/// Cada `show` tiene una generación; el temporizador de una notificación
/// reemplazada no puede ocultar a su sucesora.
#[derive(Clone)]
pub struct NotificationCenter {
    current: ReactiveState<Option<Notification>>,
    generation: Rc<Cell<u64>>,
    duration_ms: u32,
}

impl NotificationCenter {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            current: ReactiveState::new(None),
            generation: Rc::new(Cell::new(0)),
            duration_ms,
        }
    }

    pub fn show(&self, message: impl Into<String>, severity: NotificationSeverity) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        let message = message.into();

        match severity {
            NotificationSeverity::Error => log::warn!("🔔 [NOTIFY] {}", message),
            _ => log::info!("🔔 [NOTIFY] {}", message),
        }
        self.current.set(Some(Notification { message, severity, visible: true }));
        self.schedule_expiry(generation);
        generation
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationSeverity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, NotificationSeverity::Error)
    }

    /// Oculta la notificación visible (botón cerrar)
    pub fn dismiss(&self) {
        if self.current.with(|n| n.is_some()) {
            self.current.set(None);
        }
    }

    /// Llamado por el temporizador de la generación `generation`
    pub fn expire(&self, generation: u64) {
        if self.generation.get() == generation {
            self.dismiss();
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.get()
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.current.subscribe(callback);
    }

    #[cfg(target_arch = "wasm32")]
    fn schedule_expiry(&self, generation: u64) {
        let center = self.clone();
        gloo_timers::callback::Timeout::new(self.duration_ms, move || center.expire(generation)).forget();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule_expiry(&self, _generation: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_replaces_visible_notification() {
        let center = NotificationCenter::new(3000);
        center.success("Успешно сохранено");
        center.error("Ошибка при удалении");

        let visible = center.current().unwrap();
        assert_eq!(visible.message, "Ошибка при удалении");
        assert_eq!(visible.severity, NotificationSeverity::Error);
        assert!(visible.visible);
    }

    #[test]
    fn stale_timer_does_not_hide_successor() {
        let center = NotificationCenter::new(3000);
        let first = center.success("первое");
        let second = center.success("второе");

        center.expire(first);
        assert_eq!(center.current().map(|n| n.message), Some("второе".to_string()));

        center.expire(second);
        assert_eq!(center.current(), None);
    }

    #[test]
    fn dismiss_hides_immediately() {
        let center = NotificationCenter::new(3000);
        let generation = center.show("info", NotificationSeverity::Info);
        center.dismiss();
        assert_eq!(center.current(), None);
        center.expire(generation);
        assert_eq!(center.current(), None);
    }
}
