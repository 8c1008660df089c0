// ============================================================================
// PAGE CONTEXT - Dependencias compartidas por todos los controladores
// ============================================================================

use crate::config::AppConfig;
use crate::services::{ApiClient, ClientError, GraphQlClient};
use crate::state::{AppState, Navigator, NotificationCenter, NotificationSeverity, Route, SessionStore};
use crate::utils::i18n::tr;

#[derive(Clone)]
pub struct PageContext {
    pub config: AppConfig,
    pub client: GraphQlClient,
    pub api: ApiClient,
    pub session: SessionStore,
    pub notifications: NotificationCenter,
    pub navigator: Navigator,
    pub page_size: usize,
}

impl PageContext {
    pub fn from_app(app: &AppState) -> Self {
        Self {
            config: app.config.clone(),
            client: app.client.clone(),
            api: app.api.clone(),
            session: app.session.clone(),
            notifications: app.notifications.clone(),
            navigator: app.navigator.clone(),
            page_size: app.config.list_page_size,
        }
    }

    /// Notificación con texto traducido
    pub fn notify(&self, key: &str, severity: NotificationSeverity) {
        self.notifications.show(tr(key), severity);
    }

    /// Un rechazo de autorización lleva al login (el token se sobrescribe al
    /// volver a entrar). Devuelve `true` si el error era de autorización.
    pub fn handle_unauthorized(&self, error: &ClientError) -> bool {
        if !error.is_unauthorized() {
            return false;
        }
        log::warn!("🔒 [PAGE] Petición rechazada, redirigiendo a login");
        self.notify("session_expired", NotificationSeverity::Warning);
        self.navigator.navigate(Route::Login);
        true
    }

    /// Reporta el fallo de una mutation con un único mensaje genérico
    pub fn report_failure(&self, error: &ClientError, message_key: &str) {
        log::error!("❌ [PAGE] {}: {}", message_key, error);
        if !self.handle_unauthorized(error) {
            self.notify(message_key, NotificationSeverity::Error);
        }
    }
}
