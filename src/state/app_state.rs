// ============================================================================
// APP STATE - Estado global de la aplicación
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::services::{ApiClient, AuthenticatedTransport, GraphQlClient, HttpTransport};
use crate::state::notification_state::NotificationCenter;
use crate::state::route_state::{initial_route, Navigator};
use crate::state::session_state::SessionStore;
use crate::utils::storage::KeyValueStorage;

/// Estado global: sesión, cliente de datos, notificaciones y ruta
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: SessionStore,
    pub client: GraphQlClient,
    pub api: ApiClient,
    pub notifications: NotificationCenter,
    pub navigator: Navigator,
}

impl AppState {
    /// Monta la pila: transporte → auth link → clientes GraphQL/REST
    pub fn new(config: AppConfig, storage: Rc<dyn KeyValueStorage>, transport: Rc<dyn HttpTransport>) -> Self {
        let session = SessionStore::new(storage);
        let authenticated: Rc<dyn HttpTransport> =
            Rc::new(AuthenticatedTransport::new(transport, session.clone()));

        let client = GraphQlClient::new(authenticated.clone(), config.graphql_url());
        let api = ApiClient::new(authenticated, &config);
        let notifications = NotificationCenter::new(config.notification_duration_ms);
        let navigator = Navigator::new(initial_route(session.is_authenticated()));

        log::info!(
            "🚀 [APP] API {} (sesión: {})",
            config.api_base_url,
            if session.is_authenticated() { "sí" } else { "no" }
        );

        Self { config, session, client, api, notifications, navigator }
    }

    /// Estado para el navegador: localStorage + fetch
    #[cfg(target_arch = "wasm32")]
    pub fn for_browser() -> Self {
        Self::new(
            crate::config::CONFIG.clone(),
            crate::utils::storage::default_storage(),
            Rc::new(crate::services::transport::FetchTransport),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::route_state::Route;
    use crate::testing::RecordingTransport;
    use crate::utils::constants::TOKEN_STORAGE_KEY;
    use crate::utils::storage::MemoryStorage;

    #[test]
    fn initial_route_follows_stored_token() {
        let storage = MemoryStorage::new();
        let transport = Rc::new(RecordingTransport::new());

        let state = AppState::new(AppConfig::default(), Rc::new(storage.clone()), transport.clone());
        assert_eq!(state.navigator.current(), Route::Login);

        storage.set_item(TOKEN_STORAGE_KEY, "abc").unwrap();
        let state = AppState::new(AppConfig::default(), Rc::new(storage), transport);
        assert_eq!(state.navigator.current(), Route::Projects);
    }
}
