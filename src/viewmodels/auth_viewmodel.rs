// ============================================================================
// AUTH VIEWMODEL - Login, registro y logout
// ============================================================================
// Devuelve resultados; la vista solo pinta errores de campo.
// ============================================================================

use serde_json::json;
use thiserror::Error;

use crate::models::{LoginRequest, RegisterInput};
use crate::services::operations::REGISTER;
use crate::services::ClientError;
use crate::state::{NotificationSeverity, Route};
use crate::utils::validators::{validate_login, validate_register, ValidationErrors};
use crate::viewmodels::draft::Draft;
use crate::viewmodels::page_context::PageContext;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credenciales inválidas")]
    InvalidCredentials,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AuthError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            AuthError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// ViewModel de autenticación - SOLO lógica de negocio
#[derive(Clone)]
pub struct AuthViewModel {
    ctx: PageContext,
    login_form: Draft<LoginRequest>,
    register_form: Draft<RegisterInput>,
}

impl AuthViewModel {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx, login_form: Draft::default(), register_form: Draft::default() }
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn login_form(&self) -> &Draft<LoginRequest> {
        &self.login_form
    }

    pub fn register_form(&self) -> &Draft<RegisterInput> {
        &self.register_form
    }

    /// Login con los valores del formulario de la página
    pub async fn submit_login(&self) -> Result<(), AuthError> {
        let form = self.login_form.values();
        let result = self.login(&form.email, &form.password).await;
        self.login_form.settle(&result, AuthError::validation);
        result
    }

    /// Registro con los valores del formulario de la página
    pub async fn submit_register(&self) -> Result<(), AuthError> {
        let result = self.register(self.register_form.values()).await;
        self.register_form.settle(&result, AuthError::validation);
        result
    }

    /// Login REST. Con éxito guarda el token y abre Proyectos.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate_login(&request)?;

        log::info!("🔐 [AUTH] Iniciando login...");
        let response = match self.ctx.api.login(&request.email, &request.password).await {
            Ok(response) => response,
            Err(error) => {
                log::warn!("⚠️ [AUTH] Login fallido: {}", error);
                self.ctx.notify("login_invalid", NotificationSeverity::Error);
                return Err(match error {
                    ClientError::Http { .. } | ClientError::Unauthorized => AuthError::InvalidCredentials,
                    other => AuthError::Client(other),
                });
            }
        };

        if response.token.trim().is_empty() {
            log::warn!("⚠️ [AUTH] Respuesta de login sin token");
            self.ctx.notify("login_invalid", NotificationSeverity::Error);
            return Err(AuthError::InvalidCredentials);
        }

        // Datos de otra sesión no deben sobrevivir al cambio de usuario
        self.ctx.client.reset();
        self.ctx.session.set_token(&response.token);
        log::info!("✅ [AUTH] Sesión iniciada");
        self.ctx.navigator.navigate(Route::Projects);
        Ok(())
    }

    /// Registro GraphQL seguido de login con las mismas credenciales
    pub async fn register(&self, input: RegisterInput) -> Result<(), AuthError> {
        let input = RegisterInput {
            email: input.email.trim().to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            password: input.password,
        };
        validate_register(&input)?;

        log::info!("📝 [AUTH] Registrando {}", input.email);
        if let Err(error) = self.ctx.client.mutate(&REGISTER, json!({ "input": input })).await {
            log::error!("❌ [AUTH] Registro fallido: {}", error);
            self.ctx.notify("register_failed", NotificationSeverity::Error);
            return Err(AuthError::Client(error));
        }

        self.login(&input.email, &input.password).await
    }

    /// Cierra sesión. Idempotente, nunca falla.
    pub fn logout(&self) {
        log::info!("🚪 [AUTH] Cerrando sesión");
        self.ctx.session.clear_token();
        self.ctx.client.reset();
        self.ctx.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileUpload;
    use crate::services::transport::HttpRequest;
    use crate::testing::{test_app, FakeApiServer};
    use crate::utils::constants::TOKEN_STORAGE_KEY;
    use crate::utils::storage::{KeyValueStorage, MemoryStorage};
    use crate::viewmodels::list_resource::{ListResource, ListScope};
    use crate::models::Tag;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn setup() -> (FakeApiServer, AuthViewModel, MemoryStorage) {
        let server = FakeApiServer::new();
        let (app, storage) = test_app(Rc::new(server.clone()));
        (server, AuthViewModel::new(PageContext::from_app(&app)), storage)
    }

    fn bearer(request: &HttpRequest) -> Option<String> {
        request.header("Authorization").map(str::to_string)
    }

    #[test]
    fn wrong_password_keeps_user_on_login() {
        let (server, auth, storage) = setup();
        auth.ctx.navigator.navigate(Route::Login);

        let result = block_on(auth.login("user@example.com", "wrongpass"));

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap(), None);
        let shown = auth.ctx.notifications.current().unwrap();
        assert_eq!(shown.message, "Неверная почта или пароль");
        assert_eq!(shown.severity, NotificationSeverity::Error);
        assert_eq!(auth.ctx.navigator.current(), Route::Login);
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn rejected_login_keeps_the_typed_credentials() {
        let (_server, auth, _) = setup();
        auth.login_form().update(|f| {
            f.email = "user@example.com".to_string();
            f.password = "wrongpass".to_string();
        });

        assert!(matches!(block_on(auth.submit_login()), Err(AuthError::InvalidCredentials)));

        let kept = auth.login_form().values();
        assert_eq!(kept.email, "user@example.com");
        assert_eq!(kept.password, "wrongpass");
        assert!(auth.login_form().errors().is_empty());
    }

    #[test]
    fn failed_registration_keeps_the_form() {
        let (server, auth, _) = setup();
        let input = RegisterInput {
            email: "new@example.com".to_string(),
            first_name: "Анна".to_string(),
            last_name: "Смирнова".to_string(),
            password: "CorrectHorse#1battery".to_string(),
        };
        auth.register_form().update(|f| *f = input.clone());

        assert!(matches!(block_on(auth.submit_register()), Err(AuthError::Client(_))));

        assert_eq!(auth.register_form().values(), input);
        assert_eq!(server.operation_names(), vec!["Register"]);
        assert_eq!(auth.ctx.notifications.current().unwrap().message, "Ошибка регистрации");
    }

    #[test]
    fn invalid_registration_is_reported_on_the_form() {
        let (server, auth, _) = setup();
        auth.register_form().update(|f| {
            f.email = "new@example.com".to_string();
            f.password = "short".to_string();
        });

        assert!(block_on(auth.submit_register()).is_err());

        let form = auth.register_form();
        assert_eq!(form.values().email, "new@example.com");
        assert_eq!(form.errors().get("firstName"), Some("first_name_required"));
        assert!(server.requests().is_empty());
    }

    #[test]
    fn invalid_form_never_reaches_the_network() {
        let (server, auth, _) = setup();

        let result = block_on(auth.login("not-an-email", ""));

        let errors = result.unwrap_err();
        let errors = errors.validation().unwrap();
        assert_eq!(errors.get("email"), Some("invalid_email"));
        assert_eq!(errors.get("password"), Some("password_required"));
        assert!(server.requests().is_empty());
        assert!(auth.ctx.notifications.current().is_none());
    }

    #[test]
    fn every_request_after_login_carries_the_token() {
        let (server, auth, storage) = setup();
        server.require_token(true);
        let (email, password) = server.credentials();
        let (email, password) = (email.to_string(), password.to_string());

        block_on(auth.login(&email, &password)).unwrap();
        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some(FakeApiServer::TOKEN));
        assert_eq!(auth.ctx.navigator.current(), Route::Projects);

        let tags: ListResource<Tag> = ListResource::new(auth.ctx.clone(), ListScope::default());
        block_on(tags.fetch());
        tags.open_create();
        tags.update_field("name", "smoke");
        assert!(block_on(tags.submit_form()));
        let upload = FileUpload {
            file_name: "log.txt".to_string(),
            content_type: None,
            bytes: b"x".to_vec(),
        };
        block_on(auth.ctx.api.upload("p-1", upload)).unwrap();

        let requests = server.requests();
        assert_eq!(bearer(&requests[0]), None);
        let expected = format!("Bearer {}", FakeApiServer::TOKEN);
        for request in &requests[1..] {
            assert_eq!(bearer(request).as_deref(), Some(expected.as_str()), "{}", request.url);
        }
        assert_eq!(requests.len(), 5);
    }

    #[test]
    fn logout_is_idempotent() {
        let (server, auth, storage) = setup();
        let (email, password) = server.credentials();
        let (email, password) = (email.to_string(), password.to_string());
        block_on(auth.login(&email, &password)).unwrap();

        auth.logout();
        auth.logout();

        assert_eq!(storage.get_item(TOKEN_STORAGE_KEY).unwrap(), None);
        assert!(!auth.ctx.session.is_authenticated());
        assert_eq!(auth.ctx.navigator.current(), Route::Login);
    }

    #[test]
    fn requests_after_logout_have_no_header() {
        let (server, auth, _) = setup();
        let (email, password) = server.credentials();
        let (email, password) = (email.to_string(), password.to_string());
        block_on(auth.login(&email, &password)).unwrap();
        auth.logout();

        let tags: ListResource<Tag> = ListResource::new(auth.ctx.clone(), ListScope::default());
        block_on(tags.fetch());

        let last = server.requests().pop().unwrap();
        assert_eq!(bearer(&last), None);
    }
}
