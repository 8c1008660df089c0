// ============================================================================
// AUTH LINK - Añade el bearer token a cada petición saliente
// ============================================================================

use std::rc::Rc;

use async_trait::async_trait;

use crate::services::error::ClientError;
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::state::SessionStore;

/// Decorador de transporte: lee el token en el momento del envío (incluidos
/// reintentos) y nunca redirige. Los rechazos llegan al llamador como error.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    inner: Rc<dyn HttpTransport>,
    session: SessionStore,
}

impl AuthenticatedTransport {
    pub fn new(inner: Rc<dyn HttpTransport>, session: SessionStore) -> Self {
        Self { inner, session }
    }

    /// Aplica la cabecera según el token actual
    pub fn authorize(&self, request: &mut HttpRequest) {
        match self.session.token() {
            Some(token) => request.set_header("Authorization", format!("Bearer {}", token)),
            None => request.remove_header("Authorization"),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for AuthenticatedTransport {
    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.authorize(&mut request);
        self.inner.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use crate::utils::storage::{MemoryStorage, UnavailableStorage};
    use futures::executor::block_on;

    fn request() -> HttpRequest {
        HttpRequest::post_json("http://api/graphql", &serde_json::json!({ "query": "{ me { id } }" }))
    }

    #[test]
    fn no_token_means_no_authorization_header() {
        let recorder = RecordingTransport::new();
        let session = SessionStore::new(Rc::new(MemoryStorage::new()));
        let transport = AuthenticatedTransport::new(Rc::new(recorder.clone()), session);

        let mut stale = request();
        stale.set_header("Authorization", "Bearer old".to_string());
        block_on(transport.send(stale)).unwrap();
        block_on(transport.send(request())).unwrap();

        for sent in recorder.requests() {
            assert_eq!(sent.header("Authorization"), None);
        }
    }

    #[test]
    fn stored_token_is_sent_until_cleared() {
        let recorder = RecordingTransport::new();
        let session = SessionStore::new(Rc::new(MemoryStorage::new()));
        let transport = AuthenticatedTransport::new(Rc::new(recorder.clone()), session.clone());

        session.set_token("abc.def");
        block_on(transport.send(request())).unwrap();
        session.set_token("rotated");
        block_on(transport.send(request())).unwrap();
        session.clear_token();
        block_on(transport.send(request())).unwrap();

        let sent = recorder.requests();
        assert_eq!(sent[0].header("Authorization"), Some("Bearer abc.def"));
        assert_eq!(sent[1].header("Authorization"), Some("Bearer rotated"));
        assert_eq!(sent[2].header("Authorization"), None);
    }

    #[test]
    fn unavailable_storage_still_dispatches_without_header() {
        let recorder = RecordingTransport::new();
        let session = SessionStore::new(Rc::new(UnavailableStorage));
        let transport = AuthenticatedTransport::new(Rc::new(recorder.clone()), session);

        block_on(transport.send(request())).unwrap();
        assert_eq!(recorder.requests().len(), 1);
        assert_eq!(recorder.requests()[0].header("Authorization"), None);
    }
}
