// ============================================================================
// TESTING - Transportes falsos para tests nativos
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::services::error::ClientError;
use crate::services::transport::{HttpRequest, HttpResponse, HttpTransport, MultipartField, RequestBody};
use crate::state::AppState;
use crate::utils::storage::MemoryStorage;
use crate::viewmodels::page_context::PageContext;

/// Estado completo sobre un transporte falso y storage en memoria
pub fn test_app(transport: Rc<dyn HttpTransport>) -> (AppState, MemoryStorage) {
    let storage = MemoryStorage::new();
    let app = AppState::new(AppConfig::with_api_base("http://api"), Rc::new(storage.clone()), transport);
    (app, storage)
}

pub fn test_context(transport: Rc<dyn HttpTransport>) -> PageContext {
    PageContext::from_app(&test_app(transport).0)
}

fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

// ============================================================================
// RECORDING - Respuestas programadas en cola, registra cada petición
// ============================================================================

#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Rc<RefCell<Vec<HttpRequest>>>,
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, ClientError>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.responses.borrow_mut().push_back(Ok(json_response(status, body)));
    }

    pub fn push_error(&self, error: ClientError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Nombres de operación GraphQL enviados, en orden
    pub fn operation_names(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|r| r.json_body())
            .filter_map(|b| b["operationName"].as_str().map(str::to_string))
            .collect()
    }
}

#[async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(200, json!({ "data": {} }))))
    }
}

// ============================================================================
// DEFERRED - Cada petición queda pendiente hasta que el test la resuelve
// ============================================================================

type Pending = (HttpRequest, Option<oneshot::Sender<Result<HttpResponse, ClientError>>>);

#[derive(Clone, Default)]
pub struct DeferredTransport {
    calls: Rc<RefCell<Vec<Pending>>>,
}

impl DeferredTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peticiones aún sin resolver
    pub fn pending(&self) -> usize {
        self.calls.borrow().iter().filter(|(_, tx)| tx.is_some()).count()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.calls.borrow()[index].0.clone()
    }

    pub fn resolve_json(&self, index: usize, status: u16, body: Value) {
        let sender = self.calls.borrow_mut()[index].1.take();
        if let Some(sender) = sender {
            let _ = sender.send(Ok(json_response(status, body)));
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for DeferredTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.calls.borrow_mut().push((request, Some(tx)));
        rx.await
            .unwrap_or_else(|_| Err(ClientError::Network("cancelled".to_string())))
    }
}

// ============================================================================
// FAKE API - Servidor en memoria para tags, login y upload
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct FakeTag {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

/// Servidor falso: implementa `Tags`/`CreateTag`/`UpdateTag`/`DeleteTag`,
/// `Me`, `POST /api/login` y `POST /api/upload`. Registra todas las peticiones.
#[derive(Clone)]
pub struct FakeApiServer {
    pub tags: Rc<RefCell<Vec<FakeTag>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
    fail_mutations: Rc<Cell<bool>>,
    require_token: Rc<Cell<bool>>,
    next_id: Rc<Cell<u32>>,
    credentials: (String, String),
    token: String,
}

impl FakeApiServer {
    pub const TOKEN: &'static str = "token-123";
    pub const USER_ID: &'static str = "u-1";

    pub fn new() -> Self {
        Self {
            tags: Rc::new(RefCell::new(Vec::new())),
            requests: Rc::new(RefCell::new(Vec::new())),
            fail_mutations: Rc::new(Cell::new(false)),
            require_token: Rc::new(Cell::new(false)),
            next_id: Rc::new(Cell::new(1)),
            credentials: ("user@example.com".to_string(), "CorrectHorse#1battery".to_string()),
            token: Self::TOKEN.to_string(),
        }
    }

    pub fn credentials(&self) -> (&str, &str) {
        (&self.credentials.0, &self.credentials.1)
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.set(fail);
    }

    /// Rechaza con `AUTH_NOT_AUTHENTICATED` las peticiones GraphQL sin token
    pub fn require_token(&self, require: bool) {
        self.require_token.set(require);
    }

    pub fn seed_tag(&self, name: &str) -> String {
        let id = self.allocate_id();
        self.tags.borrow_mut().push(FakeTag {
            id: id.clone(),
            name: name.to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
        });
        id
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn operation_names(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .filter_map(|r| r.json_body())
            .filter_map(|b| b["operationName"].as_str().map(str::to_string))
            .collect()
    }

    fn allocate_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        format!("tag-{}", id)
    }

    fn login(&self, request: &HttpRequest) -> HttpResponse {
        let body = request.json_body().unwrap_or(Value::Null);
        let matches = body["email"] == self.credentials.0.as_str()
            && body["password"] == self.credentials.1.as_str();
        if matches {
            json_response(200, json!({ "token": self.token, "expiresAt": "2030-01-01T00:00:00Z" }))
        } else {
            json_response(400, json!({ "error": "Invalid email or password" }))
        }
    }

    fn upload(&self, request: &HttpRequest) -> HttpResponse {
        let has_fields = match &request.body {
            RequestBody::Multipart(fields) => {
                let names: Vec<&str> = fields
                    .iter()
                    .map(|f| match f {
                        MultipartField::Text { name, .. } | MultipartField::File { name, .. } => name.as_str(),
                    })
                    .collect();
                names.contains(&"File") && names.contains(&"ProjectId")
            }
            _ => false,
        };
        if has_fields {
            json_response(200, json!({ "id": "att-1" }))
        } else {
            json_response(400, json!({ "error": "bad upload" }))
        }
    }

    fn graphql(&self, request: &HttpRequest) -> HttpResponse {
        if self.require_token.get() && request.header("Authorization").is_none() {
            return json_response(200, json!({
                "errors": [{ "message": "The current user is not authorized", "extensions": { "code": "AUTH_NOT_AUTHENTICATED" } }]
            }));
        }
        let body = request.json_body().unwrap_or(Value::Null);
        let vars = &body["variables"];
        let operation = body["operationName"].as_str().unwrap_or_default();

        let is_mutation = matches!(operation, "CreateTag" | "UpdateTag" | "DeleteTag");
        if is_mutation && self.fail_mutations.get() {
            return json_response(200, json!({ "errors": [{ "message": "constraint violated" }] }));
        }

        match operation {
            "Me" => json_response(200, json!({ "data": { "me": { "id": Self::USER_ID, "fullName": "Тест Тестов" } } })),
            "Tags" => {
                let search = vars["filter"]["name"].as_str().unwrap_or_default().to_lowercase();
                let nodes: Vec<Value> = self
                    .tags
                    .borrow()
                    .iter()
                    .filter(|t| t.name.to_lowercase().contains(&search))
                    .map(|t| json!({ "id": t.id, "name": t.name, "createdAt": t.created_at }))
                    .collect();
                json_response(200, json!({ "data": { "tags": { "nodes": nodes } } }))
            }
            "CreateTag" => {
                let name = vars["input"]["name"].as_str().unwrap_or_default();
                let id = self.seed_tag(name);
                json_response(200, json!({ "data": { "createTag": id } }))
            }
            "UpdateTag" => {
                let id = vars["id"].as_str().unwrap_or_default();
                let name = vars["input"]["name"].as_str().unwrap_or_default();
                let updated = {
                    let mut tags = self.tags.borrow_mut();
                    let found = tags.iter_mut().find(|t| t.id == id);
                    found.map(|tag| tag.name = name.to_string()).is_some()
                };
                if updated {
                    json_response(200, json!({ "data": { "updateTag": id } }))
                } else {
                    json_response(200, json!({ "errors": [{ "message": "not found" }] }))
                }
            }
            "DeleteTag" => {
                let id = vars["id"].as_str().unwrap_or_default();
                self.tags.borrow_mut().retain(|t| t.id != id);
                json_response(200, json!({ "data": { "deleteTag": true } }))
            }
            other => json_response(200, json!({ "errors": [{ "message": format!("unknown operation {}", other) }] })),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeApiServer {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.borrow_mut().push(request.clone());
        let response = if request.url.ends_with("/api/login") {
            self.login(&request)
        } else if request.url.ends_with("/api/upload") {
            self.upload(&request)
        } else {
            self.graphql(&request)
        };
        Ok(response)
    }
}
