// ============================================================================
// API CLIENT - Endpoints REST (login y upload)
// ============================================================================
// Sin caché ni lógica de negocio. El transporte ya lleva el bearer token.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::{FileUpload, LoginRequest, LoginResponse};
use crate::services::error::ClientError;
use crate::services::transport::{HttpRequest, HttpTransport, MultipartField};

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    login_url: String,
    upload_url: String,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            transport,
            login_url: config.login_url(),
            upload_url: config.upload_url(),
        }
    }

    /// `POST /api/login`. Cualquier status no exitoso es un error HTTP.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = serde_json::to_value(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;

        log::info!("🔐 [API] Login para {}", email);
        let response = self.transport.send(HttpRequest::post_json(&self.login_url, &body)).await?;
        if !response.ok() {
            log::warn!("⚠️ [API] Login rechazado: HTTP {}", response.status);
            return Err(ClientError::Http { status: response.status, body: response.body });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// `POST /api/upload` multipart con campos `File` y `ProjectId`
    pub async fn upload(&self, project_id: &str, file: FileUpload) -> Result<String, ClientError> {
        log::info!("📎 [API] Subiendo {} ({} bytes)", file.file_name, file.bytes.len());
        let fields = vec![
            MultipartField::File {
                name: "File".to_string(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            },
            MultipartField::Text {
                name: "ProjectId".to_string(),
                value: project_id.to_string(),
            },
        ];
        let response = self
            .transport
            .send(HttpRequest::post_multipart(&self.upload_url, fields))
            .await?;
        if !response.ok() {
            return Err(ClientError::from_status(response.status, response.body));
        }
        Ok(response.body)
    }
}
