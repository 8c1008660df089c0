// ============================================================================
// TRANSPORT - Abstracción HTTP (fetch en navegador, fakes en tests)
// ============================================================================
// Todo lo que sale hacia la API (queries, mutations, login, uploads) pasa
// por un `HttpTransport`. El decorador de autenticación se monta encima.
// ============================================================================

use async_trait::async_trait;

use crate::services::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn post_json(url: impl Into<String>, body: &serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: RequestBody::Json(body.to_string()),
        }
    }

    pub fn post_multipart(url: impl Into<String>, fields: Vec<MultipartField>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Multipart(fields),
        }
    }

    /// Cabecera por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_header(&mut self, name: &str, value: String) {
        self.remove_header(name);
        self.headers.push((name.to_string(), value));
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    /// Cuerpo JSON parseado (para inspeccionar peticiones en tests y logs)
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match &self.body {
            RequestBody::Json(raw) => serde_json::from_str(raw).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Un cuerpo que no se puede leer es un fallo de red, no una respuesta vacía
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn body_or_network_error<E: std::fmt::Display>(body: Result<String, E>) -> Result<String, ClientError> {
    body.map_err(|e| ClientError::Network(format!("body: {}", e)))
}

/// Transporte asíncrono. `?Send`: todo corre en el event loop único del navegador.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError>;
}

// ============================================================================
// FETCH (gloo-net) - solo WASM
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(target_arch = "wasm32")]
impl FetchTransport {
    fn form_data(fields: &[MultipartField]) -> Result<web_sys::FormData, ClientError> {
        let form = web_sys::FormData::new()
            .map_err(|e| ClientError::Network(format!("FormData: {:?}", e)))?;
        for field in fields {
            match field {
                MultipartField::Text { name, value } => {
                    form.append_with_str(name, value)
                        .map_err(|e| ClientError::Network(format!("FormData: {:?}", e)))?;
                }
                MultipartField::File { name, file_name, content_type, bytes } => {
                    let array = js_sys::Uint8Array::from(bytes.as_slice());
                    let parts = js_sys::Array::of1(&array);
                    let bag = web_sys::BlobPropertyBag::new();
                    if let Some(content_type) = content_type {
                        bag.set_type(content_type);
                    }
                    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
                        .map_err(|e| ClientError::Network(format!("Blob: {:?}", e)))?;
                    form.append_with_blob_and_filename(name, &blob, file_name)
                        .map_err(|e| ClientError::Network(format!("FormData: {:?}", e)))?;
                }
            }
        }
        Ok(form)
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(raw) => builder.body(raw.as_str()),
            RequestBody::Multipart(fields) => builder.body(Self::form_data(fields)?),
        }
        .map_err(|e| ClientError::Network(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        let body = body_or_network_error(response.text().await)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let mut request = HttpRequest::post_json("http://api/graphql", &serde_json::json!({}));
        request.set_header("Authorization", "Bearer a".to_string());
        assert_eq!(request.header("authorization"), Some("Bearer a"));

        request.set_header("AUTHORIZATION", "Bearer b".to_string());
        assert_eq!(request.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("authorization")).count(), 1);

        request.remove_header("Authorization");
        assert_eq!(request.header("Authorization"), None);
    }

    #[test]
    fn unreadable_body_is_a_network_error() {
        let failed: Result<String, &str> = Err("stream aborted");
        match body_or_network_error(failed) {
            Err(ClientError::Network(message)) => assert!(message.contains("stream aborted")),
            other => panic!("esperaba error de red, llegó {:?}", other),
        }
        assert_eq!(body_or_network_error(Ok::<_, &str>("{}".to_string())).ok().as_deref(), Some("{}"));
    }
}
