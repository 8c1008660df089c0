// ============================================================================
// ERRORES DEL CLIENTE - Taxonomía única para GraphQL, REST y uploads
// ============================================================================

use serde::{Deserialize, Serialize};

/// Códigos de `extensions.code` que el servidor usa para rechazos de autorización
const AUTHORIZATION_CODES: [&str; 4] = [
    "AUTH_NOT_AUTHENTICATED",
    "AUTH_NOT_AUTHORIZED",
    "UNAUTHENTICATED",
    "FORBIDDEN",
];

/// Error individual de la lista `errors` de una respuesta GraphQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQlError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }

    pub fn is_authorization(&self) -> bool {
        self.code()
            .map(|code| AUTHORIZATION_CODES.contains(&code))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("error de red: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("petición rechazada: sesión ausente o caducada")]
    Unauthorized,
    #[error("errores GraphQL: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),
    #[error("respuesta ilegible: {0}")]
    Decode(String),
    #[error("respuesta sin '{0}'")]
    MissingData(String),
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    /// Convierte la lista `errors` en error tipado. Si algún error trae un
    /// código de autorización se trata como `Unauthorized`.
    pub fn from_graphql(errors: Vec<GraphQlError>) -> Self {
        if errors.iter().any(GraphQlError::is_authorization) {
            ClientError::Unauthorized
        } else {
            ClientError::GraphQl(errors)
        }
    }

    /// Mapea un status HTTP no exitoso
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized,
            _ => ClientError::Http { status, body },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Decode(error.to_string())
    }
}
