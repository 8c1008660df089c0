// ============================================================================
// GRAPHQL - Operaciones, envelope de respuesta y decodificación
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::models::Connection;
use crate::services::error::{ClientError, GraphQlError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Documento GraphQL con nombre. `root` es el campo raíz de `data` que
/// contiene el resultado (p.ej. `tags`, `createTag`).
#[derive(Debug, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub kind: OperationKind,
    pub root: &'static str,
    pub document: &'static str,
}

impl Operation {
    pub const fn query(name: &'static str, root: &'static str, document: &'static str) -> Self {
        Self { name, kind: OperationKind::Query, root, document }
    }

    pub const fn mutation(name: &'static str, root: &'static str, document: &'static str) -> Self {
        Self { name, kind: OperationKind::Mutation, root, document }
    }

    /// Cuerpo JSON de la petición `POST /graphql`
    pub fn request_body(&self, variables: &Value) -> Value {
        serde_json::json!({
            "operationName": self.name,
            "query": self.document,
            "variables": variables,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

/// Interpreta el cuerpo de una respuesta GraphQL. Una lista `errors` no
/// vacía es un error aunque venga `data` parcial.
pub fn parse_response(body: &str) -> Result<Value, ClientError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        return Err(ClientError::from_graphql(errors));
    }
    envelope
        .data
        .filter(|d| !d.is_null())
        .ok_or_else(|| ClientError::MissingData("data".to_string()))
}

/// Extrae `data.<root>` y lo decodifica
pub fn decode_root<T: DeserializeOwned>(data: &Value, root: &str) -> Result<T, ClientError> {
    let value = data
        .get(root)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ClientError::MissingData(root.to_string()))?;
    Ok(T::deserialize(value)?)
}

/// Extrae `data.<root>.nodes`
pub fn decode_nodes<T: DeserializeOwned>(data: &Value, root: &str) -> Result<Vec<T>, ClientError> {
    decode_root::<Connection<T>>(data, root).map(|page| page.nodes)
}
