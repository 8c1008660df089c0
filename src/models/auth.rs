use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Cuerpo de `POST /api/login`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Respuesta de login. `expires_at` se recibe pero no se usa: la expiración
/// se descubre cuando el servidor rechaza una petición.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Input de la mutación `register`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct RegisterPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}
