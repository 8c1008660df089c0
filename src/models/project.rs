use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::AccessType;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_base64: Option<String>,
    #[serde(default)]
    pub access_type: AccessType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub owner_id: String,
    #[serde(default)]
    pub owner_full_name: Option<String>,
    #[serde(default)]
    pub project_users_count: u32,
    #[serde(default)]
    pub test_cases_count: u32,
    #[serde(default)]
    pub defects_count: u32,
}

impl Project {
    /// Solo el propietario puede editar o borrar el proyecto
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.owner_id == user_id
    }

    /// Iniciales para el avatar (dos primeras letras del nombre)
    pub fn initials(&self) -> String {
        self.name.chars().take(2).collect::<String>().to_uppercase()
    }
}
