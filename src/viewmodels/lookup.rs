// ============================================================================
// LOOKUPS - Búsquedas secundarias (autor, milestone, usuario actual)
// ============================================================================
// Fallan por separado de la página: cualquier error se muestra como "—".
// Usan CacheFirst porque son datos de referencia que cambian poco.
// ============================================================================

use serde::Deserialize;
use serde_json::json;

use crate::models::User;
use crate::services::operations::{ME, MILESTONE_BY_ID, USERS, USER_BY_ID};
use crate::services::{ClientError, FetchPolicy, GraphQlClient};
use crate::utils::constants::EMPTY_PLACEHOLDER;

#[derive(Deserialize)]
struct NamedRecord {
    #[serde(default, rename = "fullName")]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

fn or_placeholder(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string())
}

/// Nombre completo de un usuario, o "—"
pub async fn user_name(client: &GraphQlClient, user_id: Option<&str>) -> String {
    let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
        return EMPTY_PLACEHOLDER.to_string();
    };
    let result = client
        .query_as::<NamedRecord>(&USER_BY_ID, json!({ "id": user_id }), FetchPolicy::CacheFirst)
        .await;
    match result {
        Ok(record) => or_placeholder(record.full_name),
        Err(e) => {
            log::debug!("🔍 [LOOKUP] usuario {} no disponible: {}", user_id, e);
            EMPTY_PLACEHOLDER.to_string()
        }
    }
}

/// Nombre de un milestone, o "—"
pub async fn milestone_name(client: &GraphQlClient, milestone_id: Option<&str>) -> String {
    let Some(milestone_id) = milestone_id.filter(|id| !id.is_empty()) else {
        return EMPTY_PLACEHOLDER.to_string();
    };
    let result = client
        .query_as::<NamedRecord>(&MILESTONE_BY_ID, json!({ "id": milestone_id }), FetchPolicy::CacheFirst)
        .await;
    match result {
        Ok(record) => or_placeholder(record.name),
        Err(e) => {
            log::debug!("🔍 [LOOKUP] milestone {} no disponible: {}", milestone_id, e);
            EMPTY_PLACEHOLDER.to_string()
        }
    }
}

/// Usuario autenticado (`me`)
pub async fn current_user(client: &GraphQlClient) -> Result<User, ClientError> {
    client.query_as::<User>(&ME, json!({}), FetchPolicy::CacheFirst).await
}

/// Usuarios seleccionables como miembros de un proyecto
pub async fn all_users(client: &GraphQlClient) -> Result<Vec<User>, ClientError> {
    client.query_nodes::<User>(&USERS, json!({}), FetchPolicy::CacheFirst).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use futures::executor::block_on;
    use std::rc::Rc;

    #[test]
    fn names_fall_back_to_placeholder() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "userById": { "id": "u1", "fullName": "Анна Смирнова" } } }));
        transport.push_json(500, json!({}));
        transport.push_json(200, json!({ "data": { "milestoneById": null } }));
        let client = GraphQlClient::new(Rc::new(transport.clone()), "http://api/graphql");

        assert_eq!(block_on(user_name(&client, Some("u1"))), "Анна Смирнова");
        // segunda vez desde caché
        assert_eq!(block_on(user_name(&client, Some("u1"))), "Анна Смирнова");
        assert_eq!(block_on(user_name(&client, Some("u2"))), "—");
        assert_eq!(block_on(milestone_name(&client, Some("m1"))), "—");
        assert_eq!(block_on(user_name(&client, None)), "—");
        assert_eq!(transport.requests().len(), 3);
    }
}
