use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// Nombre para mostrar: `fullName`, o nombre + apellido, o email
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return Some(full.clone());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        self.email.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "fullName": "Иван Иванов", "email": "ivan@example.com"
        }))
        .unwrap();
        assert_eq!(user.display_name().as_deref(), Some("Иван Иванов"));

        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u2", "firstName": "Анна", "lastName": "Смирнова"
        }))
        .unwrap();
        assert_eq!(user.display_name().as_deref(), Some("Анна Смирнова"));

        let user: User = serde_json::from_value(serde_json::json!({ "id": "u3" })).unwrap();
        assert_eq!(user.display_name(), None);
    }
}
