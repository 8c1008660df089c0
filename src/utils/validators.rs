// ============================================================================
// VALIDADORES - Reglas de formulario (se evalúan antes de tocar la red)
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::models::auth::{LoginRequest, RegisterInput};

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("email regex is valid");
}

pub const MIN_PASSWORD_LEN: usize = 13;

/// Errores por campo. El valor es una clave de `utils::i18n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, &'static str>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un error; se conserva el primero de cada campo
    pub fn add(&mut self, field: &'static str, message_key: &'static str) {
        self.fields.entry(field).or_insert(message_key);
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.fields.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields.iter().map(|(field, key)| (*field, *key))
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(field, key)| format!("{}: {}", field, key))
            .collect();
        write!(f, "formulario inválido ({})", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Campo obligatorio (no vacío tras trim)
pub fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message_key: &'static str) {
    if value.trim().is_empty() {
        errors.add(field, message_key);
    }
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_valid_email(&request.email) {
        errors.add("email", "invalid_email");
    }
    if request.password.is_empty() {
        errors.add("password", "password_required");
    }
    errors.into_result()
}

pub fn validate_password_strength(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, "password_too_short");
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add(field, "password_needs_upper");
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.add(field, "password_needs_lower");
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.add(field, "password_needs_digit");
    } else if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.add(field, "password_needs_special");
    }
}

pub fn validate_register(input: &RegisterInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !is_valid_email(&input.email) {
        errors.add("email", "invalid_email");
    }
    validate_password_strength(&mut errors, "password", &input.password);
    require(&mut errors, "firstName", &input.first_name, "first_name_required");
    require(&mut errors, "lastName", &input.last_name, "last_name_required");
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_input(password: &str) -> RegisterInput {
        RegisterInput {
            email: "qa@example.com".to_string(),
            password: password.to_string(),
            first_name: "Ирина".to_string(),
            last_name: "Петрова".to_string(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("  user@example.com "));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn login_requires_email_and_password() {
        let errors = validate_login(&LoginRequest {
            email: "nope".to_string(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(errors.get("email"), Some("invalid_email"));
        assert_eq!(errors.get("password"), Some("password_required"));

        assert!(validate_login(&LoginRequest {
            email: "user@example.com".to_string(),
            password: "wrongpass".to_string(),
        })
        .is_ok());
    }

    #[test]
    fn password_rules_report_the_first_missing_class() {
        let cases = [
            ("Short1!", "password_too_short"),
            ("alllowercase1!x", "password_needs_upper"),
            ("ALLUPPERCASE1!X", "password_needs_lower"),
            ("NoDigitsHere!!x", "password_needs_digit"),
            ("NoSpecials1234x", "password_needs_special"),
        ];
        for (password, expected) in cases {
            let errors = validate_register(&register_input(password)).unwrap_err();
            assert_eq!(errors.get("password"), Some(expected), "password {:?}", password);
        }
        assert!(validate_register(&register_input("Valid-Passw0rd!")).is_ok());
    }

    #[test]
    fn register_requires_names() {
        let mut input = register_input("Valid-Passw0rd!");
        input.first_name = "  ".to_string();
        input.last_name.clear();
        let errors = validate_register(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("firstName"), Some("first_name_required"));
        assert_eq!(errors.get("lastName"), Some("last_name_required"));
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "name_required");
        errors.add("name", "title_required");
        assert_eq!(errors.get("name"), Some("name_required"));
    }
}
