use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "http://localhost:7265";
const DEFAULT_NOTIFICATION_DURATION_MS: u32 = 3000;
const DEFAULT_LIST_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub notification_duration_ms: u32,
    pub list_page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            list_page_size: DEFAULT_LIST_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            notification_duration_ms: option_env!("NOTIFICATION_DURATION_MS")
                .unwrap_or("3000").parse().unwrap_or(DEFAULT_NOTIFICATION_DURATION_MS),
            list_page_size: option_env!("LIST_PAGE_SIZE")
                .unwrap_or("20").parse().ok()
                .filter(|size: &usize| *size > 0)
                .unwrap_or(DEFAULT_LIST_PAGE_SIZE),
        }
    }

    /// Config apuntando a otra API (tests y entornos de demo)
    pub fn with_api_base(base: &str) -> Self {
        Self {
            api_base_url: base.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.api_base_url)
    }

    pub fn login_url(&self) -> String {
        format!("{}/api/login", self.api_base_url)
    }

    pub fn upload_url(&self) -> String {
        format!("{}/api/upload", self.api_base_url)
    }

    /// URL absoluta de un adjunto (`fileUrl` llega relativo a la API)
    pub fn file_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_derive_from_base_url() {
        let config = AppConfig::with_api_base("http://api.test:7265/");
        assert_eq!(config.graphql_url(), "http://api.test:7265/graphql");
        assert_eq!(config.login_url(), "http://api.test:7265/api/login");
        assert_eq!(config.upload_url(), "http://api.test:7265/api/upload");
    }

    #[test]
    fn file_url_joins_relative_paths_only() {
        let config = AppConfig::with_api_base("http://api.test");
        assert_eq!(config.file_url("uploads/a.png"), "http://api.test/uploads/a.png");
        assert_eq!(config.file_url("/uploads/a.png"), "http://api.test/uploads/a.png");
        assert_eq!(config.file_url("https://cdn.test/a.png"), "https://cdn.test/a.png");
    }

    #[test]
    fn defaults_match_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:7265");
        assert_eq!(config.notification_duration_ms, 3000);
        assert!(!config.is_production());
    }
}
