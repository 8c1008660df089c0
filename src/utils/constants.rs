/// Única clave persistente del cliente: el bearer token
pub const TOKEN_STORAGE_KEY: &str = "tms_token";

/// Se muestra cuando una búsqueda secundaria (nombre de usuario, milestone...) falla
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Idioma del producto
pub const DEFAULT_LANGUAGE: &str = "RU";
