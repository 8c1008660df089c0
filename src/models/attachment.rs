use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    /// Ruta relativa a la API
    pub file_url: String,
    #[serde(default)]
    pub uploaded_by_id: Option<String>,
}

/// Archivo a subir (bytes ya leídos del `<input type=file>`)
#[derive(Clone, PartialEq, Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
