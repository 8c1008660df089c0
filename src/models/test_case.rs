use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::{Priority, Severity, TestCaseStatus};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub suite_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preconditions: Option<String>,
    #[serde(default)]
    pub postconditions: Option<String>,
    #[serde(default)]
    pub status: Option<TestCaseStatus>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    /// JSON libre (clave → valor) definido por el servidor
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub custom_fields: Option<serde_json::Value>,
    #[serde(default)]
    pub steps: Vec<TestStep>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    pub id: String,
    #[serde(default)]
    pub test_case_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}
