use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::Severity;

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub actual_result: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by_id: Option<String>,
}
