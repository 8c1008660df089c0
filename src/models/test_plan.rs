use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::{Priority, Severity};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<TestPlanCase>,
    #[serde(default)]
    pub test_cases_count: Option<u32>,
}

impl TestPlan {
    pub fn case_count(&self) -> usize {
        self.test_cases_count
            .map(|c| c as usize)
            .unwrap_or(self.test_cases.len())
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestPlanCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub severity: Severity,
}
