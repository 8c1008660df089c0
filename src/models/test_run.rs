use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::{ExecutionStatus, Priority, Severity};

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub milestone_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub test_run_test_cases: Vec<TestRunTestCase>,
    #[serde(default)]
    pub defects: Vec<TestRunDefect>,
}

impl TestRun {
    /// (pasados, fallidos, saltados)
    pub fn execution_summary(&self) -> (usize, usize, usize) {
        self.test_run_test_cases.iter().fold((0, 0, 0), |(p, f, s), case| match case.status {
            ExecutionStatus::Passed => (p + 1, f, s),
            ExecutionStatus::Failed => (p, f + 1, s),
            ExecutionStatus::Skipped => (p, f, s + 1),
            ExecutionStatus::Unknown => (p, f, s),
        })
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestRunTestCase {
    pub test_case: TestRunCaseRef,
    #[serde(default)]
    pub status: ExecutionStatus,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestRunCaseRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TestRunDefect {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub actual_result: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_summary_counts_statuses() {
        let run: TestRun = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "name": "Регресс",
            "testRunTestCases": [
                { "testCase": { "id": "c1", "title": "a" }, "status": "PASSED" },
                { "testCase": { "id": "c2", "title": "b" }, "status": "FAILED" },
                { "testCase": { "id": "c3", "title": "c" }, "status": "PASSED" },
                { "testCase": { "id": "c4", "title": "d" }, "status": "SKIPPED" }
            ]
        }))
        .unwrap();
        assert_eq!(run.execution_summary(), (2, 1, 1));
    }
}
