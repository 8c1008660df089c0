// ============================================================================
// COMPOSERS - Altas en varios pasos (test case, test run, test plan)
// ============================================================================
// Cada paso espera al anterior (`.await`): los hijos necesitan el id del padre.
// Un fallo a mitad deja lo ya creado en el servidor; no hay rollback.
// ============================================================================

use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{Defect, ExecutionStatus, Milestone, Priority, Severity, TestCase, TestCaseStatus, TestSuite};
use crate::services::graphql::Operation;
use crate::services::operations::{
    CREATE_TEST_CASE, CREATE_TEST_PLAN, CREATE_TEST_RUN, CREATE_TEST_RUN_TEST_CASE, CREATE_TEST_STEP, DEFECTS,
    MILESTONES, TEST_CASES, TEST_PLANS, TEST_RUNS, TEST_SUITES,
};
use crate::services::{ClientError, FetchPolicy};
use crate::state::{NotificationSeverity, ProjectSection, Route};
use crate::utils::validators::{require, ValidationErrors};
use crate::viewmodels::draft::Draft;
use crate::viewmodels::lookup::current_user;
use crate::viewmodels::page_context::PageContext;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl ComposeError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ComposeError::Validation(errors) => Some(errors),
            ComposeError::Client(_) => None,
        }
    }
}

fn blank_to_null(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

// ============================================================================
// BORRADORES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDraft {
    pub description: String,
    pub expected_result: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestCaseDraft {
    pub suite_id: Option<String>,
    pub title: String,
    pub description: String,
    pub preconditions: String,
    pub postconditions: String,
    pub status: TestCaseStatus,
    pub priority: Priority,
    pub severity: Severity,
    /// Parámetros clave → valor
    pub parameters: Vec<(String, String)>,
    pub steps: Vec<StepDraft>,
}

impl TestCaseDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &self.title, "title_required");
        errors.into_result()
    }

    /// Pasos con descripción, en orden
    fn filled_steps(&self) -> impl Iterator<Item = &StepDraft> {
        self.steps.iter().filter(|s| !s.description.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunCaseDraft {
    pub test_case_id: String,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestRunDraft {
    pub name: String,
    pub description: String,
    pub milestone_id: Option<String>,
    pub defect_ids: Vec<String>,
    pub cases: Vec<RunCaseDraft>,
}

impl TestRunDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        if self.cases.iter().any(|c| c.test_case_id.trim().is_empty()) {
            errors.add("cases", "test_case_required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPlanDraft {
    pub name: String,
    pub description: String,
    pub test_case_ids: Vec<String>,
}

impl TestPlanDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        errors.into_result()
    }
}

/// Catálogos del proyecto que alimentan los selectores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    TestCases,
    Suites,
    Milestones,
    Defects,
}

// ============================================================================
// COMPOSER
// ============================================================================

#[derive(Clone)]
pub struct Composer {
    ctx: PageContext,
    project_id: String,
    test_case: Draft<TestCaseDraft>,
    test_run: Draft<TestRunDraft>,
    test_plan: Draft<TestPlanDraft>,
}

impl Composer {
    pub fn new(ctx: PageContext, project_id: &str) -> Self {
        Self {
            ctx,
            project_id: project_id.to_string(),
            test_case: Draft::default(),
            test_run: Draft::default(),
            test_plan: Draft::default(),
        }
    }

    pub fn test_case_draft(&self) -> &Draft<TestCaseDraft> {
        &self.test_case
    }

    pub fn test_run_draft(&self) -> &Draft<TestRunDraft> {
        &self.test_run
    }

    pub fn test_plan_draft(&self) -> &Draft<TestPlanDraft> {
        &self.test_plan
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn section(&self, section: ProjectSection) -> Route {
        Route::Project { project_id: self.project_id.clone(), section }
    }

    /// Pares (id, etiqueta) de un catálogo; vacío si la consulta falla
    pub async fn options(&self, source: OptionSource) -> Vec<(String, String)> {
        let client = &self.ctx.client;
        let vars = json!({ "projectId": self.project_id });
        let result: Result<Vec<(String, String)>, ClientError> = match source {
            OptionSource::TestCases => client
                .query_nodes::<TestCase>(&TEST_CASES, vars, FetchPolicy::CacheFirst)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.title)).collect()),
            OptionSource::Suites => client
                .query_nodes::<TestSuite>(&TEST_SUITES, vars, FetchPolicy::CacheFirst)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.name)).collect()),
            OptionSource::Milestones => client
                .query_nodes::<Milestone>(&MILESTONES, vars, FetchPolicy::CacheFirst)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.name)).collect()),
            OptionSource::Defects => client
                .query_nodes::<Defect>(&DEFECTS, vars, FetchPolicy::CacheFirst)
                .await
                .map(|rows| rows.into_iter().map(|r| (r.id, r.title)).collect()),
        };
        result.unwrap_or_else(|error| {
            log::warn!("⚠️ [COMPOSE] Catálogo {:?} no disponible: {}", source, error);
            Vec::new()
        })
    }

    /// Cierra un alta: notificación única y navegación en caso de éxito.
    /// Los catálogos de `list` en caché dejan de valer tras crear.
    fn finish(&self, result: Result<String, ClientError>, list: &Operation, back: Route) -> Result<String, ComposeError> {
        match result {
            Ok(id) => {
                self.ctx.client.invalidate(list.name);
                self.ctx.notify("created_ok", NotificationSeverity::Success);
                self.ctx.navigator.navigate(back);
                Ok(id)
            }
            Err(error) => {
                self.ctx.report_failure(&error, "create_failed");
                Err(ComposeError::Client(error))
            }
        }
    }

    // ========================================================================
    // ENVÍO DE LOS BORRADORES DE LA PÁGINA
    // ========================================================================
    // Con fallo los valores se quedan tal cual; con éxito se vacían.

    pub async fn submit_test_case(&self) -> Result<String, ComposeError> {
        let result = self.create_test_case(&self.test_case.values()).await;
        self.test_case.settle(&result, ComposeError::validation);
        result
    }

    pub async fn submit_test_run(&self) -> Result<String, ComposeError> {
        let result = self.create_test_run(&self.test_run.values()).await;
        self.test_run.settle(&result, ComposeError::validation);
        result
    }

    pub async fn submit_test_plan(&self) -> Result<String, ComposeError> {
        let result = self.create_test_plan(&self.test_plan.values()).await;
        self.test_plan.settle(&result, ComposeError::validation);
        result
    }

    /// `createTestCase` y luego un `createTestStep` por paso, en orden
    pub async fn create_test_case(&self, draft: &TestCaseDraft) -> Result<String, ComposeError> {
        draft.validate()?;
        let result = self.create_test_case_steps(draft).await;
        self.finish(result, &TEST_CASES, self.section(ProjectSection::Repository))
    }

    async fn create_test_case_steps(&self, draft: &TestCaseDraft) -> Result<String, ClientError> {
        let author = current_user(&self.ctx.client).await.ok().map(|user| user.id);
        let parameters: serde_json::Map<String, Value> = draft
            .parameters
            .iter()
            .filter(|(key, _)| !key.trim().is_empty())
            .map(|(key, value)| (key.trim().to_string(), Value::String(value.clone())))
            .collect();

        let input = json!({
            "projectId": self.project_id,
            "suiteId": draft.suite_id,
            "title": draft.title.trim(),
            "description": blank_to_null(&draft.description),
            "preconditions": blank_to_null(&draft.preconditions),
            "postconditions": blank_to_null(&draft.postconditions),
            "status": draft.status,
            "priority": draft.priority,
            "severity": draft.severity,
            "parameters": parameters,
            "createdById": author,
        });
        let test_case_id = self.ctx.client.mutate_for_id(&CREATE_TEST_CASE, json!({ "input": input })).await?;
        log::info!("✅ [COMPOSE] Test case {} creado", test_case_id);

        for (position, step) in draft.filled_steps().enumerate() {
            let step_input = json!({
                "testCaseId": test_case_id,
                "description": step.description.trim(),
                "expectedResult": blank_to_null(&step.expected_result),
                "position": position + 1,
            });
            self.ctx.client.mutate(&CREATE_TEST_STEP, json!({ "input": step_input })).await?;
        }
        Ok(test_case_id)
    }

    /// `createTestRun` y luego un `createTestRunTestCase` por caso
    pub async fn create_test_run(&self, draft: &TestRunDraft) -> Result<String, ComposeError> {
        draft.validate()?;
        let result = self.create_test_run_cases(draft).await;
        self.finish(result, &TEST_RUNS, self.section(ProjectSection::TestRuns))
    }

    async fn create_test_run_cases(&self, draft: &TestRunDraft) -> Result<String, ClientError> {
        let input = json!({
            "projectId": self.project_id,
            "name": draft.name.trim(),
            "description": blank_to_null(&draft.description),
            "milestoneId": draft.milestone_id.as_deref().filter(|id| !id.is_empty()),
            "status": "ACTIVE",
            "defectIds": draft.defect_ids,
        });
        let test_run_id = self.ctx.client.mutate_for_id(&CREATE_TEST_RUN, json!({ "input": input })).await?;
        log::info!("✅ [COMPOSE] Test run {} creado", test_run_id);

        for case in &draft.cases {
            let case_input = json!({
                "testRunId": test_run_id,
                "testCaseId": case.test_case_id,
                "status": case.status,
                "executionTime": 1,
            });
            self.ctx
                .client
                .mutate(&CREATE_TEST_RUN_TEST_CASE, json!({ "input": case_input }))
                .await?;
        }
        Ok(test_run_id)
    }

    /// `createTestPlan` con el usuario actual como autor
    pub async fn create_test_plan(&self, draft: &TestPlanDraft) -> Result<String, ComposeError> {
        draft.validate()?;

        let author = match current_user(&self.ctx.client).await {
            Ok(user) => user.id,
            Err(error) => {
                if !self.ctx.handle_unauthorized(&error) {
                    log::error!("❌ [COMPOSE] Usuario actual no disponible: {}", error);
                    self.ctx.notify("owner_required", NotificationSeverity::Error);
                }
                return Err(ComposeError::Client(error));
            }
        };

        let input = json!({
            "projectId": self.project_id,
            "name": draft.name.trim(),
            "description": blank_to_null(&draft.description),
            "testCaseIds": draft.test_case_ids,
            "createdById": author,
        });
        let result = self.ctx.client.mutate_for_id(&CREATE_TEST_PLAN, json!({ "input": input })).await;
        self.finish(result, &TEST_PLANS, self.section(ProjectSection::TestPlans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingTransport};
    use futures::executor::block_on;
    use std::rc::Rc;

    fn composer(transport: &RecordingTransport) -> Composer {
        Composer::new(test_context(Rc::new(transport.clone())), "p1")
    }

    fn input_of(transport: &RecordingTransport, index: usize) -> Value {
        transport.requests()[index].json_body().unwrap()["variables"]["input"].clone()
    }

    #[test]
    fn test_case_steps_follow_the_parent() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        transport.push_json(200, json!({ "data": { "createTestCase": "tc-9" } }));
        let composer = composer(&transport);
        let draft = TestCaseDraft {
            title: "Вход в систему".to_string(),
            priority: Priority::High,
            steps: vec![
                StepDraft { description: "Открыть страницу".into(), expected_result: "Форма видна".into() },
                StepDraft { description: "   ".into(), expected_result: String::new() },
                StepDraft { description: "Ввести пароль".into(), expected_result: String::new() },
            ],
            ..TestCaseDraft::default()
        };

        let id = block_on(composer.create_test_case(&draft)).unwrap();

        assert_eq!(id, "tc-9");
        assert_eq!(
            transport.operation_names(),
            vec!["Me", "CreateTestCase", "CreateTestStep", "CreateTestStep"]
        );
        let case = input_of(&transport, 1);
        assert_eq!(case["priority"], json!("HIGH"));
        assert_eq!(case["createdById"], json!("u1"));
        assert_eq!(case["description"], Value::Null);
        let second_step = input_of(&transport, 3);
        assert_eq!(second_step["testCaseId"], json!("tc-9"));
        assert_eq!(second_step["position"], json!(2));
        assert_eq!(second_step["expectedResult"], Value::Null);
        assert_eq!(
            composer.context().navigator.current(),
            Route::Project { project_id: "p1".into(), section: ProjectSection::Repository }
        );
    }

    #[test]
    fn failed_parent_creates_no_children() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        transport.push_json(200, json!({ "errors": [{ "message": "boom" }] }));
        let composer = composer(&transport);
        let before = composer.context().navigator.current();
        let draft = TestCaseDraft {
            title: "Кейс".to_string(),
            steps: vec![StepDraft { description: "Шаг".into(), expected_result: String::new() }],
            ..TestCaseDraft::default()
        };

        let result = block_on(composer.create_test_case(&draft));

        assert!(matches!(result, Err(ComposeError::Client(_))));
        assert_eq!(transport.operation_names(), vec!["Me", "CreateTestCase"]);
        assert_eq!(composer.context().notifications.current().unwrap().message, "Ошибка при создании");
        assert_eq!(composer.context().navigator.current(), before);
    }

    #[test]
    fn test_run_requires_selected_cases() {
        let transport = RecordingTransport::new();
        let composer = composer(&transport);
        let draft = TestRunDraft {
            name: "Регресс".to_string(),
            cases: vec![RunCaseDraft { test_case_id: String::new(), status: ExecutionStatus::Passed }],
            ..TestRunDraft::default()
        };

        let error = block_on(composer.create_test_run(&draft)).unwrap_err();
        assert_eq!(error.validation().unwrap().get("cases"), Some("test_case_required"));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_run_links_each_case() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "createTestRun": "tr-1" } }));
        let composer = composer(&transport);
        let draft = TestRunDraft {
            name: "Смоук".to_string(),
            milestone_id: Some(String::new()),
            cases: vec![
                RunCaseDraft { test_case_id: "c1".into(), status: ExecutionStatus::Passed },
                RunCaseDraft { test_case_id: "c2".into(), status: ExecutionStatus::Failed },
            ],
            ..TestRunDraft::default()
        };

        block_on(composer.create_test_run(&draft)).unwrap();

        assert_eq!(
            transport.operation_names(),
            vec!["CreateTestRun", "CreateTestRunTestCase", "CreateTestRunTestCase"]
        );
        assert_eq!(input_of(&transport, 0)["milestoneId"], Value::Null);
        assert_eq!(input_of(&transport, 2)["testRunId"], json!("tr-1"));
        assert_eq!(input_of(&transport, 2)["status"], json!("FAILED"));
    }

    #[test]
    fn test_plan_is_authored_by_current_user() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u7" } } }));
        transport.push_json(200, json!({ "data": { "createTestPlan": "tp-1" } }));
        let composer = composer(&transport);
        let draft = TestPlanDraft {
            name: "План".to_string(),
            test_case_ids: vec!["c1".into(), "c2".into()],
            ..TestPlanDraft::default()
        };

        block_on(composer.create_test_plan(&draft)).unwrap();

        let input = input_of(&transport, 1);
        assert_eq!(input["createdById"], json!("u7"));
        assert_eq!(input["testCaseIds"], json!(["c1", "c2"]));
        assert_eq!(composer.context().notifications.current().unwrap().message, "Успешно создано");
    }

    #[test]
    fn failed_create_keeps_the_page_draft() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        transport.push_json(200, json!({ "errors": [{ "message": "boom" }] }));
        let composer = composer(&transport);
        composer.test_case_draft().update(|d| {
            d.title = "Оплата картой".to_string();
            d.suite_id = Some("s1".to_string());
            d.steps.push(StepDraft { description: "Открыть корзину".into(), expected_result: String::new() });
        });

        assert!(block_on(composer.submit_test_case()).is_err());

        let kept = composer.test_case_draft().values();
        assert_eq!(kept.title, "Оплата картой");
        assert_eq!(kept.suite_id.as_deref(), Some("s1"));
        assert_eq!(kept.steps.len(), 1);
    }

    #[test]
    fn invalid_run_draft_keeps_values_and_errors() {
        let transport = RecordingTransport::new();
        let composer = composer(&transport);
        composer.test_run_draft().update(|d| {
            d.description = "Ночной прогон".to_string();
            d.defect_ids.push("d1".to_string());
        });

        assert!(block_on(composer.submit_test_run()).is_err());

        let draft = composer.test_run_draft();
        assert_eq!(draft.values().description, "Ночной прогон");
        assert_eq!(draft.values().defect_ids, vec!["d1".to_string()]);
        assert_eq!(draft.errors().get("name"), Some("name_required"));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn successful_plan_clears_the_draft() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u7" } } }));
        transport.push_json(200, json!({ "data": { "createTestPlan": "tp-1" } }));
        let composer = composer(&transport);
        composer.test_plan_draft().update(|d| d.name = "План".to_string());

        block_on(composer.submit_test_plan()).unwrap();

        assert_eq!(composer.test_plan_draft().values(), TestPlanDraft::default());
    }

    #[test]
    fn created_case_shows_up_in_case_options() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "testCasesByProjectId": { "nodes": [
            { "id": "tc-1", "title": "Old" }
        ] } } }));
        transport.push_json(200, json!({ "data": { "me": { "id": "u1" } } }));
        transport.push_json(200, json!({ "data": { "createTestCase": "tc-2" } }));
        transport.push_json(200, json!({ "data": { "testCasesByProjectId": { "nodes": [
            { "id": "tc-1", "title": "Old" },
            { "id": "tc-2", "title": "New" }
        ] } } }));
        let composer = composer(&transport);

        assert_eq!(block_on(composer.options(OptionSource::TestCases)).len(), 1);
        let draft = TestCaseDraft { title: "New".to_string(), ..TestCaseDraft::default() };
        block_on(composer.create_test_case(&draft)).unwrap();
        let after = block_on(composer.options(OptionSource::TestCases));

        assert_eq!(after.last(), Some(&("tc-2".to_string(), "New".to_string())));
        assert_eq!(
            transport.operation_names(),
            vec!["TestCasesByProjectId", "Me", "CreateTestCase", "TestCasesByProjectId"]
        );
    }

    #[test]
    fn options_list_project_catalogs() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "testCasesByProjectId": { "nodes": [
            { "id": "c1", "title": "Логин" }
        ] } } }));
        transport.push_json(500, json!({}));
        let composer = composer(&transport);

        let cases = block_on(composer.options(OptionSource::TestCases));
        assert_eq!(cases, vec![("c1".to_string(), "Логин".to_string())]);
        assert!(block_on(composer.options(OptionSource::Milestones)).is_empty());
        assert_eq!(transport.requests()[0].json_body().unwrap()["variables"]["projectId"], json!("p1"));
    }
}
