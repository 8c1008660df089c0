// ============================================================================
// ENTIDADES LISTABLES - Operaciones, variables y formularios por página
// ============================================================================

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Map, Value};

use crate::models::{
    Attachment, Defect, Milestone, Project, Severity, Tag, TestCase, TestPlan, TestRun, TestSuite,
};
use crate::services::graphql::Operation;
use crate::services::operations as ops;
use crate::utils::format::{format_date, format_file_size, format_optional_date};
use crate::utils::validators::{require, ValidationErrors};
use crate::viewmodels::list_resource::{EntityForm, FieldKind, FormField, ListScope, ListedEntity};

pub const SEVERITY_OPTIONS: &[(&str, &str)] = &[
    ("TRIVIAL", "Тривиальная"),
    ("MINOR", "Незначительная"),
    ("NORMAL", "Обычная"),
    ("MAJOR", "Серьезная"),
    ("CRITICAL", "Критическая"),
];

pub const ACCESS_OPTIONS: &[(&str, &str)] = &[("PUBLIC", "Публичный"), ("PRIVATE", "Приватный")];

/// Objeto JSON sin las claves nulas (filtros opcionales)
fn compact(pairs: Vec<(&str, Value)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    Value::Object(map)
}

fn text_or_null(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// `YYYY-MM-DD` del input de fecha → ISO-8601 a medianoche UTC
fn date_input_to_iso(value: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Formulario vacío para listas sin alta/edición en modal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoForm;

impl EntityForm for NoForm {
    const FIELDS: &'static [FormField] = &[];

    fn id(&self) -> Option<&str> {
        None
    }

    fn field(&self, _name: &str) -> String {
        String::new()
    }

    fn set_field(&mut self, _name: &str, _value: &str) {}

    fn validate(&self, _scope: &ListScope) -> Result<(), ValidationErrors> {
        Ok(())
    }

    fn create_variables(&self, _scope: &ListScope) -> Value {
        json!({})
    }

    fn update_variables(&self, id: &str, _scope: &ListScope) -> Value {
        json!({ "id": id })
    }
}

// ============================================================================
// TAGS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagForm {
    pub id: Option<String>,
    pub name: String,
}

impl EntityForm for TagForm {
    const FIELDS: &'static [FormField] = &[FormField { name: "name", label_key: "name", kind: FieldKind::Text }];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn field(&self, name: &str) -> String {
        match name {
            "name" => self.name.clone(),
            _ => String::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        if name == "name" {
            self.name = value.to_string();
        }
    }

    fn validate(&self, _scope: &ListScope) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        errors.into_result()
    }

    fn create_variables(&self, _scope: &ListScope) -> Value {
        json!({ "input": { "name": self.name.trim() } })
    }

    fn update_variables(&self, id: &str, _scope: &ListScope) -> Value {
        json!({ "id": id, "input": { "name": self.name.trim() } })
    }
}

impl ListedEntity for Tag {
    type Form = TagForm;

    const LIST: Operation = ops::TAGS;
    const CREATE: Option<Operation> = Some(ops::CREATE_TAG);
    const UPDATE: Option<Operation> = Some(ops::UPDATE_TAG);
    const DELETE: Option<Operation> = Some(ops::DELETE_TAG);
    const COLUMNS: &'static [&'static str] = &["name", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "filter": { "name": scope.search.trim() } })
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), format_date(&self.created_at)]
    }

    fn to_form(&self) -> TagForm {
        TagForm { id: Some(self.id.clone()), name: self.name.clone() }
    }
}

// ============================================================================
// MILESTONES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilestoneForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
}

impl MilestoneForm {
    fn input(&self, scope: &ListScope) -> Value {
        json!({
            "projectId": scope.project_id,
            "name": self.name.trim(),
            "description": self.description,
            "dueDate": date_input_to_iso(&self.due_date),
        })
    }
}

impl EntityForm for MilestoneForm {
    const FIELDS: &'static [FormField] = &[
        FormField { name: "name", label_key: "name", kind: FieldKind::Text },
        FormField { name: "description", label_key: "description", kind: FieldKind::TextArea },
        FormField { name: "dueDate", label_key: "due_date", kind: FieldKind::Date },
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn field(&self, name: &str) -> String {
        match name {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "dueDate" => self.due_date.clone(),
            _ => String::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "dueDate" => self.due_date = value.to_string(),
            _ => {}
        }
    }

    fn validate(&self, _scope: &ListScope) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        if date_input_to_iso(&self.due_date).is_none() {
            errors.add("dueDate", "due_date_required");
        }
        errors.into_result()
    }

    fn create_variables(&self, scope: &ListScope) -> Value {
        json!({ "input": self.input(scope) })
    }

    fn update_variables(&self, id: &str, scope: &ListScope) -> Value {
        json!({ "id": id, "input": self.input(scope) })
    }
}

impl ListedEntity for Milestone {
    type Form = MilestoneForm;

    const LIST: Operation = ops::MILESTONES;
    const CREATE: Option<Operation> = Some(ops::CREATE_MILESTONE);
    const UPDATE: Option<Operation> = Some(ops::UPDATE_MILESTONE);
    const DELETE: Option<Operation> = Some(ops::DELETE_MILESTONE);
    const COLUMNS: &'static [&'static str] = &["name", "description", "due_date", "test_runs_count"];
    const STALE_AFTER_MUTATION: &'static [&'static str] = &[ops::MILESTONE_BY_ID.name];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "projectId": scope.project_id, "filter": { "name": scope.search.trim() } })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(&self.description),
            format_optional_date(self.due_date.as_ref()),
            self.test_runs_count.to_string(),
        ]
    }

    fn to_form(&self) -> MilestoneForm {
        MilestoneForm {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            description: opt(&self.description),
            due_date: self.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        }
    }
}

// ============================================================================
// DEFECTOS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefectForm {
    pub id: Option<String>,
    pub title: String,
    pub actual_result: String,
    pub severity: Severity,
}

impl EntityForm for DefectForm {
    const FIELDS: &'static [FormField] = &[
        FormField { name: "title", label_key: "title", kind: FieldKind::Text },
        FormField { name: "actualResult", label_key: "actual_result", kind: FieldKind::TextArea },
        FormField { name: "severity", label_key: "severity", kind: FieldKind::Select(SEVERITY_OPTIONS) },
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn field(&self, name: &str) -> String {
        match name {
            "title" => self.title.clone(),
            "actualResult" => self.actual_result.clone(),
            "severity" => self.severity.as_str().to_string(),
            _ => String::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "title" => self.title = value.to_string(),
            "actualResult" => self.actual_result = value.to_string(),
            "severity" => self.severity = Severity::parse(value).unwrap_or_default(),
            _ => {}
        }
    }

    fn validate(&self, scope: &ListScope) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &self.title, "title_required");
        require(&mut errors, "actualResult", &self.actual_result, "actual_result_required");
        if self.id.is_none() && scope.current_user_id.is_none() {
            errors.add("createdById", "owner_required");
        }
        errors.into_result()
    }

    fn create_variables(&self, scope: &ListScope) -> Value {
        json!({
            "input": {
                "title": self.title.trim(),
                "actualResult": self.actual_result,
                "severity": self.severity.as_str(),
                "createdById": scope.current_user_id,
                "projectId": scope.project_id,
            }
        })
    }

    fn update_variables(&self, id: &str, _scope: &ListScope) -> Value {
        json!({
            "id": id,
            "input": {
                "title": self.title.trim(),
                "actualResult": self.actual_result,
                "severity": self.severity.as_str(),
            }
        })
    }
}

impl ListedEntity for Defect {
    type Form = DefectForm;

    const LIST: Operation = ops::DEFECTS;
    const CREATE: Option<Operation> = Some(ops::CREATE_DEFECT);
    const UPDATE: Option<Operation> = Some(ops::UPDATE_DEFECT);
    const DELETE: Option<Operation> = Some(ops::DELETE_DEFECT);
    const COLUMNS: &'static [&'static str] = &["title", "actual_result", "severity", "created_at", "author"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({
            "projectId": scope.project_id,
            "filter": compact(vec![
                ("title", text_or_null(&scope.search)),
                ("severity", scope.severity.map(|s| json!(s.as_str())).unwrap_or(Value::Null)),
            ]),
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            opt(&self.actual_result),
            self.severity.label().to_string(),
            format_optional_date(self.created_at.as_ref()),
        ]
    }

    fn to_form(&self) -> DefectForm {
        DefectForm {
            id: Some(self.id.clone()),
            title: self.title.clone(),
            actual_result: opt(&self.actual_result),
            severity: self.severity,
        }
    }

    fn author_id(&self) -> Option<&str> {
        self.created_by_id.as_deref()
    }
}

// ============================================================================
// TEST SUITES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSuiteForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub preconditions: String,
}

impl EntityForm for TestSuiteForm {
    const FIELDS: &'static [FormField] = &[
        FormField { name: "name", label_key: "name", kind: FieldKind::Text },
        FormField { name: "description", label_key: "description", kind: FieldKind::TextArea },
        FormField { name: "preconditions", label_key: "preconditions", kind: FieldKind::TextArea },
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn field(&self, name: &str) -> String {
        match name {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "preconditions" => self.preconditions.clone(),
            _ => String::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "preconditions" => self.preconditions = value.to_string(),
            _ => {}
        }
    }

    fn validate(&self, _scope: &ListScope) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        errors.into_result()
    }

    fn create_variables(&self, scope: &ListScope) -> Value {
        json!({
            "input": {
                "projectId": scope.project_id,
                "name": self.name.trim(),
                "description": self.description,
                "preconditions": self.preconditions,
            }
        })
    }

    fn update_variables(&self, id: &str, _scope: &ListScope) -> Value {
        json!({
            "id": id,
            "input": {
                "name": self.name.trim(),
                "description": self.description,
                "preconditions": self.preconditions,
            }
        })
    }
}

impl ListedEntity for TestSuite {
    type Form = TestSuiteForm;

    const LIST: Operation = ops::TEST_SUITES;
    const CREATE: Option<Operation> = Some(ops::CREATE_TEST_SUITE);
    const UPDATE: Option<Operation> = Some(ops::UPDATE_TEST_SUITE);
    const DELETE: Option<Operation> = Some(ops::DELETE_TEST_SUITE);
    const COLUMNS: &'static [&'static str] = &["name", "description", "test_cases_count"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "projectId": scope.project_id, "filter": { "name": scope.search.trim() } })
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), opt(&self.description), self.test_cases_count.to_string()]
    }

    fn to_form(&self) -> TestSuiteForm {
        TestSuiteForm {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            description: opt(&self.description),
            preconditions: opt(&self.preconditions),
        }
    }
}

// ============================================================================
// TEST CASES / RUNS / PLANS (alta en página propia, aquí listado + borrado)
// ============================================================================

impl ListedEntity for TestCase {
    type Form = NoForm;

    const LIST: Operation = ops::TEST_CASES;
    const DELETE: Option<Operation> = Some(ops::DELETE_TEST_CASE);
    const COLUMNS: &'static [&'static str] = &["title", "priority", "severity"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({
            "projectId": scope.project_id,
            "filter": compact(vec![
                ("title", text_or_null(&scope.search)),
                ("suiteId", scope.suite_id.clone().map(Value::String).unwrap_or(Value::Null)),
            ]),
        })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.priority.label().to_string(),
            self.severity.label().to_string(),
        ]
    }

    fn to_form(&self) -> NoForm {
        NoForm
    }
}

impl ListedEntity for TestRun {
    type Form = NoForm;

    const LIST: Operation = ops::TEST_RUNS;
    const DELETE: Option<Operation> = Some(ops::DELETE_TEST_RUN);
    const COLUMNS: &'static [&'static str] = &["name", "status", "created_at"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "projectId": scope.project_id, "filter": { "name": scope.search.trim() } })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            opt(&self.status),
            format_optional_date(self.created_at.as_ref()),
        ]
    }

    fn to_form(&self) -> NoForm {
        NoForm
    }
}

impl ListedEntity for TestPlan {
    type Form = NoForm;

    const LIST: Operation = ops::TEST_PLANS;
    const DELETE: Option<Operation> = Some(ops::DELETE_TEST_PLAN);
    const COLUMNS: &'static [&'static str] = &["name", "test_cases_count", "created_at", "author"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "projectId": scope.project_id, "filter": { "name": scope.search.trim() } })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.case_count().to_string(),
            format_optional_date(self.created_at.as_ref()),
        ]
    }

    fn to_form(&self) -> NoForm {
        NoForm
    }

    fn author_id(&self) -> Option<&str> {
        self.created_by_id.as_deref()
    }
}

// ============================================================================
// ADJUNTOS (alta por upload multipart)
// ============================================================================

impl ListedEntity for Attachment {
    type Form = NoForm;

    const LIST: Operation = ops::ATTACHMENTS;
    const COLUMNS: &'static [&'static str] = &["file_name", "file_size", "author"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "projectId": scope.project_id, "filter": scope.search_value() })
    }

    fn cells(&self) -> Vec<String> {
        vec![self.file_name.clone(), format_file_size(self.file_size)]
    }

    fn to_form(&self) -> NoForm {
        NoForm
    }

    fn author_id(&self) -> Option<&str> {
        self.uploaded_by_id.as_deref()
    }
}

// ============================================================================
// PROYECTOS (ajustes: editar/borrar; el alta tiene página propia)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub access_type: String,
}

impl ProjectForm {
    fn access_type_value(&self) -> &str {
        if self.access_type.is_empty() {
            "PUBLIC"
        } else {
            &self.access_type
        }
    }
}

impl EntityForm for ProjectForm {
    const FIELDS: &'static [FormField] = &[
        FormField { name: "name", label_key: "name", kind: FieldKind::Text },
        FormField { name: "description", label_key: "description", kind: FieldKind::TextArea },
        FormField { name: "accessType", label_key: "access_type", kind: FieldKind::Select(ACCESS_OPTIONS) },
    ];

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn field(&self, name: &str) -> String {
        match name {
            "name" => self.name.clone(),
            "description" => self.description.clone(),
            "accessType" => self.access_type.clone(),
            _ => String::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "accessType" => self.access_type = value.to_string(),
            _ => {}
        }
    }

    fn validate(&self, _scope: &ListScope) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        errors.into_result()
    }

    fn create_variables(&self, scope: &ListScope) -> Value {
        json!({
            "input": {
                "name": self.name.trim(),
                "description": self.description,
                "accessType": self.access_type_value(),
                "ownerId": scope.current_user_id,
            }
        })
    }

    fn update_variables(&self, id: &str, _scope: &ListScope) -> Value {
        json!({
            "id": id,
            "input": {
                "name": self.name.trim(),
                "description": self.description,
                "accessType": self.access_type_value(),
            }
        })
    }
}

impl ListedEntity for Project {
    type Form = ProjectForm;

    const LIST: Operation = ops::PROJECTS;
    const UPDATE: Option<Operation> = Some(ops::UPDATE_PROJECT);
    const DELETE: Option<Operation> = Some(ops::DELETE_PROJECT);
    const COLUMNS: &'static [&'static str] = &["name", "owner", "test_cases_count", "defects_count"];

    fn id(&self) -> &str {
        &self.id
    }

    fn list_variables(scope: &ListScope) -> Value {
        json!({ "filter": compact(vec![("name", text_or_null(&scope.search))]) })
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.owner_full_name.clone().unwrap_or_else(|| "—".to_string()),
            self.test_cases_count.to_string(),
            self.defects_count.to_string(),
        ]
    }

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            description: opt(&self.description),
            access_type: self.access_type.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_options_match_model_labels() {
        for (value, label) in SEVERITY_OPTIONS {
            assert_eq!(Severity::parse(value).map(|s| s.label()), Some(*label));
        }
    }

    #[test]
    fn milestone_requires_name_and_valid_date() {
        let scope = ListScope::for_project("p1");
        let mut form = MilestoneForm::default();
        let errors = form.validate(&scope).unwrap_err();
        assert_eq!(errors.get("name"), Some("name_required"));
        assert_eq!(errors.get("dueDate"), Some("due_date_required"));

        form.set_field("name", "Релиз 1.0");
        form.set_field("dueDate", "2024-06-30");
        assert!(form.validate(&scope).is_ok());
        assert_eq!(
            form.create_variables(&scope)["input"]["dueDate"],
            json!("2024-06-30T00:00:00Z")
        );
        assert_eq!(form.create_variables(&scope)["input"]["projectId"], json!("p1"));
    }

    #[test]
    fn defect_filter_omits_empty_values() {
        let mut scope = ListScope::for_project("p1");
        assert_eq!(Defect::list_variables(&scope)["filter"], json!({}));

        scope.search = "  краш ".to_string();
        scope.severity = Some(Severity::Critical);
        assert_eq!(
            Defect::list_variables(&scope)["filter"],
            json!({ "title": "краш", "severity": "CRITICAL" })
        );
    }

    #[test]
    fn defect_creation_needs_current_user() {
        let mut scope = ListScope::for_project("p1");
        let form = DefectForm {
            id: None,
            title: "Падает логин".into(),
            actual_result: "500".into(),
            severity: Severity::Major,
        };
        assert_eq!(form.validate(&scope).unwrap_err().get("createdById"), Some("owner_required"));

        scope.current_user_id = Some("u1".into());
        assert!(form.validate(&scope).is_ok());
        let input = &form.create_variables(&scope)["input"];
        assert_eq!(input["createdById"], json!("u1"));
        assert_eq!(input["severity"], json!("MAJOR"));

        let update = form.update_variables("d1", &scope);
        assert_eq!(update["id"], json!("d1"));
        assert!(update["input"].get("projectId").is_none());
    }

    #[test]
    fn tag_form_round_trips_through_row() {
        let tag: Tag = serde_json::from_value(json!({
            "id": "t1", "name": "smoke", "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let form = tag.to_form();
        assert_eq!(form.id(), Some("t1"));
        assert_eq!(form.update_variables("t1", &ListScope::default()), json!({ "id": "t1", "input": { "name": "smoke" } }));
        assert_eq!(tag.cells(), vec!["smoke".to_string(), "01.05.2024".to_string()]);
    }
}
