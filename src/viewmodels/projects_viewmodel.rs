// ============================================================================
// PROJECTS VIEWMODEL - Lista de proyectos, propiedad y alta
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::models::{AccessType, Project, User};
use crate::services::operations::{CREATE_PROJECT, DELETE_PROJECT, PROJECTS, PROJECT_BY_ID, UPDATE_PROJECT};
use crate::state::{NotificationSeverity, Route};
use crate::utils::validators::{require, ValidationErrors};
use crate::viewmodels::composers::ComposeError;
use crate::viewmodels::detail_resource::DetailResource;
use crate::viewmodels::draft::Draft;
use crate::viewmodels::entities::ProjectForm;
use crate::viewmodels::list_resource::{EntityForm, FormState, ListResource, ListScope, ListedEntity};
use crate::viewmodels::lookup::{all_users, current_user};
use crate::viewmodels::page_context::PageContext;

/// Datos del formulario "Crear proyecto"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub access_type: AccessType,
    /// Solo se envían si el proyecto es privado
    pub member_ids: Vec<String>,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "name_required");
        errors.into_result()
    }
}

#[derive(Clone)]
pub struct ProjectsViewModel {
    ctx: PageContext,
    list: ListResource<Project>,
    me: Rc<RefCell<Option<User>>>,
    draft: Draft<ProjectDraft>,
}

impl ProjectsViewModel {
    pub fn new(ctx: PageContext) -> Self {
        let list = ListResource::new(ctx.clone(), ListScope::default());
        Self { ctx, list, me: Rc::new(RefCell::new(None)), draft: Draft::default() }
    }

    /// Formulario "Crear proyecto"
    pub fn draft(&self) -> &Draft<ProjectDraft> {
        &self.draft
    }

    pub fn list(&self) -> &ListResource<Project> {
        &self.list
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn me(&self) -> Option<User> {
        self.me.borrow().clone()
    }

    /// Carga `me` (para la propiedad) y luego la lista
    pub async fn load(&self) {
        self.load_me().await;
        self.list.fetch().await;
    }

    async fn load_me(&self) -> Option<String> {
        if let Some(user) = self.me.borrow().as_ref() {
            return Some(user.id.clone());
        }
        match current_user(&self.ctx.client).await {
            Ok(user) => {
                let id = user.id.clone();
                self.list.update_scope(|scope| scope.current_user_id = Some(id.clone()));
                *self.me.borrow_mut() = Some(user);
                Some(id)
            }
            Err(error) => {
                log::warn!("⚠️ [PROJECTS] Usuario actual no disponible: {}", error);
                self.ctx.handle_unauthorized(&error);
                None
            }
        }
    }

    /// Editar y borrar solo si el usuario actual es el propietario
    pub fn can_manage(&self, project: &Project) -> bool {
        self.me
            .borrow()
            .as_ref()
            .map(|me| project.is_owned_by(&me.id))
            .unwrap_or(false)
    }

    fn owned(&self, project_id: &str) -> Option<Project> {
        let rows = self.list.state();
        let project = rows.latest()?.iter().find(|p| p.id == project_id)?.clone();
        self.can_manage(&project).then_some(project)
    }

    /// Pide confirmación de borrado. Devuelve `false` si no es el propietario.
    pub fn request_delete(&self, project_id: &str) -> bool {
        match self.owned(project_id) {
            Some(project) => {
                self.list.request_delete(&project.id);
                true
            }
            None => {
                log::warn!("🔒 [PROJECTS] Borrado no permitido para {}", project_id);
                false
            }
        }
    }

    pub async fn confirm_delete(&self) -> bool {
        self.list.confirm_delete().await
    }

    /// Abre los ajustes (edición) si el usuario es el propietario
    pub fn open_settings(&self, project_id: &str) -> bool {
        if self.owned(project_id).is_none() {
            return false;
        }
        self.list.open_edit(project_id);
        true
    }

    /// Usuarios que se pueden añadir como miembros (todos menos uno mismo)
    pub async fn member_candidates(&self) -> Vec<User> {
        let me = self.load_me().await;
        match all_users(&self.ctx.client).await {
            Ok(users) => users
                .into_iter()
                .filter(|u| Some(&u.id) != me.as_ref())
                .collect(),
            Err(error) => {
                log::warn!("⚠️ [PROJECTS] Usuarios no disponibles: {}", error);
                Vec::new()
            }
        }
    }

    /// Envía el borrador de la página; con fallo los valores se conservan
    pub async fn submit_project(&self) -> Result<String, ComposeError> {
        let result = self.create_project(&self.draft.values()).await;
        self.draft.settle(&result, ComposeError::validation);
        result
    }

    /// `createProject` con el usuario actual como propietario
    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<String, ComposeError> {
        draft.validate()?;

        let Some(owner_id) = self.load_me().await else {
            if self.ctx.session.is_authenticated() {
                self.ctx.notify("owner_required", NotificationSeverity::Error);
            }
            let mut errors = ValidationErrors::new();
            errors.add("owner", "owner_required");
            return Err(ComposeError::Validation(errors));
        };

        let mut input = json!({
            "name": draft.name.trim(),
            "description": draft.description,
            "accessType": draft.access_type,
            "ownerId": owner_id,
        });
        if draft.access_type == AccessType::Private {
            input["projectUserIds"] = json!(draft.member_ids);
        }

        match self.ctx.client.mutate_for_id(&CREATE_PROJECT, json!({ "input": input })).await {
            Ok(id) => {
                log::info!("✅ [PROJECTS] Proyecto {} creado", id);
                self.ctx.client.invalidate(PROJECTS.name);
                self.ctx.notify("project_created", NotificationSeverity::Success);
                self.ctx.navigator.navigate(Route::Projects);
                Ok(id)
            }
            Err(error) => {
                self.ctx.report_failure(&error, "create_failed");
                Err(ComposeError::Client(error))
            }
        }
    }
}

// ============================================================================
// AJUSTES DE PROYECTO (solo propietario)
// ============================================================================

const PROJECT_LISTS: &[&str] = &[PROJECTS.name];

#[derive(Clone)]
pub struct ProjectSettings {
    detail: DetailResource<Project>,
    form: Rc<RefCell<FormState<ProjectForm>>>,
    me: Rc<RefCell<Option<String>>>,
}

impl ProjectSettings {
    pub fn new(ctx: PageContext, project_id: &str) -> Self {
        Self {
            detail: DetailResource::new(ctx, PROJECT_BY_ID, Some(DELETE_PROJECT), project_id).invalidating(PROJECT_LISTS),
            form: Rc::new(RefCell::new(FormState {
                values: ProjectForm::default(),
                errors: ValidationErrors::new(),
                submitting: false,
            })),
            me: Rc::new(RefCell::new(None)),
        }
    }

    pub fn detail(&self) -> &DetailResource<Project> {
        &self.detail
    }

    pub fn form(&self) -> FormState<ProjectForm> {
        self.form.borrow().clone()
    }

    /// Carga el proyecto y el usuario actual; rellena el formulario
    pub async fn load(&self) {
        let ctx = self.detail.context();
        match current_user(&ctx.client).await {
            Ok(user) => *self.me.borrow_mut() = Some(user.id),
            Err(error) => log::warn!("⚠️ [SETTINGS] Usuario actual no disponible: {}", error),
        }
        self.detail.fetch().await;
        if let Some(project) = self.detail.state().data() {
            self.form.borrow_mut().values = project.to_form();
        }
    }

    pub fn is_owner(&self) -> bool {
        let me = self.me.borrow();
        match (self.detail.state().data(), me.as_deref()) {
            (Some(project), Some(me)) => project.is_owned_by(me),
            _ => false,
        }
    }

    pub fn update_field(&self, name: &str, value: &str) {
        self.form.borrow_mut().values.set_field(name, value);
    }

    /// `updateProject`; el propietario es el único que puede guardar
    pub async fn save(&self) -> bool {
        if !self.is_owner() {
            return false;
        }
        let values = self.form.borrow().values.clone();
        let scope = ListScope::default();
        if let Err(errors) = values.validate(&scope) {
            self.form.borrow_mut().errors = errors;
            return false;
        }
        let ctx = self.detail.context();
        let variables = values.update_variables(self.detail.id(), &scope);
        self.form.borrow_mut().submitting = true;
        let result = ctx.client.mutate(&UPDATE_PROJECT, variables).await;
        {
            let mut form = self.form.borrow_mut();
            form.submitting = false;
            form.errors = ValidationErrors::new();
        }
        match result {
            Ok(_) => {
                ctx.client.invalidate(PROJECTS.name);
                ctx.notify("saved_ok", NotificationSeverity::Success);
                self.detail.fetch().await;
                true
            }
            Err(error) => {
                ctx.report_failure(&error, "save_failed");
                false
            }
        }
    }

    pub fn request_delete(&self) -> bool {
        if !self.is_owner() {
            return false;
        }
        self.detail.request_delete();
        true
    }

    pub async fn confirm_delete(&self) -> bool {
        self.detail.confirm_delete(Route::Projects).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_context, RecordingTransport};
    use futures::executor::block_on;
    use serde_json::Value;

    fn projects_response() -> Value {
        json!({ "data": { "projects": { "nodes": [
            { "id": "p-mine", "name": "Мой", "ownerId": "u-1" },
            { "id": "p-other", "name": "Чужой", "ownerId": "u-2" }
        ] } } })
    }

    fn loaded(transport: &RecordingTransport) -> ProjectsViewModel {
        transport.push_json(200, json!({ "data": { "me": { "id": "u-1" } } }));
        transport.push_json(200, projects_response());
        let vm = ProjectsViewModel::new(test_context(Rc::new(transport.clone())));
        block_on(vm.load());
        vm
    }

    #[test]
    fn delete_is_offered_only_to_the_owner() {
        let transport = RecordingTransport::new();
        let vm = loaded(&transport);
        let rows = vm.list().state().data().cloned().unwrap();

        assert!(vm.can_manage(&rows[0]));
        assert!(!vm.can_manage(&rows[1]));
        assert!(!vm.request_delete("p-other"));
        assert_eq!(vm.list().pending_delete(), None);
        assert!(vm.request_delete("p-mine"));
        assert_eq!(vm.list().pending_delete().as_deref(), Some("p-mine"));
        assert!(!vm.open_settings("p-other"));
    }

    #[test]
    fn nothing_is_manageable_without_current_user() {
        let transport = RecordingTransport::new();
        transport.push_json(500, json!({}));
        transport.push_json(200, projects_response());
        let vm = ProjectsViewModel::new(test_context(Rc::new(transport.clone())));
        block_on(vm.load());

        let rows = vm.list().state().data().cloned().unwrap();
        assert!(rows.iter().all(|p| !vm.can_manage(p)));
    }

    #[test]
    fn private_project_sends_members() {
        let transport = RecordingTransport::new();
        let vm = loaded(&transport);
        transport.push_json(200, json!({ "data": { "createProject": "p-new" } }));
        let draft = ProjectDraft {
            name: "Новый".to_string(),
            access_type: AccessType::Private,
            member_ids: vec!["u-2".into()],
            ..ProjectDraft::default()
        };

        let id = block_on(vm.create_project(&draft)).unwrap();

        assert_eq!(id, "p-new");
        let body = transport.requests()[2].json_body().unwrap();
        assert_eq!(body["operationName"], "CreateProject");
        assert_eq!(body["variables"]["input"]["ownerId"], json!("u-1"));
        assert_eq!(body["variables"]["input"]["accessType"], json!("PRIVATE"));
        assert_eq!(body["variables"]["input"]["projectUserIds"], json!(["u-2"]));
        assert_eq!(vm.ctx.notifications.current().unwrap().message, "Проект успешно создан");
    }

    #[test]
    fn public_project_omits_members() {
        let transport = RecordingTransport::new();
        let vm = loaded(&transport);
        transport.push_json(200, json!({ "data": { "createProject": "p-new" } }));
        let draft = ProjectDraft {
            name: "Открытый".to_string(),
            member_ids: vec!["u-2".into()],
            ..ProjectDraft::default()
        };

        block_on(vm.create_project(&draft)).unwrap();

        let input = &transport.requests()[2].json_body().unwrap()["variables"]["input"];
        assert_eq!(input["accessType"], json!("PUBLIC"));
        assert!(input.get("projectUserIds").is_none());
    }

    #[test]
    fn failed_create_keeps_the_project_draft() {
        let transport = RecordingTransport::new();
        let vm = loaded(&transport);
        transport.push_json(200, json!({ "errors": [{ "message": "duplicate" }] }));
        vm.draft().update(|d| {
            d.name = "Мобильное приложение".to_string();
            d.access_type = AccessType::Private;
            d.member_ids = vec!["u-2".into()];
        });

        assert!(block_on(vm.submit_project()).is_err());

        let kept = vm.draft().values();
        assert_eq!(kept.name, "Мобильное приложение");
        assert_eq!(kept.access_type, AccessType::Private);
        assert_eq!(kept.member_ids, vec!["u-2".to_string()]);
        assert_eq!(vm.ctx.notifications.current().unwrap().message, "Ошибка при создании");
    }

    #[test]
    fn missing_name_is_reported_on_the_draft() {
        let transport = RecordingTransport::new();
        let vm = loaded(&transport);
        vm.draft().update(|d| d.description = "Без имени".to_string());

        assert!(block_on(vm.submit_project()).is_err());

        assert_eq!(vm.draft().errors().get("name"), Some("name_required"));
        assert_eq!(vm.draft().values().description, "Без имени");
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn settings_are_read_only_for_other_users() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u-2" } } }));
        transport.push_json(200, json!({ "data": { "projectById": { "id": "p1", "name": "Проект", "ownerId": "u-1" } } }));
        let settings = ProjectSettings::new(test_context(Rc::new(transport.clone())), "p1");
        block_on(settings.load());

        assert_eq!(settings.form().values.name, "Проект");
        assert!(!settings.is_owner());
        assert!(!settings.request_delete());
        assert!(!block_on(settings.save()));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn owner_saves_settings() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": { "me": { "id": "u-1" } } }));
        transport.push_json(200, json!({ "data": { "projectById": { "id": "p1", "name": "Проект", "ownerId": "u-1" } } }));
        transport.push_json(200, json!({ "data": { "updateProject": "p1" } }));
        let settings = ProjectSettings::new(test_context(Rc::new(transport.clone())), "p1");
        block_on(settings.load());

        settings.update_field("name", "Переименован");
        assert!(block_on(settings.save()));

        let body = transport.requests()[2].json_body().unwrap();
        assert_eq!(body["operationName"], "UpdateProject");
        assert_eq!(body["variables"]["input"]["name"], json!("Переименован"));
        assert_eq!(transport.operation_names().last().map(String::as_str), Some("ProjectById"));
    }
}
