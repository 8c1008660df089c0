// ============================================================================
// LIST RESOURCE - Controlador genérico de páginas de listado
// ============================================================================
// fetch → mutate → refetch, con formulario modal y confirmación de borrado.
// Una entidad declara sus operaciones (list/create/update/delete) y cómo
// construir variables; el resto es común a todas las páginas.
//
//   Idle → Loading → Loaded | Errored ; Loaded → Loading en cada refetch
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::Severity;
use crate::services::graphql::Operation;
use crate::services::FetchPolicy;
use crate::state::{NotificationSeverity, QueryState};
use crate::utils::validators::ValidationErrors;
use crate::viewmodels::page_context::PageContext;

/// Variables de alcance de una lista (proyecto, búsqueda y filtros)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListScope {
    pub project_id: Option<String>,
    pub search: String,
    pub severity: Option<Severity>,
    pub suite_id: Option<String>,
    /// Usuario actual (`me`), necesario para `createdById`
    pub current_user_id: Option<String>,
}

impl ListScope {
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            ..Self::default()
        }
    }

    /// Búsqueda como variable: cadena vacía → `null` (sin filtro)
    pub fn search_value(&self) -> Value {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            Value::Null
        } else {
            Value::String(trimmed.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    Select(&'static [(&'static str, &'static str)]),
}

/// Campo editable del formulario modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label_key: &'static str,
    pub kind: FieldKind,
}

/// Formulario de alta/edición de una entidad
pub trait EntityForm: Clone + Default + PartialEq + 'static {
    const FIELDS: &'static [FormField];

    /// `Some(id)` en modo edición
    fn id(&self) -> Option<&str>;
    fn field(&self, name: &str) -> String;
    fn set_field(&mut self, name: &str, value: &str);
    fn validate(&self, scope: &ListScope) -> Result<(), ValidationErrors>;
    fn create_variables(&self, scope: &ListScope) -> Value;
    fn update_variables(&self, id: &str, scope: &ListScope) -> Value;
}

/// Entidad listable
pub trait ListedEntity: DeserializeOwned + Clone + PartialEq + 'static {
    type Form: EntityForm;

    const LIST: Operation;
    const CREATE: Option<Operation> = None;
    const UPDATE: Option<Operation> = None;
    const DELETE: Option<Operation> = None;
    /// Claves i18n de las columnas. Si la entidad tiene autor (`author_id`),
    /// la última columna es `author` y `cells` no la incluye.
    const COLUMNS: &'static [&'static str];
    /// Consultas en caché (búsquedas por id) que una mutation deja obsoletas,
    /// además de la propia lista
    const STALE_AFTER_MUTATION: &'static [&'static str] = &[];

    fn id(&self) -> &str;
    fn list_variables(scope: &ListScope) -> Value;
    fn cells(&self) -> Vec<String>;
    fn to_form(&self) -> Self::Form;

    /// Usuario a mostrar en la columna "autor" (búsqueda secundaria)
    fn author_id(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F> {
    pub values: F,
    pub errors: ValidationErrors,
    pub submitting: bool,
}

impl<F: EntityForm> FormState<F> {
    pub fn is_edit(&self) -> bool {
        self.values.id().is_some()
    }
}

struct Inner<E: ListedEntity> {
    ctx: PageContext,
    scope: RefCell<ListScope>,
    rows: RefCell<QueryState<Vec<E>>>,
    page: Cell<usize>,
    page_size: usize,
    latest_fetch: Cell<u64>,
    form: RefCell<Option<FormState<E::Form>>>,
    pending_delete: RefCell<Option<String>>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

pub struct ListResource<E: ListedEntity> {
    inner: Rc<Inner<E>>,
}

impl<E: ListedEntity> Clone for ListResource<E> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<E: ListedEntity> ListResource<E> {
    pub fn new(ctx: PageContext, scope: ListScope) -> Self {
        let page_size = ctx.page_size.max(1);
        Self {
            inner: Rc::new(Inner {
                ctx,
                scope: RefCell::new(scope),
                rows: RefCell::new(QueryState::Idle),
                page: Cell::new(0),
                page_size,
                latest_fetch: Cell::new(0),
                form: RefCell::new(None),
                pending_delete: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.inner.ctx
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn() + 'static,
    {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    // ========================================================================
    // LISTADO
    // ========================================================================

    pub fn state(&self) -> QueryState<Vec<E>> {
        self.inner.rows.borrow().clone()
    }

    pub fn scope(&self) -> ListScope {
        self.inner.scope.borrow().clone()
    }

    /// Pide la lista a la red. Solo la petición emitida más recientemente
    /// actualiza el estado; una respuesta anterior que llegue tarde se descarta.
    pub async fn fetch(&self) {
        let ticket = self.inner.latest_fetch.get() + 1;
        self.inner.latest_fetch.set(ticket);

        let variables = E::list_variables(&self.inner.scope.borrow());
        {
            let mut rows = self.inner.rows.borrow_mut();
            let current = std::mem::take(&mut *rows);
            *rows = current.into_loading();
        }
        self.notify();

        let result = self
            .inner
            .ctx
            .client
            .query_nodes::<E>(&E::LIST, variables, FetchPolicy::NetworkOnly)
            .await;

        if self.inner.latest_fetch.get() != ticket {
            log::debug!("⏭️ [LIST] {} respuesta obsoleta descartada", E::LIST.name);
            return;
        }

        let next = match result {
            Ok(rows) => {
                log::info!("📋 [LIST] {}: {} filas", E::LIST.name, rows.len());
                QueryState::Loaded(rows)
            }
            Err(error) => {
                log::error!("❌ [LIST] {}: {}", E::LIST.name, error);
                self.inner.ctx.handle_unauthorized(&error);
                QueryState::Errored(error)
            }
        };
        *self.inner.rows.borrow_mut() = next;
        self.clamp_page();
        self.notify();
    }

    /// Cambia el texto de búsqueda y vuelve a la primera página
    pub fn set_search(&self, search: &str) {
        self.update_scope(|scope| scope.search = search.to_string());
    }

    /// Cambia cualquier filtro del alcance y vuelve a la primera página
    pub fn update_scope<F>(&self, change: F)
    where
        F: FnOnce(&mut ListScope),
    {
        change(&mut self.inner.scope.borrow_mut());
        self.inner.page.set(0);
        self.notify();
    }

    /// `set_search` + `fetch`
    pub async fn search(&self, search: &str) {
        self.set_search(search);
        self.fetch().await;
    }

    // ========================================================================
    // PAGINACIÓN (cliente)
    // ========================================================================

    pub fn page(&self) -> usize {
        self.inner.page.get()
    }

    pub fn page_count(&self) -> usize {
        let total = self.inner.rows.borrow().latest().map(Vec::len).unwrap_or(0);
        total.div_ceil(self.inner.page_size).max(1)
    }

    /// Filas de la página actual (también durante un refetch)
    pub fn visible_rows(&self) -> Vec<E> {
        let rows = self.inner.rows.borrow();
        let start = self.inner.page.get() * self.inner.page_size;
        rows.latest()
            .map(|all| all.iter().skip(start).take(self.inner.page_size).cloned().collect())
            .unwrap_or_default()
    }

    pub fn next_page(&self) {
        if self.page() + 1 < self.page_count() {
            self.inner.page.set(self.page() + 1);
            self.notify();
        }
    }

    pub fn previous_page(&self) {
        if self.page() > 0 {
            self.inner.page.set(self.page() - 1);
            self.notify();
        }
    }

    fn clamp_page(&self) {
        let last = self.page_count() - 1;
        if self.inner.page.get() > last {
            self.inner.page.set(last);
        }
    }

    // ========================================================================
    // FORMULARIO MODAL
    // ========================================================================

    pub fn form(&self) -> Option<FormState<E::Form>> {
        self.inner.form.borrow().clone()
    }

    pub fn can_create(&self) -> bool {
        E::CREATE.is_some()
    }

    pub fn can_edit(&self) -> bool {
        E::UPDATE.is_some()
    }

    pub fn can_delete(&self) -> bool {
        E::DELETE.is_some()
    }

    pub fn open_create(&self) {
        self.open_form(E::Form::default());
    }

    /// Abre el formulario con los valores de la fila `id`
    pub fn open_edit(&self, id: &str) {
        let row = self
            .inner
            .rows
            .borrow()
            .latest()
            .and_then(|rows| rows.iter().find(|r| r.id() == id).cloned());
        match row {
            Some(row) => self.open_form(row.to_form()),
            None => log::warn!("⚠️ [LIST] fila {} no encontrada para editar", id),
        }
    }

    fn open_form(&self, values: E::Form) {
        *self.inner.form.borrow_mut() = Some(FormState {
            values,
            errors: ValidationErrors::new(),
            submitting: false,
        });
        self.notify();
    }

    pub fn update_field(&self, name: &str, value: &str) {
        if let Some(form) = self.inner.form.borrow_mut().as_mut() {
            form.values.set_field(name, value);
        }
    }

    pub fn close_form(&self) {
        self.inner.form.borrow_mut().take();
        self.notify();
    }

    /// Envía el formulario. Devuelve `true` si la mutation tuvo éxito.
    ///
    /// Éxito: cierra el modal, refetch y notificación de éxito.
    /// Fallo: el modal sigue abierto con sus valores, una sola notificación de
    /// error y la lista no cambia.
    pub async fn submit_form(&self) -> bool {
        let (values, scope) = {
            let form = self.inner.form.borrow();
            match form.as_ref() {
                Some(form) if !form.submitting => (form.values.clone(), self.scope()),
                _ => return false,
            }
        };

        if let Err(errors) = values.validate(&scope) {
            if let Some(form) = self.inner.form.borrow_mut().as_mut() {
                form.errors = errors;
            }
            self.notify();
            return false;
        }

        let (operation, variables) = match values.id() {
            Some(id) => (E::UPDATE, values.update_variables(id, &scope)),
            None => (E::CREATE, values.create_variables(&scope)),
        };
        let Some(operation) = operation else {
            log::warn!("⚠️ [LIST] {} no admite esta operación", E::LIST.name);
            return false;
        };

        self.set_submitting(true);
        let result = self.inner.ctx.client.mutate(&operation, variables).await;

        match result {
            Ok(_) => {
                self.invalidate_cached();
                self.inner.form.borrow_mut().take();
                self.notify();
                self.fetch().await;
                self.inner.ctx.notify("saved_ok", NotificationSeverity::Success);
                true
            }
            Err(error) => {
                self.set_submitting(false);
                self.inner.ctx.report_failure(&error, "save_failed");
                false
            }
        }
    }

    /// Los catálogos CacheFirst (selectores, nombres) se vuelven a pedir
    fn invalidate_cached(&self) {
        let client = &self.inner.ctx.client;
        client.invalidate(E::LIST.name);
        for operation in E::STALE_AFTER_MUTATION {
            client.invalidate(operation);
        }
    }

    fn set_submitting(&self, submitting: bool) {
        if let Some(form) = self.inner.form.borrow_mut().as_mut() {
            form.submitting = submitting;
            form.errors = ValidationErrors::new();
        }
        self.notify();
    }

    // ========================================================================
    // BORRADO CON CONFIRMACIÓN
    // ========================================================================

    pub fn request_delete(&self, id: &str) {
        *self.inner.pending_delete.borrow_mut() = Some(id.to_string());
        self.notify();
    }

    pub fn cancel_delete(&self) {
        self.inner.pending_delete.borrow_mut().take();
        self.notify();
    }

    pub fn pending_delete(&self) -> Option<String> {
        self.inner.pending_delete.borrow().clone()
    }

    /// Cierra el diálogo, borra y notifica según el resultado real.
    pub async fn confirm_delete(&self) -> bool {
        let Some(id) = self.inner.pending_delete.borrow_mut().take() else {
            return false;
        };
        self.notify();

        let Some(operation) = E::DELETE else {
            return false;
        };
        let result = self
            .inner
            .ctx
            .client
            .mutate(&operation, serde_json::json!({ "id": id }))
            .await;

        match result {
            Ok(_) => {
                self.invalidate_cached();
                self.fetch().await;
                self.inner.ctx.notify("deleted_ok", NotificationSeverity::Success);
                true
            }
            Err(error) => {
                self.inner.ctx.report_failure(&error, "delete_failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, Tag};
    use crate::services::ClientError;
    use crate::state::Route;
    use crate::testing::{test_context, DeferredTransport, FakeApiServer, RecordingTransport};
    use crate::viewmodels::lookup::milestone_name;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    fn tags_resource(server: &FakeApiServer) -> ListResource<Tag> {
        ListResource::new(test_context(Rc::new(server.clone())), ListScope::default())
    }

    fn names(resource: &ListResource<Tag>) -> Vec<String> {
        resource
            .state()
            .data()
            .map(|rows| rows.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default()
    }

    fn count_notifications(resource: &ListResource<Tag>) -> Rc<Cell<usize>> {
        let shown = Rc::new(Cell::new(0));
        let counter = shown.clone();
        let center = resource.context().notifications.clone();
        resource.context().notifications.subscribe(move || {
            if center.current().is_some() {
                counter.set(counter.get() + 1);
            }
        });
        shown
    }

    #[test]
    fn created_tag_is_listed_with_server_id_and_timestamp() {
        let server = FakeApiServer::new();
        let tags = tags_resource(&server);
        block_on(tags.fetch());
        assert_eq!(tags.state(), QueryState::Loaded(Vec::new()));

        tags.open_create();
        tags.update_field("name", "smoke");
        assert!(block_on(tags.submit_form()));

        let rows = tags.state().data().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "smoke");
        assert_eq!(rows[0].id, "tag-1");
        assert_eq!(rows[0].created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        assert_eq!(tags.form(), None);
        let notification = tags.context().notifications.current().unwrap();
        assert_eq!(notification.message, "Успешно сохранено");
        assert_eq!(notification.severity, NotificationSeverity::Success);
        assert_eq!(server.operation_names(), vec!["Tags", "CreateTag", "Tags"]);
    }

    #[test]
    fn failed_save_keeps_form_and_list() {
        let server = FakeApiServer::new();
        server.seed_tag("regression");
        let tags = tags_resource(&server);
        block_on(tags.fetch());
        let shown = count_notifications(&tags);

        server.fail_mutations(true);
        tags.open_create();
        tags.update_field("name", "smoke");
        assert!(!block_on(tags.submit_form()));

        assert_eq!(names(&tags), vec!["regression"]);
        let form = tags.form().unwrap();
        assert_eq!(form.values.name, "smoke");
        assert!(!form.submitting);
        assert_eq!(shown.get(), 1);
        assert_eq!(tags.context().notifications.current().unwrap().message, "Ошибка при сохранении");
        assert_eq!(server.operation_names(), vec!["Tags", "CreateTag"]);
    }

    #[test]
    fn validation_errors_never_reach_the_network() {
        let server = FakeApiServer::new();
        let tags = tags_resource(&server);

        tags.open_create();
        tags.update_field("name", "   ");
        assert!(!block_on(tags.submit_form()));

        assert_eq!(tags.form().unwrap().errors.get("name"), Some("name_required"));
        assert!(server.requests().is_empty());
        assert_eq!(tags.context().notifications.current(), None);
    }

    #[test]
    fn edit_and_delete_refresh_the_list() {
        let server = FakeApiServer::new();
        let id = server.seed_tag("smoke");
        let tags = tags_resource(&server);
        block_on(tags.fetch());

        tags.open_edit(&id);
        assert!(tags.form().unwrap().is_edit());
        tags.update_field("name", "smoke-ui");
        assert!(block_on(tags.submit_form()));
        assert_eq!(names(&tags), vec!["smoke-ui"]);

        tags.request_delete(&id);
        assert_eq!(tags.pending_delete(), Some(id.clone()));
        assert!(block_on(tags.confirm_delete()));
        assert_eq!(tags.pending_delete(), None);
        assert!(names(&tags).is_empty());
        assert_eq!(tags.context().notifications.current().unwrap().message, "Успешно удалено");
    }

    #[test]
    fn failed_delete_reports_error_and_keeps_rows() {
        let server = FakeApiServer::new();
        let id = server.seed_tag("smoke");
        let tags = tags_resource(&server);
        block_on(tags.fetch());

        server.fail_mutations(true);
        tags.request_delete(&id);
        assert!(!block_on(tags.confirm_delete()));

        assert_eq!(tags.pending_delete(), None);
        assert_eq!(names(&tags), vec!["smoke"]);
        let notification = tags.context().notifications.current().unwrap();
        assert_eq!(notification.message, "Ошибка при удалении");
        assert_eq!(notification.severity, NotificationSeverity::Error);
    }

    #[test]
    fn cancelled_delete_sends_nothing() {
        let server = FakeApiServer::new();
        let id = server.seed_tag("smoke");
        let tags = tags_resource(&server);

        tags.request_delete(&id);
        tags.cancel_delete();
        assert!(!block_on(tags.confirm_delete()));
        assert!(server.requests().is_empty());
    }

    #[test]
    fn late_response_of_older_fetch_is_discarded() {
        let transport = DeferredTransport::new();
        let tags: ListResource<Tag> =
            ListResource::new(test_context(Rc::new(transport.clone())), ListScope::default());
        let mut pool = LocalPool::new();

        tags.set_search("a");
        let first = tags.clone();
        pool.spawner().spawn_local(async move { first.fetch().await }).unwrap();
        pool.run_until_stalled();

        tags.set_search("b");
        let second = tags.clone();
        pool.spawner().spawn_local(async move { second.fetch().await }).unwrap();
        pool.run_until_stalled();
        assert_eq!(transport.pending(), 2);

        let body = |name: &str| json!({ "data": { "tags": { "nodes": [
            { "id": name, "name": name, "createdAt": "2024-05-01T10:00:00Z" }
        ] } } });
        transport.resolve_json(1, 200, body("beta"));
        pool.run_until_stalled();
        transport.resolve_json(0, 200, body("alpha"));
        pool.run_until_stalled();

        assert_eq!(names(&tags), vec!["beta"]);
        assert_eq!(transport.request(1).json_body().unwrap()["variables"]["filter"]["name"], "b");
    }

    #[test]
    fn search_resets_client_side_pagination() {
        let server = FakeApiServer::new();
        for name in ["a1", "a2", "a3", "a4", "a5"] {
            server.seed_tag(name);
        }
        let mut ctx = test_context(Rc::new(server.clone()));
        ctx.page_size = 2;
        let tags: ListResource<Tag> = ListResource::new(ctx, ListScope::default());
        block_on(tags.fetch());

        assert_eq!(tags.page_count(), 3);
        tags.next_page();
        tags.next_page();
        tags.next_page();
        assert_eq!(tags.page(), 2);
        assert_eq!(tags.visible_rows().len(), 1);

        block_on(tags.search("a"));
        assert_eq!(tags.page(), 0);
        assert_eq!(tags.visible_rows().len(), 2);
        tags.previous_page();
        assert_eq!(tags.page(), 0);
    }

    #[test]
    fn renamed_milestone_is_not_served_from_cache() {
        let transport = RecordingTransport::new();
        let milestone = |name: &str| json!({ "id": "m1", "name": name, "dueDate": "2024-06-30T00:00:00Z" });
        transport.push_json(200, json!({ "data": { "milestoneById": milestone("Релиз 1") } }));
        transport.push_json(200, json!({ "data": { "milestonesByProjectId": { "nodes": [milestone("Релиз 1")] } } }));
        transport.push_json(200, json!({ "data": { "updateMilestone": "m1" } }));
        transport.push_json(200, json!({ "data": { "milestonesByProjectId": { "nodes": [milestone("Релиз 2")] } } }));
        transport.push_json(200, json!({ "data": { "milestoneById": milestone("Релиз 2") } }));
        let milestones: ListResource<Milestone> =
            ListResource::new(test_context(Rc::new(transport.clone())), ListScope::for_project("p1"));
        let client = milestones.context().client.clone();

        assert_eq!(block_on(milestone_name(&client, Some("m1"))), "Релиз 1");
        block_on(milestones.fetch());
        milestones.open_edit("m1");
        milestones.update_field("name", "Релиз 2");
        assert!(block_on(milestones.submit_form()));

        assert_eq!(block_on(milestone_name(&client, Some("m1"))), "Релиз 2");
        assert_eq!(
            transport.operation_names(),
            vec!["MilestoneById", "MilestonesByProjectId", "UpdateMilestone", "MilestonesByProjectId", "MilestoneById"]
        );
    }

    #[test]
    fn rejected_fetch_redirects_to_login() {
        let server = FakeApiServer::new();
        server.require_token(true);
        let tags = tags_resource(&server);
        tags.context().navigator.navigate(Route::Projects);

        block_on(tags.fetch());

        assert_eq!(tags.state().error(), Some(&ClientError::Unauthorized));
        assert_eq!(tags.context().navigator.current(), Route::Login);
    }
}
