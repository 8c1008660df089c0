// ============================================================================
// DETAIL RESOURCE - Un registro por id + borrado con confirmación
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::services::graphql::Operation;
use crate::services::FetchPolicy;
use crate::state::{NotificationSeverity, QueryState, Route};
use crate::viewmodels::page_context::PageContext;

struct Inner<T> {
    ctx: PageContext,
    query: Operation,
    delete: Option<Operation>,
    id: String,
    record: RefCell<QueryState<T>>,
    confirm_open: Cell<bool>,
    /// Consultas en caché que un borrado deja obsoletas
    stale_on_delete: Cell<&'static [&'static str]>,
    latest_fetch: Cell<u64>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

pub struct DetailResource<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for DetailResource<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: DeserializeOwned + Clone + 'static> DetailResource<T> {
    pub fn new(ctx: PageContext, query: Operation, delete: Option<Operation>, id: &str) -> Self {
        Self {
            inner: Rc::new(Inner {
                ctx,
                query,
                delete,
                id: id.to_string(),
                record: RefCell::new(QueryState::Idle),
                confirm_open: Cell::new(false),
                stale_on_delete: Cell::new(&[]),
                latest_fetch: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Catálogos (p. ej. la lista del proyecto) a invalidar tras borrar
    pub fn invalidating(self, operations: &'static [&'static str]) -> Self {
        self.inner.stale_on_delete.set(operations);
        self
    }

    pub fn context(&self) -> &PageContext {
        &self.inner.ctx
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn state(&self) -> QueryState<T> {
        self.inner.record.borrow().clone()
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

    pub async fn fetch(&self) {
        let ticket = self.inner.latest_fetch.get() + 1;
        self.inner.latest_fetch.set(ticket);
        {
            let mut record = self.inner.record.borrow_mut();
            let current = std::mem::take(&mut *record);
            *record = current.into_loading();
        }
        self.notify();

        let result = self
            .inner
            .ctx
            .client
            .query_as::<T>(&self.inner.query, json!({ "id": self.inner.id }), FetchPolicy::NetworkOnly)
            .await;
        if self.inner.latest_fetch.get() != ticket {
            return;
        }

        let next = match result {
            Ok(record) => QueryState::Loaded(record),
            Err(error) => {
                log::error!("❌ [DETAIL] {} {}: {}", self.inner.query.name, self.inner.id, error);
                self.inner.ctx.handle_unauthorized(&error);
                QueryState::Errored(error)
            }
        };
        *self.inner.record.borrow_mut() = next;
        self.notify();
    }

    pub fn can_delete(&self) -> bool {
        self.inner.delete.is_some()
    }

    pub fn confirm_open(&self) -> bool {
        self.inner.confirm_open.get()
    }

    pub fn request_delete(&self) {
        self.inner.confirm_open.set(true);
        self.notify();
    }

    pub fn cancel_delete(&self) {
        self.inner.confirm_open.set(false);
        self.notify();
    }

    /// Borra y, si tiene éxito, navega a `back`
    pub async fn confirm_delete(&self, back: Route) -> bool {
        if !self.inner.confirm_open.replace(false) {
            return false;
        }
        self.notify();
        let Some(operation) = self.inner.delete.as_ref() else {
            return false;
        };

        let ctx = &self.inner.ctx;
        match ctx.client.mutate(operation, json!({ "id": self.inner.id })).await {
            Ok(_) => {
                for stale in self.inner.stale_on_delete.get() {
                    ctx.client.invalidate(stale);
                }
                ctx.notify("deleted_ok", NotificationSeverity::Success);
                ctx.navigator.navigate(back);
                true
            }
            Err(error) => {
                ctx.report_failure(&error, "delete_failed");
                false
            }
        }
    }
}
