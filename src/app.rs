// ============================================================================
// APP - Aplicación principal: ruta activa → controlador → DOM
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, clear_children, current_hash, get_element_by_id, on_window_event, set_hash};
use crate::state::{AppState, Route};
use crate::viewmodels::{ActivePage, PageContext};
use crate::views::layout::render_notification;
use crate::views::render_page;

/// Agrupa varios cambios de estado en un solo re-render
fn schedule_render() {
    gloo_timers::callback::Timeout::new(0, crate::rerender_app).forget();
}

pub struct App {
    state: AppState,
    ctx: PageContext,
    root: Element,
    route: Option<Route>,
    page: Option<ActivePage>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app").ok_or_else(|| JsValue::from_str("No #app element found"))?;
        let state = AppState::for_browser();
        let ctx = PageContext::from_app(&state);

        // Ruta inicial desde el hash (enlaces directos)
        if let Some(route) = Route::parse(&current_hash()) {
            state.navigator.navigate(route.guard(state.session.is_authenticated()));
        }

        state.navigator.subscribe(schedule_render);
        state.notifications.subscribe(schedule_render);

        // Atrás/adelante del navegador
        let navigator = state.navigator.clone();
        on_window_event("hashchange", move |_| match Route::parse(&current_hash()) {
            Some(route) => navigator.navigate(route),
            None => log::warn!("⚠️ [APP] Ruta desconocida: {}", current_hash()),
        })?;

        Ok(Self { state, ctx, root, route: None, page: None })
    }

    /// Ruta efectiva: sin token, las rutas privadas llevan al login
    fn effective_route(&self) -> Route {
        let route = self.state.navigator.current();
        if !route.is_public() && !self.state.session.is_authenticated() {
            log::info!("🔒 [APP] {} requiere sesión", route.path());
            self.state.navigator.navigate(Route::Login);
            return Route::Login;
        }
        route
    }

    /// Cambia de controlador si la ruta cambió y lanza su carga inicial
    fn activate(&mut self, route: &Route) {
        if self.route.as_ref() == Some(route) {
            return;
        }
        log::info!("📄 [APP] Página {}", route.path());
        let page = ActivePage::for_route(route, &self.ctx);
        page.watch(schedule_render);
        set_hash(&route.path());

        let loader = page.clone();
        spawn_local(async move { loader.load().await });

        self.page = Some(page);
        self.route = Some(route.clone());
    }

    /// Re-render completo
    pub fn render(&mut self) -> Result<(), JsValue> {
        let route = self.effective_route();
        self.activate(&route);

        clear_children(&self.root);
        if let Some(page) = &self.page {
            append_child(&self.root, &render_page(page, &route, &self.ctx)?)?;
        }
        if let Some(snackbar) = render_notification(&self.ctx)? {
            append_child(&self.root, &snackbar)?;
        }
        Ok(())
    }
}
