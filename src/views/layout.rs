// ============================================================================
// LAYOUT - Cabecera, pestañas de proyecto y snackbar
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{append_child, button, clear_children, text_element, ElementBuilder};
use crate::state::{ProjectSection, Route};
use crate::utils::i18n::tr;
use crate::utils::validators::ValidationErrors;
use crate::viewmodels::{AuthViewModel, PageContext};

/// Cabecera + contenido
pub fn render_shell(ctx: &PageContext, content: Element) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("app-shell")
        .child(render_header(ctx)?)?
        .child(ElementBuilder::new("main")?.class("app-content").child(content)?.build())?
        .build())
}

fn render_header(ctx: &PageContext) -> Result<Element, JsValue> {
    let nav = ctx.navigator.clone();
    let projects = button("header-link", &tr("projects"), move |_| nav.navigate(Route::Projects))?;

    let nav = ctx.navigator.clone();
    let profile = button("header-link", "👤", move |_| nav.navigate(Route::Profile))?;

    let auth = AuthViewModel::new(ctx.clone());
    let logout = button("header-link btn-logout", &tr("logout"), move |_| auth.logout())?;

    Ok(ElementBuilder::new("header")?
        .class("app-header")
        .child(text_element("span", "app-logo", "TMS")?)?
        .child(projects)?
        .child(ElementBuilder::new("span").map(|b| b.class("spacer").build())?)?
        .child(profile)?
        .child(logout)?
        .build())
}

/// Pestañas de secciones de un proyecto + contenido de la sección
pub fn render_project_shell(
    ctx: &PageContext,
    project_id: &str,
    active: ProjectSection,
    content: Element,
) -> Result<Element, JsValue> {
    let tabs = ElementBuilder::new("nav")?.class("project-tabs").build();
    for section in ProjectSection::ALL {
        let nav = ctx.navigator.clone();
        let route = Route::Project { project_id: project_id.to_string(), section };
        let class = if section == active { "tab active" } else { "tab" };
        let tab = button(class, &tr(section.label_key()), move |_| nav.navigate(route.clone()))?;
        tabs.append_child(&tab)?;
    }

    Ok(ElementBuilder::new("div")?
        .class("project-page")
        .child(tabs)?
        .child(ElementBuilder::new("section")?.class("project-section").child(content)?.build())?
        .build())
}

/// Snackbar con la notificación visible (si la hay)
pub fn render_notification(ctx: &PageContext) -> Result<Option<Element>, JsValue> {
    let Some(notification) = ctx.notifications.current().filter(|n| n.visible) else {
        return Ok(None);
    };

    let center = ctx.notifications.clone();
    let close = button("snackbar-close", "✕", move |_| center.dismiss())?;

    let snackbar = ElementBuilder::new("div")?
        .class(&format!("snackbar {}", notification.severity.css_class()))
        .attr("role", "alert")?
        .child(text_element("span", "snackbar-message", &notification.message)?)?
        .child(close)?
        .build();
    Ok(Some(snackbar))
}

/// Diálogo modal de confirmación de borrado
pub fn render_confirm_dialog<C, K>(on_confirm: C, on_cancel: K) -> Result<Element, JsValue>
where
    C: Fn() + 'static,
    K: Fn() + 'static,
{
    let actions = ElementBuilder::new("div")?
        .class("dialog-actions")
        .child(button("btn-secondary", &tr("cancel"), move |_| on_cancel())?)?
        .child(button("btn-danger", &tr("delete"), move |_| on_confirm())?)?
        .build();

    let dialog = ElementBuilder::new("div")?
        .class("dialog")
        .child(text_element("h3", "dialog-title", &tr("confirm_delete_title"))?)?
        .child(text_element("p", "dialog-text", &tr("confirm_delete_text"))?)?
        .child(actions)?
        .build();

    Ok(ElementBuilder::new("div")?.class("dialog-backdrop").child(dialog)?.build())
}

/// Pinta los errores de campo en `target`
pub fn show_errors(target: &Element, errors: &ValidationErrors) {
    clear_children(target);
    for (_, key) in errors.iter() {
        if let Err(e) = text_element("p", "field-error", &tr(key)).and_then(|line| append_child(target, &line)) {
            log::error!("❌ [FORM] render error de campo: {:?}", e);
        }
    }
}
