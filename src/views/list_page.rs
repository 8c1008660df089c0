// ============================================================================
// LIST PAGE - Vista genérica: búsqueda, tabla, paginación, modal y borrado
// ============================================================================
// Todas las páginas de listado se pintan aquí a partir de un ListResource.
// El render es completo en cada cambio de estado (ver app.rs).
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, button, field_value, form_group, on_enter, set_text_content, text_element, Control, ElementBuilder};
use crate::utils::i18n::tr;
use crate::viewmodels::lookup::user_name;
use crate::viewmodels::{EntityForm, FieldKind, ListResource, ListedEntity};
use crate::views::layout::render_confirm_dialog;

/// Ajustes por página del listado genérico
pub struct ListOptions {
    pub title_key: &'static str,
    /// Click en una fila (p. ej. abrir el detalle)
    pub open: Option<Rc<dyn Fn(&str)>>,
    /// Alta en página propia en vez del modal
    pub create: Option<Rc<dyn Fn()>>,
    /// Controles extra junto a la búsqueda (filtros)
    pub toolbar: Vec<Element>,
}

impl ListOptions {
    pub fn new(title_key: &'static str) -> Self {
        Self { title_key, open: None, create: None, toolbar: Vec::new() }
    }

    pub fn open<F: Fn(&str) + 'static>(mut self, open: F) -> Self {
        self.open = Some(Rc::new(open));
        self
    }

    pub fn create<F: Fn() + 'static>(mut self, create: F) -> Self {
        self.create = Some(Rc::new(create));
        self
    }

    pub fn toolbar(mut self, control: Element) -> Self {
        self.toolbar.push(control);
        self
    }
}

pub fn render_list<E: ListedEntity>(list: &ListResource<E>, options: ListOptions) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("list-page").build();
    append_child(&page, &render_list_header(list, &options)?)?;
    append_child(&page, &render_toolbar(list, options.toolbar)?)?;
    append_child(&page, &render_body(list, options.open)?)?;

    if let Some(modal) = render_form_modal(list)? {
        append_child(&page, &modal)?;
    }
    if list.pending_delete().is_some() {
        let confirm = list.clone();
        let cancel = list.clone();
        let dialog = render_confirm_dialog(
            move || {
                let confirm = confirm.clone();
                spawn_local(async move {
                    confirm.confirm_delete().await;
                });
            },
            move || cancel.cancel_delete(),
        )?;
        append_child(&page, &dialog)?;
    }
    Ok(page)
}

fn render_list_header<E: ListedEntity>(list: &ListResource<E>, options: &ListOptions) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("div")?
        .class("list-header")
        .child(text_element("h2", "page-title", &tr(options.title_key))?)?
        .build();

    if let Some(create) = options.create.clone() {
        append_child(&header, &button("btn-primary", &tr("new"), move |_| create())?)?;
    } else if list.can_create() {
        let list = list.clone();
        append_child(&header, &button("btn-primary", &tr("new"), move |_| list.open_create())?)?;
    }
    Ok(header)
}

fn render_toolbar<E: ListedEntity>(list: &ListResource<E>, extra: Vec<Element>) -> Result<Element, JsValue> {
    let search = ElementBuilder::new("input")?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", &tr("search"))?
        .attr("value", &list.scope().search)?
        .build();

    {
        let list = list.clone();
        let input = search.clone();
        on_enter(&search, move || {
            let list = list.clone();
            let text = field_value(&input);
            spawn_local(async move { list.search(&text).await });
        })?;
    }

    Ok(ElementBuilder::new("div")?
        .class("list-toolbar")
        .child(search)?
        .children(extra)?
        .build())
}

fn render_body<E: ListedEntity>(list: &ListResource<E>, open: Option<Rc<dyn Fn(&str)>>) -> Result<Element, JsValue> {
    let state = list.state();

    if let Some(error) = state.error() {
        log::debug!("🖼️ [LIST] render error: {}", error);
        let retry_list = list.clone();
        let retry = button("btn-secondary", "↻", move |_| {
            let list = retry_list.clone();
            spawn_local(async move { list.fetch().await });
        })?;
        return Ok(ElementBuilder::new("div")?
            .class("list-error")
            .child(text_element("p", "error", &tr("load_failed"))?)?
            .child(retry)?
            .build());
    }

    let Some(all_rows) = state.latest() else {
        return text_element("p", "list-loading", &tr("loading"));
    };
    if all_rows.is_empty() {
        return text_element("p", "list-empty", &tr("empty"));
    }

    let table_class = if state.is_loading() { "data-table refreshing" } else { "data-table" };
    let table = ElementBuilder::new("table")?.class(table_class).build();

    let head_row = ElementBuilder::new("tr")?.build();
    for column in E::COLUMNS {
        append_child(&head_row, &text_element("th", "", &tr(column))?)?;
    }
    if list.can_edit() || list.can_delete() {
        append_child(&head_row, &text_element("th", "", "")?)?;
    }
    append_child(&table, &ElementBuilder::new("thead")?.child(head_row)?.build())?;

    let body = ElementBuilder::new("tbody")?.build();
    for row in list.visible_rows() {
        append_child(&body, &render_row(list, &row, open.clone())?)?;
    }
    append_child(&table, &body)?;

    Ok(ElementBuilder::new("div")?
        .class("list-body")
        .child(table)?
        .child(render_pagination(list)?)?
        .build())
}

fn render_row<E: ListedEntity>(
    list: &ListResource<E>,
    row: &E,
    open: Option<Rc<dyn Fn(&str)>>,
) -> Result<Element, JsValue> {
    let id = row.id().to_string();
    let tr_el = ElementBuilder::new("tr")?.class(if open.is_some() { "row clickable" } else { "row" }).build();

    for (index, cell) in row.cells().into_iter().enumerate() {
        let td = text_element("td", "", &cell)?;
        if index == 0 {
            if let Some(open) = open.clone() {
                let id = id.clone();
                crate::dom::on_click(&td, move |_| open(&id))?;
            }
        }
        append_child(&tr_el, &td)?;
    }

    // Autor: búsqueda secundaria, "—" si falla
    if E::COLUMNS.last() == Some(&"author") {
        let td = text_element("td", "author-cell", "…")?;
        let client = list.context().client.clone();
        let author = row.author_id().map(str::to_string);
        let cell = td.clone();
        spawn_local(async move {
            let name = user_name(&client, author.as_deref()).await;
            set_text_content(&cell, &name);
        });
        append_child(&tr_el, &td)?;
    }

    if list.can_edit() || list.can_delete() {
        let actions = ElementBuilder::new("td")?.class("row-actions").build();
        if list.can_edit() {
            let list = list.clone();
            let id = id.clone();
            append_child(&actions, &button("btn-icon", "✏️", move |_| list.open_edit(&id))?)?;
        }
        if list.can_delete() {
            let list = list.clone();
            append_child(&actions, &button("btn-icon", "🗑️", move |_| list.request_delete(&id))?)?;
        }
        append_child(&tr_el, &actions)?;
    }
    Ok(tr_el)
}

fn render_pagination<E: ListedEntity>(list: &ListResource<E>) -> Result<Element, JsValue> {
    let previous = {
        let list = list.clone();
        ElementBuilder::new("button")?
            .class("btn-page")
            .text("‹")
            .flag("disabled", list.page() == 0)?
            .on_click(move |_| list.previous_page())?
            .build()
    };
    let next = {
        let list = list.clone();
        ElementBuilder::new("button")?
            .class("btn-page")
            .text("›")
            .flag("disabled", list.page() + 1 >= list.page_count())?
            .on_click(move |_| list.next_page())?
            .build()
    };
    let label = format!("{} {} / {}", tr("page"), list.page() + 1, list.page_count());

    Ok(ElementBuilder::new("div")?
        .class("pagination")
        .child(previous)?
        .child(text_element("span", "page-label", &label)?)?
        .child(next)?
        .build())
}

/// Modal de alta/edición a partir de `EntityForm::FIELDS`
pub(crate) fn render_form_modal<E: ListedEntity>(list: &ListResource<E>) -> Result<Option<Element>, JsValue> {
    let Some(form) = list.form() else {
        return Ok(None);
    };

    let title = if form.is_edit() { tr("edit") } else { tr("new") };
    let modal = ElementBuilder::new("div")?
        .class("modal")
        .child(text_element("h3", "modal-title", &title)?)?
        .build();

    for field in <E::Form as EntityForm>::FIELDS {
        let control = match field.kind {
            FieldKind::Text => Control::Input("text"),
            FieldKind::Date => Control::Input("date"),
            FieldKind::TextArea => Control::TextArea,
            FieldKind::Select(options) => Control::Select(options),
        };
        let list_ref = list.clone();
        let name = field.name;
        let group = form_group(
            field.name,
            field.label_key,
            control,
            &form.values.field(field.name),
            form.errors.get(field.name),
            move |value| list_ref.update_field(name, &value),
        )?;
        append_child(&modal, &group)?;
    }

    let cancel = {
        let list = list.clone();
        button("btn-secondary", &tr("cancel"), move |_| list.close_form())?
    };
    let save = {
        let list = list.clone();
        ElementBuilder::new("button")?
            .class("btn-primary")
            .text(&tr("save"))
            .flag("disabled", form.submitting)?
            .on_click(move |_| {
                let list = list.clone();
                spawn_local(async move {
                    list.submit_form().await;
                });
            })?
            .build()
    };
    append_child(
        &modal,
        &ElementBuilder::new("div")?.class("modal-actions").child(cancel)?.child(save)?.build(),
    )?;

    Ok(Some(ElementBuilder::new("div")?.class("modal-backdrop").child(modal)?.build()))
}

/// `<select>` de filtro con opción "todos" (valor vacío)
pub fn filter_select<F>(all_label_key: &str, options: &[(&str, &str)], selected: &str, on_change: F) -> Result<Element, JsValue>
where
    F: Fn(String) + 'static,
{
    let select = ElementBuilder::new("select")?.class("filter-select").build();
    let all = ElementBuilder::new("option")?.attr("value", "")?.text(&tr(all_label_key)).build();
    append_child(&select, &all)?;
    for (value, label) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .flag("selected", *value == selected)?
            .text(label)
            .build();
        append_child(&select, &option)?;
    }
    let target = select.clone();
    crate::dom::on_event(&select, "change", move |_| on_change(field_value(&target)))?;
    Ok(select)
}
