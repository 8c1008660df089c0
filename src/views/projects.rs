// ============================================================================
// PROJECTS VIEWS - Tarjetas de proyectos, alta y ajustes
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{
    append_child, button, clear_children, field_value, form_group, on_enter, on_event, text_element, Control,
    ElementBuilder,
};
use crate::models::{AccessType, Project};
use crate::state::{ProjectSection, Route};
use crate::utils::i18n::tr;
use crate::viewmodels::entities::{ProjectForm, ACCESS_OPTIONS};
use crate::viewmodels::{Draft, EntityForm, FieldKind, ProjectDraft, ProjectSettings, ProjectsViewModel};
use crate::views::layout::{render_confirm_dialog, show_errors};
use crate::views::list_page::render_form_modal;

// ============================================================================
// LISTA
// ============================================================================

pub fn render_projects(vm: &ProjectsViewModel) -> Result<Element, JsValue> {
    let nav = vm.context().navigator.clone();
    let header = ElementBuilder::new("div")?
        .class("list-header")
        .child(text_element("h2", "page-title", &tr("projects"))?)?
        .child(button("btn-primary", &tr("new_project"), move |_| nav.navigate(Route::CreateProject))?)?
        .build();

    let search = ElementBuilder::new("input")?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", &tr("search"))?
        .attr("value", &vm.list().scope().search)?
        .build();
    {
        let list = vm.list().clone();
        let input = search.clone();
        on_enter(&search, move || {
            let list = list.clone();
            let text = field_value(&input);
            spawn_local(async move { list.search(&text).await });
        })?;
    }

    let page = ElementBuilder::new("div")?
        .class("projects-page")
        .child(header)?
        .child(search)?
        .build();

    let state = vm.list().state();
    let grid = match state.latest() {
        _ if state.error().is_some() => text_element("p", "error", &tr("load_failed"))?,
        None => text_element("p", "list-loading", &tr("loading"))?,
        Some(rows) if rows.is_empty() => text_element("p", "list-empty", &tr("empty"))?,
        Some(_) => {
            let grid = ElementBuilder::new("div")?.class("project-grid").build();
            for project in vm.list().visible_rows() {
                append_child(&grid, &render_project_card(vm, &project)?)?;
            }
            grid
        }
    };
    append_child(&page, &grid)?;

    if let Some(modal) = render_form_modal(vm.list())? {
        append_child(&page, &modal)?;
    }
    if vm.list().pending_delete().is_some() {
        let confirm = vm.clone();
        let cancel = vm.list().clone();
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

fn render_project_card(vm: &ProjectsViewModel, project: &Project) -> Result<Element, JsValue> {
    let nav = vm.context().navigator.clone();
    let route = Route::Project { project_id: project.id.clone(), section: ProjectSection::Repository };
    let access_key = match project.access_type {
        AccessType::Public => "public",
        AccessType::Private => "private",
    };

    let card = ElementBuilder::new("div")?
        .class("project-card")
        .child(text_element("div", "project-avatar", &project.initials())?)?
        .child(text_element("h3", "project-name", &project.name)?)?
        .child(text_element("p", "project-description", project.description.as_deref().unwrap_or(""))?)?
        .child(text_element("span", "project-access", &tr(access_key))?)?
        .child(text_element(
            "p",
            "project-owner",
            &format!("{}: {}", tr("owner"), project.owner_full_name.as_deref().unwrap_or("—")),
        )?)?
        .child(text_element(
            "p",
            "project-counts",
            &format!(
                "{}: {} · {}: {}",
                tr("test_cases_count"),
                project.test_cases_count,
                tr("defects_count"),
                project.defects_count
            ),
        )?)?
        .on_click(move |_| nav.navigate(route.clone()))?
        .build();

    // Ajustes y borrado solo para el propietario
    if vm.can_manage(project) {
        let actions = ElementBuilder::new("div")?.class("card-actions").build();

        let settings_vm = vm.clone();
        let id = project.id.clone();
        append_child(
            &actions,
            &button("btn-icon", "⚙️", move |e| {
                e.stop_propagation();
                settings_vm.open_settings(&id);
            })?,
        )?;

        let delete_vm = vm.clone();
        let id = project.id.clone();
        append_child(
            &actions,
            &button("btn-icon", "🗑️", move |e| {
                e.stop_propagation();
                delete_vm.request_delete(&id);
            })?,
        )?;
        append_child(&card, &actions)?;
    }
    Ok(card)
}

// ============================================================================
// ALTA
// ============================================================================

pub fn render_create_project(vm: &ProjectsViewModel) -> Result<Element, JsValue> {
    let draft = vm.draft();
    let values = draft.values();
    let errors = ElementBuilder::new("div")?.class("form-errors").build();
    show_errors(&errors, &draft.errors());

    let name = {
        let draft = draft.clone();
        form_group("name", "name", Control::Input("text"), &values.name, None, move |v| draft.update(|d| d.name = v))?
    };
    let description = {
        let draft = draft.clone();
        form_group("description", "description", Control::TextArea, &values.description, None, move |v| {
            draft.update(|d| d.description = v)
        })?
    };

    // Miembros: visibles solo para proyectos privados
    let members_class = |private: bool| if private { "members-picker" } else { "members-picker hidden" };
    let members = ElementBuilder::new("div")?
        .class(members_class(values.access_type == AccessType::Private))
        .child(text_element("h4", "", &tr("members"))?)?
        .build();
    let access = {
        let draft = draft.clone();
        let members = members.clone();
        form_group(
            "accessType",
            "access_type",
            Control::Select(ACCESS_OPTIONS),
            values.access_type.as_str(),
            None,
            move |v| {
                let private = v == "PRIVATE";
                draft.update(|d| d.access_type = if private { AccessType::Private } else { AccessType::Public });
                members.set_class_name(members_class(private));
            },
        )?
    };

    {
        let vm = vm.clone();
        let members = members.clone();
        spawn_local(async move {
            for user in vm.member_candidates().await {
                let label = user.display_name().unwrap_or_else(|| user.id.clone());
                let rendered = render_member_checkbox(vm.draft(), &user.id, &label);
                if let Err(e) = rendered.and_then(|row| append_child(&members, &row)) {
                    log::error!("❌ [PROJECTS] render miembro: {:?}", e);
                }
            }
        });
    }

    let submit = {
        let vm = vm.clone();
        let errors = errors.clone();
        button("btn-primary", &tr("save"), move |_| {
            let vm = vm.clone();
            let errors = errors.clone();
            spawn_local(async move {
                clear_children(&errors);
                if let Err(e) = vm.submit_project().await {
                    if let Some(fields) = e.validation() {
                        show_errors(&errors, fields);
                    }
                }
            });
        })?
    };

    let nav = vm.context().navigator.clone();
    let cancel = button("btn-secondary", &tr("cancel"), move |_| nav.navigate(Route::Projects))?;

    Ok(ElementBuilder::new("div")?
        .class("form-page")
        .child(text_element("h2", "page-title", &tr("new_project"))?)?
        .children([name, description, access, members, errors])?
        .child(ElementBuilder::new("div")?.class("form-actions").child(cancel)?.child(submit)?.build())?
        .build())
}

fn render_member_checkbox(draft: &Draft<ProjectDraft>, user_id: &str, label: &str) -> Result<Element, JsValue> {
    let checked = draft.with(|d| d.member_ids.iter().any(|id| id == user_id));
    let checkbox = ElementBuilder::new("input")?
        .attr("type", "checkbox")?
        .attr("value", user_id)?
        .flag("checked", checked)?
        .build();
    let draft = draft.clone();
    let user_id = user_id.to_string();
    let input = checkbox.clone();
    on_event(&checkbox, "change", move |_| {
        let checked = input.dyn_ref::<HtmlInputElement>().map(|i| i.checked()).unwrap_or(false);
        draft.update(|d| {
            d.member_ids.retain(|id| id != &user_id);
            if checked {
                d.member_ids.push(user_id.clone());
            }
        });
    })?;

    Ok(ElementBuilder::new("label")?
        .class("checkbox-row")
        .child(checkbox)?
        .child(text_element("span", "", label)?)?
        .build())
}

// ============================================================================
// AJUSTES
// ============================================================================

pub fn render_project_settings(settings: &ProjectSettings) -> Result<Element, JsValue> {
    let state = settings.detail().state();
    if state.error().is_some() {
        return text_element("p", "error", &tr("load_failed"));
    }
    if state.latest().is_none() {
        return text_element("p", "list-loading", &tr("loading"));
    }

    let owner = settings.is_owner();
    let form = settings.form();
    let page = ElementBuilder::new("div")?
        .class(if owner { "settings-page" } else { "settings-page read-only" })
        .child(text_element("h2", "page-title", &tr("settings"))?)?
        .build();

    for field in ProjectForm::FIELDS {
        let control = match field.kind {
            FieldKind::Select(options) => Control::Select(options),
            FieldKind::TextArea => Control::TextArea,
            _ => Control::Input("text"),
        };
        let target = settings.clone();
        let name = field.name;
        let group = form_group(
            field.name,
            field.label_key,
            control,
            &form.values.field(field.name),
            form.errors.get(field.name),
            move |v| target.update_field(name, &v),
        )?;
        append_child(&page, &group)?;
    }

    if !owner {
        append_child(&page, &text_element("p", "hint", &tr("owner_only"))?)?;
        return Ok(page);
    }

    let save = {
        let settings = settings.clone();
        ElementBuilder::new("button")?
            .class("btn-primary")
            .text(&tr("save"))
            .flag("disabled", form.submitting)?
            .on_click(move |_| {
                let settings = settings.clone();
                spawn_local(async move {
                    settings.save().await;
                });
            })?
            .build()
    };
    let delete = {
        let settings = settings.clone();
        button("btn-danger", &tr("delete_project"), move |_| {
            settings.request_delete();
        })?
    };
    append_child(
        &page,
        &ElementBuilder::new("div")?.class("form-actions").child(delete)?.child(save)?.build(),
    )?;

    if settings.detail().confirm_open() {
        let confirm = settings.clone();
        let cancel = settings.detail().clone();
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
