// ============================================================================
// DETAIL VIEWS - Test case, test run y test plan por id
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, button, set_text_content, text_element, ElementBuilder};
use crate::models::{TestCase, TestPlan, TestRun};
use crate::services::GraphQlClient;
use crate::state::{ProjectSection, Route};
use crate::utils::format::format_optional_date;
use crate::utils::i18n::tr;
use crate::viewmodels::lookup::{milestone_name, user_name};
use crate::viewmodels::DetailResource;
use crate::views::layout::render_confirm_dialog;

/// `label: valor` en una fila de la ficha
fn field_row(label_key: &str, value: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("div")?
        .class("detail-row")
        .child(text_element("span", "detail-label", &tr(label_key))?)?
        .child(text_element("span", "detail-value", if value.is_empty() { "—" } else { value })?)?
        .build())
}

/// Fila cuyo valor llega por una búsqueda secundaria
fn lookup_row<F, Fut>(label_key: &str, lookup: F) -> Result<Element, JsValue>
where
    F: FnOnce() -> Fut + 'static,
    Fut: std::future::Future<Output = String> + 'static,
{
    let row = field_row(label_key, "…")?;
    if let Some(value) = row.last_element_child() {
        spawn_local(async move {
            let text = lookup().await;
            set_text_content(&value, &text);
        });
    }
    Ok(row)
}

fn author_row(client: &GraphQlClient, user_id: Option<String>) -> Result<Element, JsValue> {
    let client = client.clone();
    lookup_row("author", move || async move { user_name(&client, user_id.as_deref()).await })
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Result<Element, JsValue> {
    let head = ElementBuilder::new("tr")?.build();
    for header in headers {
        append_child(&head, &text_element("th", "", &tr(header))?)?;
    }
    let body = ElementBuilder::new("tbody")?.build();
    for cells in rows {
        let row = ElementBuilder::new("tr")?.build();
        for cell in cells {
            append_child(&row, &text_element("td", "", &cell)?)?;
        }
        append_child(&body, &row)?;
    }
    Ok(ElementBuilder::new("table")?
        .class("data-table")
        .child(ElementBuilder::new("thead")?.child(head)?.build())?
        .child(body)?
        .build())
}

/// Cabecera con título, botón de borrado y diálogo de confirmación
fn render_detail_frame<T>(detail: &DetailResource<T>, title: &str, back: Route) -> Result<Element, JsValue>
where
    T: serde::de::DeserializeOwned + Clone + 'static,
{
    let header = ElementBuilder::new("div")?
        .class("detail-header")
        .child(text_element("h2", "page-title", title)?)?
        .build();

    let nav = detail.context().navigator.clone();
    let back_route = back.clone();
    append_child(&header, &button("btn-secondary", "←", move |_| nav.navigate(back_route.clone()))?)?;

    if detail.can_delete() {
        let target = detail.clone();
        append_child(&header, &button("btn-danger", &tr("delete"), move |_| target.request_delete())?)?;
    }

    let page = ElementBuilder::new("div")?.class("detail-page").child(header)?.build();

    if detail.confirm_open() {
        let confirm = detail.clone();
        let cancel = detail.clone();
        let dialog = render_confirm_dialog(
            move || {
                let confirm = confirm.clone();
                let back = back.clone();
                spawn_local(async move {
                    confirm.confirm_delete(back).await;
                });
            },
            move || cancel.cancel_delete(),
        )?;
        append_child(&page, &dialog)?;
    }
    Ok(page)
}

/// Estado de carga/error común. `Ok(None)` si hay datos que pintar.
fn render_pending<T: Clone>(state: &crate::state::QueryState<T>) -> Result<Option<Element>, JsValue> {
    if state.error().is_some() {
        return Ok(Some(text_element("p", "error", &tr("load_failed"))?));
    }
    if state.latest().is_none() {
        return Ok(Some(text_element("p", "list-loading", &tr("loading"))?));
    }
    Ok(None)
}

// ============================================================================
// TEST CASE
// ============================================================================

pub fn render_test_case(detail: &DetailResource<TestCase>, project_id: &str) -> Result<Element, JsValue> {
    let state = detail.state();
    if let Some(pending) = render_pending(&state)? {
        return Ok(pending);
    }
    let Some(case) = state.latest().cloned() else {
        return text_element("p", "list-loading", &tr("loading"));
    };

    let back = Route::Project { project_id: project_id.to_string(), section: ProjectSection::Repository };
    let page = render_detail_frame(detail, &case.title, back)?;
    let client = &detail.context().client;

    let status = case.status.map(|s| s.label()).unwrap_or("—");
    let card = ElementBuilder::new("div")?
        .class("detail-card")
        .child(field_row("description", case.description.as_deref().unwrap_or(""))?)?
        .child(field_row("preconditions", case.preconditions.as_deref().unwrap_or(""))?)?
        .child(field_row("postconditions", case.postconditions.as_deref().unwrap_or(""))?)?
        .child(field_row("status", status)?)?
        .child(field_row("priority", case.priority.label())?)?
        .child(field_row("severity", case.severity.label())?)?
        .child(author_row(client, case.created_by_id.clone())?)?
        .child(field_row("created_at", &format_optional_date(case.created_at.as_ref()))?)?
        .build();
    append_child(&page, &card)?;

    if let Some(params) = case.parameters.as_ref().and_then(|p| p.as_object()).filter(|p| !p.is_empty()) {
        let rows = params
            .iter()
            .map(|(key, value)| vec![key.clone(), value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())])
            .collect();
        append_child(&page, &text_element("h3", "section-title", &tr("parameters"))?)?;
        append_child(&page, &table(&["name", "value"], rows)?)?;
    }

    let mut steps = case.steps.clone();
    steps.sort_by_key(|s| s.position.unwrap_or(i32::MAX));
    let rows = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            vec![
                (i + 1).to_string(),
                step.description.clone(),
                step.expected_result.clone().unwrap_or_default(),
            ]
        })
        .collect();
    append_child(&page, &text_element("h3", "section-title", &tr("steps"))?)?;
    append_child(&page, &table(&["position", "description", "expected_result"], rows)?)?;
    Ok(page)
}

// ============================================================================
// TEST RUN
// ============================================================================

pub fn render_test_run(detail: &DetailResource<TestRun>, project_id: &str) -> Result<Element, JsValue> {
    let state = detail.state();
    if let Some(pending) = render_pending(&state)? {
        return Ok(pending);
    }
    let Some(run) = state.latest().cloned() else {
        return text_element("p", "list-loading", &tr("loading"));
    };

    let back = Route::Project { project_id: project_id.to_string(), section: ProjectSection::TestRuns };
    let page = render_detail_frame(detail, &run.name, back)?;

    let client = detail.context().client.clone();
    let milestone_id = run.milestone_id.clone();
    let milestone = lookup_row("milestone", move || async move {
        milestone_name(&client, milestone_id.as_deref()).await
    })?;

    let (passed, failed, skipped) = run.execution_summary();
    let summary = format!(
        "{} {} · {} {} · {} {}",
        tr("passed"),
        passed,
        tr("failed"),
        failed,
        tr("skipped"),
        skipped
    );

    let card = ElementBuilder::new("div")?
        .class("detail-card")
        .child(field_row("description", run.description.as_deref().unwrap_or(""))?)?
        .child(milestone)?
        .child(field_row("status", run.status.as_deref().unwrap_or(""))?)?
        .child(field_row("created_at", &format_optional_date(run.created_at.as_ref()))?)?
        .child(field_row("summary", &summary)?)?
        .build();
    append_child(&page, &card)?;

    let cases = run
        .test_run_test_cases
        .iter()
        .map(|c| {
            vec![
                c.test_case.title.clone(),
                c.test_case.priority.label().to_string(),
                c.test_case.severity.label().to_string(),
                c.status.label().to_string(),
            ]
        })
        .collect();
    append_child(&page, &text_element("h3", "section-title", &tr("test_cases"))?)?;
    append_child(&page, &table(&["title", "priority", "severity", "status"], cases)?)?;

    if !run.defects.is_empty() {
        let defects = run
            .defects
            .iter()
            .map(|d| vec![d.title.clone(), d.actual_result.clone().unwrap_or_default()])
            .collect();
        append_child(&page, &text_element("h3", "section-title", &tr("defects"))?)?;
        append_child(&page, &table(&["title", "actual_result"], defects)?)?;
    }
    Ok(page)
}

// ============================================================================
// TEST PLAN
// ============================================================================

pub fn render_test_plan(detail: &DetailResource<TestPlan>, project_id: &str) -> Result<Element, JsValue> {
    let state = detail.state();
    if let Some(pending) = render_pending(&state)? {
        return Ok(pending);
    }
    let Some(plan) = state.latest().cloned() else {
        return text_element("p", "list-loading", &tr("loading"));
    };

    let back = Route::Project { project_id: project_id.to_string(), section: ProjectSection::TestPlans };
    let page = render_detail_frame(detail, &plan.name, back)?;
    let client = &detail.context().client;

    let card = ElementBuilder::new("div")?
        .class("detail-card")
        .child(field_row("description", plan.description.as_deref().unwrap_or(""))?)?
        .child(author_row(client, plan.created_by_id.clone())?)?
        .child(field_row("created_at", &format_optional_date(plan.created_at.as_ref()))?)?
        .child(field_row("test_cases_count", &plan.case_count().to_string())?)?
        .build();
    append_child(&page, &card)?;

    let cases = plan
        .test_cases
        .iter()
        .map(|c| vec![c.title.clone(), c.priority.label().to_string(), c.severity.label().to_string()])
        .collect();
    append_child(&page, &text_element("h3", "section-title", &tr("test_cases"))?)?;
    append_child(&page, &table(&["title", "priority", "severity"], cases)?)?;
    Ok(page)
}
