// ============================================================================
// COMPOSER VIEWS - Páginas de alta de test case, test run y test plan
// ============================================================================
// Los borradores viven en el `Composer`: cada render vuelve a sembrar los
// campos, las selecciones y las filas de parámetros/pasos/casos. Las filas
// nuevas se añaden directamente al DOM sin repintar la página.
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{
    append_child, button, clear_children, form_group, on_event, set_field_value, text_element, Control,
    ElementBuilder,
};
use crate::models::{ExecutionStatus, Priority, Severity, TestCaseStatus};
use crate::state::{ProjectSection, Route};
use crate::utils::i18n::tr;
use crate::utils::validators::ValidationErrors;
use crate::viewmodels::{
    ComposeError, Composer, Draft, OptionSource, RunCaseDraft, StepDraft, TestCaseDraft, TestPlanDraft, TestRunDraft,
};
use crate::views::layout::show_errors;

// ============================================================================
// CONTROLES COMUNES
// ============================================================================

fn text_field<T, S>(
    draft: &Draft<T>,
    name: &str,
    label_key: &str,
    control: Control<'_>,
    value: &str,
    set: S,
) -> Result<Element, JsValue>
where
    T: Clone + Default + 'static,
    S: Fn(&mut T, String) + 'static,
{
    let draft = draft.clone();
    form_group(name, label_key, control, value, None, move |v| draft.update(|d| set(d, v)))
}

/// Añade una fila al contenedor; los fallos de render solo se registran
fn append_row(container: &Element, row: Result<Element, JsValue>, what: &str) {
    if let Err(e) = row.and_then(|row| append_child(container, &row)) {
        log::error!("❌ [COMPOSE] render {}: {:?}", what, e);
    }
}

/// `<select>` cuyas opciones llegan de un catálogo del proyecto
fn catalog_select<S>(
    composer: &Composer,
    source: OptionSource,
    name: &str,
    label_key: &str,
    selected: Option<String>,
    on_change: S,
) -> Result<Element, JsValue>
where
    S: Fn(String) + 'static,
{
    let group = form_group(name, label_key, Control::Select(&[("", "—")]), "", None, on_change)?;
    if let Some(select) = group.query_selector("select")? {
        let composer = composer.clone();
        spawn_local(async move {
            for (value, label) in composer.options(source).await {
                let option = ElementBuilder::new("option").and_then(|b| b.attr("value", &value)).map(|b| b.text(&label).build());
                append_row(&select, option, "opción");
                if selected.as_deref() == Some(value.as_str()) {
                    set_field_value(&select, &value);
                }
            }
        });
    }
    Ok(group)
}

/// Lista de checkboxes de un catálogo; `on_toggle(id, marcado)`
fn catalog_checkboxes<S>(
    composer: &Composer,
    source: OptionSource,
    label_key: &str,
    selected: Vec<String>,
    on_toggle: S,
) -> Result<Element, JsValue>
where
    S: Fn(&str, bool) + 'static,
{
    let container = ElementBuilder::new("div")?
        .class("checkbox-list")
        .child(text_element("h4", "", &tr(label_key))?)?
        .build();

    let composer = composer.clone();
    let target = container.clone();
    let on_toggle = Rc::new(on_toggle);
    spawn_local(async move {
        for (id, label) in composer.options(source).await {
            let on_toggle = on_toggle.clone();
            let checked = selected.contains(&id);
            let row = checkbox_row(&id, &label, checked, move |id, checked| on_toggle(id, checked));
            append_row(&target, row, "checkbox");
        }
    });
    Ok(container)
}

fn checkbox_row<S>(id: &str, label: &str, checked: bool, on_toggle: S) -> Result<Element, JsValue>
where
    S: Fn(&str, bool) + 'static,
{
    let checkbox = ElementBuilder::new("input")?
        .attr("type", "checkbox")?
        .attr("value", id)?
        .flag("checked", checked)?
        .build();
    let input = checkbox.clone();
    let id_owned = id.to_string();
    on_event(&checkbox, "change", move |_| {
        let checked = input.dyn_ref::<HtmlInputElement>().map(|i| i.checked()).unwrap_or(false);
        on_toggle(&id_owned, checked);
    })?;
    Ok(ElementBuilder::new("label")?
        .class("checkbox-row")
        .child(checkbox)?
        .child(text_element("span", "", label)?)?
        .build())
}

fn toggle_id(ids: &mut Vec<String>, id: &str, checked: bool) {
    ids.retain(|existing| existing != id);
    if checked {
        ids.push(id.to_string());
    }
}

/// Contenedor de errores sembrado con los del último intento
fn errors_block(errors: &ValidationErrors) -> Result<Element, JsValue> {
    let block = ElementBuilder::new("div")?.class("form-errors").build();
    show_errors(&block, errors);
    Ok(block)
}

/// Botones cancelar/crear; `submit` devuelve el resultado del alta
fn form_actions<F, Fut>(composer: &Composer, back: Route, errors: &Element, submit: F) -> Result<Element, JsValue>
where
    F: Fn() -> Fut + 'static,
    Fut: std::future::Future<Output = Result<String, ComposeError>> + 'static,
{
    let nav = composer.context().navigator.clone();
    let cancel = button("btn-secondary", &tr("cancel"), move |_| nav.navigate(back.clone()))?;

    let errors = errors.clone();
    let create = button("btn-primary", &tr("create"), move |_| {
        let errors = errors.clone();
        let pending = submit();
        spawn_local(async move {
            clear_children(&errors);
            if let Err(e) = pending.await {
                if let Some(fields) = e.validation() {
                    show_errors(&errors, fields);
                }
            }
        });
    })?;

    Ok(ElementBuilder::new("div")?.class("form-actions").child(cancel)?.child(create)?.build())
}

fn section(project_id: &str, section: ProjectSection) -> Route {
    Route::Project { project_id: project_id.to_string(), section }
}

// ============================================================================
// TEST CASE
// ============================================================================

pub fn render_create_test_case(composer: &Composer, project_id: &str) -> Result<Element, JsValue> {
    let draft = composer.test_case_draft().clone();
    let values = draft.values();
    let errors = errors_block(&draft.errors())?;

    let status_options: Vec<(&str, &str)> = TestCaseStatus::SELECTABLE.iter().map(|s| (s.as_str(), s.label())).collect();
    let priority_options: Vec<(&str, &str)> = Priority::SELECTABLE.iter().map(|p| (p.as_str(), p.label())).collect();
    let severity_options: Vec<(&str, &str)> = Severity::SELECTABLE.iter().map(|s| (s.as_str(), s.label())).collect();

    let suite = {
        let draft = draft.clone();
        catalog_select(composer, OptionSource::Suites, "suiteId", "suite", values.suite_id.clone(), move |v| {
            draft.update(|d| d.suite_id = Some(v).filter(|id| !id.is_empty()));
        })?
    };
    let title = text_field(&draft, "title", "title", Control::Input("text"), &values.title, |d, v| d.title = v)?;
    let description =
        text_field(&draft, "description", "description", Control::TextArea, &values.description, |d, v| d.description = v)?;
    let preconditions = text_field(
        &draft,
        "preconditions",
        "preconditions",
        Control::TextArea,
        &values.preconditions,
        |d, v| d.preconditions = v,
    )?;
    let postconditions = text_field(
        &draft,
        "postconditions",
        "postconditions",
        Control::TextArea,
        &values.postconditions,
        |d, v| d.postconditions = v,
    )?;

    let draft_ref = draft.clone();
    let status = form_group("status", "status", Control::Select(&status_options), values.status.as_str(), None, move |v| {
        if let Some(status) = TestCaseStatus::parse(&v) {
            draft_ref.update(|d| d.status = status);
        }
    })?;
    let draft_ref = draft.clone();
    let priority =
        form_group("priority", "priority", Control::Select(&priority_options), values.priority.as_str(), None, move |v| {
            if let Some(priority) = Priority::parse(&v) {
                draft_ref.update(|d| d.priority = priority);
            }
        })?;
    let draft_ref = draft.clone();
    let severity =
        form_group("severity", "severity", Control::Select(&severity_options), values.severity.as_str(), None, move |v| {
            if let Some(severity) = Severity::parse(&v) {
                draft_ref.update(|d| d.severity = severity);
            }
        })?;

    // Parámetros clave/valor
    let parameters = ElementBuilder::new("div")?
        .class("parameters")
        .child(text_element("h4", "", &tr("parameters"))?)?
        .build();
    for (index, pair) in values.parameters.iter().enumerate() {
        append_row(&parameters, render_parameter_row(&draft, index, pair), "parámetro");
    }
    let add_parameter = {
        let draft = draft.clone();
        let parameters = parameters.clone();
        button("btn-link", &tr("add_parameter"), move |_| {
            let pair = (String::new(), String::new());
            let index = draft.with(|d| d.parameters.len());
            draft.update(|d| d.parameters.push(pair.clone()));
            append_row(&parameters, render_parameter_row(&draft, index, &pair), "parámetro");
        })?
    };

    // Pasos en orden
    let steps = ElementBuilder::new("div")?
        .class("steps")
        .child(text_element("h4", "", &tr("steps"))?)?
        .build();
    for (index, step) in values.steps.iter().enumerate() {
        append_row(&steps, render_step_row(&draft, index, step), "paso");
    }
    let add_step = {
        let draft = draft.clone();
        let steps = steps.clone();
        button("btn-link", &tr("add_step"), move |_| {
            let index = draft.with(|d| d.steps.len());
            draft.update(|d| d.steps.push(StepDraft::default()));
            append_row(&steps, render_step_row(&draft, index, &StepDraft::default()), "paso");
        })?
    };

    let actions = {
        let composer_ref = composer.clone();
        form_actions(composer, section(project_id, ProjectSection::Repository), &errors, move || {
            let composer = composer_ref.clone();
            async move { composer.submit_test_case().await }
        })?
    };

    Ok(ElementBuilder::new("div")?
        .class("form-page")
        .child(text_element("h2", "page-title", &tr("create_test_case"))?)?
        .children([suite, title, description, preconditions, postconditions, status, priority, severity])?
        .children([parameters, add_parameter, steps, add_step, errors, actions])?
        .build())
}

fn render_parameter_row(draft: &Draft<TestCaseDraft>, index: usize, pair: &(String, String)) -> Result<Element, JsValue> {
    let key = {
        let draft = draft.clone();
        form_group(&format!("param-key-{}", index), "name", Control::Input("text"), &pair.0, None, move |v| {
            draft.update(|d| {
                if let Some(pair) = d.parameters.get_mut(index) {
                    pair.0 = v;
                }
            })
        })?
    };
    let value = {
        let draft = draft.clone();
        form_group(&format!("param-value-{}", index), "value", Control::Input("text"), &pair.1, None, move |v| {
            draft.update(|d| {
                if let Some(pair) = d.parameters.get_mut(index) {
                    pair.1 = v;
                }
            })
        })?
    };
    Ok(ElementBuilder::new("div")?.class("parameter-row").child(key)?.child(value)?.build())
}

fn render_step_row(draft: &Draft<TestCaseDraft>, index: usize, step: &StepDraft) -> Result<Element, JsValue> {
    let description = {
        let draft = draft.clone();
        form_group(&format!("step-{}", index), "description", Control::TextArea, &step.description, None, move |v| {
            draft.update(|d| {
                if let Some(step) = d.steps.get_mut(index) {
                    step.description = v;
                }
            })
        })?
    };
    let expected = {
        let draft = draft.clone();
        form_group(
            &format!("step-expected-{}", index),
            "expected_result",
            Control::TextArea,
            &step.expected_result,
            None,
            move |v| {
                draft.update(|d| {
                    if let Some(step) = d.steps.get_mut(index) {
                        step.expected_result = v;
                    }
                })
            },
        )?
    };
    Ok(ElementBuilder::new("div")?
        .class("step-row")
        .child(text_element("span", "step-number", &format!("{}.", index + 1))?)?
        .child(description)?
        .child(expected)?
        .build())
}

// ============================================================================
// TEST RUN
// ============================================================================

pub fn render_create_test_run(composer: &Composer, project_id: &str) -> Result<Element, JsValue> {
    let draft = composer.test_run_draft().clone();
    let values = draft.values();
    let errors = errors_block(&draft.errors())?;

    let name = text_field(&draft, "name", "name", Control::Input("text"), &values.name, |d, v| d.name = v)?;
    let description =
        text_field(&draft, "description", "description", Control::TextArea, &values.description, |d, v| d.description = v)?;
    let milestone = {
        let draft = draft.clone();
        catalog_select(composer, OptionSource::Milestones, "milestoneId", "milestone", values.milestone_id.clone(), move |v| {
            draft.update(|d| d.milestone_id = Some(v).filter(|id| !id.is_empty()));
        })?
    };
    let defects = {
        let draft = draft.clone();
        catalog_checkboxes(composer, OptionSource::Defects, "defects", values.defect_ids.clone(), move |id, checked| {
            draft.update(|d| toggle_id(&mut d.defect_ids, id, checked));
        })?
    };

    let cases = ElementBuilder::new("div")?
        .class("run-cases")
        .child(text_element("h4", "", &tr("test_cases"))?)?
        .build();
    for (index, case) in values.cases.iter().enumerate() {
        append_row(&cases, render_run_case_row(composer, &draft, index, case), "caso");
    }
    let add_case = {
        let composer = composer.clone();
        let draft = draft.clone();
        let cases = cases.clone();
        button("btn-link", &tr("add_test_case"), move |_| {
            let case = RunCaseDraft { test_case_id: String::new(), status: ExecutionStatus::Passed };
            let index = draft.with(|d| d.cases.len());
            draft.update(|d| d.cases.push(case.clone()));
            append_row(&cases, render_run_case_row(&composer, &draft, index, &case), "caso");
        })?
    };

    let actions = {
        let composer_ref = composer.clone();
        form_actions(composer, section(project_id, ProjectSection::TestRuns), &errors, move || {
            let composer = composer_ref.clone();
            async move { composer.submit_test_run().await }
        })?
    };

    Ok(ElementBuilder::new("div")?
        .class("form-page")
        .child(text_element("h2", "page-title", &tr("create_test_run"))?)?
        .children([name, description, milestone, defects, cases, add_case, errors, actions])?
        .build())
}

fn render_run_case_row(
    composer: &Composer,
    draft: &Draft<TestRunDraft>,
    index: usize,
    current: &RunCaseDraft,
) -> Result<Element, JsValue> {
    let selected = Some(current.test_case_id.clone()).filter(|id| !id.is_empty());
    let case = {
        let draft = draft.clone();
        catalog_select(composer, OptionSource::TestCases, &format!("case-{}", index), "test_case", selected, move |v| {
            draft.update(|d| {
                if let Some(case) = d.cases.get_mut(index) {
                    case.test_case_id = v;
                }
            })
        })?
    };

    let status_options: Vec<(&str, &str)> = ExecutionStatus::SELECTABLE.iter().map(|s| (s.as_str(), s.label())).collect();
    let status = {
        let draft = draft.clone();
        form_group(
            &format!("case-status-{}", index),
            "status",
            Control::Select(&status_options),
            current.status.as_str(),
            None,
            move |v| {
                if let Some(status) = ExecutionStatus::parse(&v) {
                    draft.update(|d| {
                        if let Some(case) = d.cases.get_mut(index) {
                            case.status = status;
                        }
                    });
                }
            },
        )?
    };
    Ok(ElementBuilder::new("div")?.class("run-case-row").child(case)?.child(status)?.build())
}

// ============================================================================
// TEST PLAN
// ============================================================================

pub fn render_create_test_plan(composer: &Composer, project_id: &str) -> Result<Element, JsValue> {
    let draft: Draft<TestPlanDraft> = composer.test_plan_draft().clone();
    let values = draft.values();
    let errors = errors_block(&draft.errors())?;

    let name = text_field(&draft, "name", "name", Control::Input("text"), &values.name, |d, v| d.name = v)?;
    let description =
        text_field(&draft, "description", "description", Control::TextArea, &values.description, |d, v| d.description = v)?;
    let cases = {
        let draft = draft.clone();
        catalog_checkboxes(composer, OptionSource::TestCases, "test_cases", values.test_case_ids.clone(), move |id, checked| {
            draft.update(|d| toggle_id(&mut d.test_case_ids, id, checked));
        })?
    };

    let actions = {
        let composer_ref = composer.clone();
        form_actions(composer, section(project_id, ProjectSection::TestPlans), &errors, move || {
            let composer = composer_ref.clone();
            async move { composer.submit_test_plan().await }
        })?
    };

    Ok(ElementBuilder::new("div")?
        .class("form-page")
        .child(text_element("h2", "page-title", &tr("create_test_plan"))?)?
        .children([name, description, cases, errors, actions])?
        .build())
}
