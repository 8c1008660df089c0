// ============================================================================
// VIEWS - Funciones que renderizan DOM (sin lógica)
// ============================================================================

pub mod layout;
pub mod auth;
pub mod list_page;
pub mod projects;
pub mod details;
pub mod composers;
pub mod attachments;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::models::Severity;
use crate::state::Route;
use crate::viewmodels::entities::SEVERITY_OPTIONS;
use crate::viewmodels::{ActivePage, PageContext, SectionPage};
use list_page::{filter_select, render_list, ListOptions};
use layout::{render_project_shell, render_shell};

/// Página completa para la ruta activa
pub fn render_page(page: &ActivePage, route: &Route, ctx: &PageContext) -> Result<Element, JsValue> {
    let project_id = route.project_id().unwrap_or_default().to_string();
    let content = match page {
        // Sin cabecera
        ActivePage::Login(vm) => return auth::render_login(vm),
        ActivePage::Register(vm) => return auth::render_register(vm),

        ActivePage::Profile(vm) => auth::render_profile(vm)?,
        ActivePage::Projects(vm) => projects::render_projects(vm)?,
        ActivePage::CreateProject(vm) => projects::render_create_project(vm)?,
        ActivePage::Section { project_id, section, page } => {
            let body = render_section(ctx, project_id, page)?;
            render_project_shell(ctx, project_id, *section, body)?
        }
        ActivePage::TestCase(detail) => details::render_test_case(detail, &project_id)?,
        ActivePage::TestRun(detail) => details::render_test_run(detail, &project_id)?,
        ActivePage::TestPlan(detail) => details::render_test_plan(detail, &project_id)?,
        ActivePage::CreateTestCase(composer) => composers::render_create_test_case(composer, &project_id)?,
        ActivePage::CreateTestRun(composer) => composers::render_create_test_run(composer, &project_id)?,
        ActivePage::CreateTestPlan(composer) => composers::render_create_test_plan(composer, &project_id)?,
    };
    render_shell(ctx, content)
}

fn render_section(ctx: &PageContext, project_id: &str, page: &SectionPage) -> Result<Element, JsValue> {
    let route_to = |make: fn(String, String) -> Route| {
        let nav = ctx.navigator.clone();
        let project_id = project_id.to_string();
        move |id: &str| nav.navigate(make(project_id.clone(), id.to_string()))
    };
    let create = |route: Route| {
        let nav = ctx.navigator.clone();
        move || nav.navigate(route.clone())
    };

    match page {
        SectionPage::Repository { cases, suites } => {
            let suite_options: Vec<(String, String)> = suites
                .state()
                .latest()
                .map(|rows| rows.iter().map(|s| (s.id.clone(), s.name.clone())).collect())
                .unwrap_or_default();
            let suite_refs: Vec<(&str, &str)> = suite_options.iter().map(|(v, l)| (v.as_str(), l.as_str())).collect();
            let selected = cases.scope().suite_id.unwrap_or_default();
            let filter = {
                let cases = cases.clone();
                filter_select("all_suites", &suite_refs, &selected, move |value| {
                    cases.update_scope(|scope| scope.suite_id = Some(value).filter(|v| !v.is_empty()));
                    let cases = cases.clone();
                    spawn_local(async move { cases.fetch().await });
                })?
            };

            let suites_view = render_list(suites, ListOptions::new("test_suites"))?;
            let cases_view = render_list(
                cases,
                ListOptions::new("test_cases")
                    .open(route_to(|project_id, test_case_id| Route::TestCase { project_id, test_case_id }))
                    .create(create(Route::CreateTestCase { project_id: project_id.to_string() }))
                    .toolbar(filter),
            )?;
            let container = crate::dom::ElementBuilder::new("div")?
                .class("repository")
                .child(suites_view)?
                .child(cases_view)?
                .build();
            Ok(container)
        }
        SectionPage::TestRuns(list) => render_list(
            list,
            ListOptions::new("test_runs")
                .open(route_to(|project_id, test_run_id| Route::TestRun { project_id, test_run_id }))
                .create(create(Route::CreateTestRun { project_id: project_id.to_string() })),
        ),
        SectionPage::TestPlans(list) => render_list(
            list,
            ListOptions::new("test_plans")
                .open(route_to(|project_id, test_plan_id| Route::TestPlan { project_id, test_plan_id }))
                .create(create(Route::CreateTestPlan { project_id: project_id.to_string() })),
        ),
        SectionPage::Defects(list) => {
            let selected = list.scope().severity.map(|s| s.as_str()).unwrap_or("");
            let filter = {
                let list = list.clone();
                filter_select("all_severities", SEVERITY_OPTIONS, selected, move |value| {
                    list.update_scope(|scope| scope.severity = Severity::parse(&value));
                    let list = list.clone();
                    spawn_local(async move { list.fetch().await });
                })?
            };
            render_list(list, ListOptions::new("defects").toolbar(filter))
        }
        SectionPage::Milestones(list) => render_list(list, ListOptions::new("milestones")),
        SectionPage::Tags(list) => render_list(list, ListOptions::new("tags")),
        SectionPage::Attachments(vm) => attachments::render_attachments(vm),
        SectionPage::Settings(settings) => projects::render_project_settings(settings),
    }
}
