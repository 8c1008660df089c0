// ============================================================================
// PAGES - Controlador activo para cada ruta
// ============================================================================

use crate::models::{Defect, Milestone, Tag, TestCase, TestPlan, TestRun, TestSuite};
use crate::services::operations::{
    DELETE_TEST_CASE, DELETE_TEST_PLAN, DELETE_TEST_RUN, TEST_CASES, TEST_CASE_BY_ID, TEST_PLANS, TEST_PLAN_BY_ID,
    TEST_RUNS, TEST_RUN_BY_ID,
};
use crate::state::{ProjectSection, Route};
use crate::viewmodels::attachments_viewmodel::AttachmentsViewModel;
use crate::viewmodels::auth_viewmodel::AuthViewModel;
use crate::viewmodels::composers::Composer;
use crate::viewmodels::detail_resource::DetailResource;
use crate::viewmodels::list_resource::{ListResource, ListScope};
use crate::viewmodels::lookup::current_user;
use crate::viewmodels::page_context::PageContext;
use crate::viewmodels::projects_viewmodel::{ProjectSettings, ProjectsViewModel};

// Listas en caché que quedan obsoletas al borrar desde el detalle
const CASE_LISTS: &[&str] = &[TEST_CASES.name];
const RUN_LISTS: &[&str] = &[TEST_RUNS.name];
const PLAN_LISTS: &[&str] = &[TEST_PLANS.name];

/// Controladores de una sección de proyecto
#[derive(Clone)]
pub enum SectionPage {
    Repository { cases: ListResource<TestCase>, suites: ListResource<TestSuite> },
    TestRuns(ListResource<TestRun>),
    TestPlans(ListResource<TestPlan>),
    Defects(ListResource<Defect>),
    Milestones(ListResource<Milestone>),
    Tags(ListResource<Tag>),
    Attachments(AttachmentsViewModel),
    Settings(ProjectSettings),
}

impl SectionPage {
    pub fn new(ctx: &PageContext, project_id: &str, section: ProjectSection) -> Self {
        let scope = ListScope::for_project(project_id);
        let ctx = ctx.clone();
        match section {
            ProjectSection::Repository => SectionPage::Repository {
                cases: ListResource::new(ctx.clone(), scope.clone()),
                suites: ListResource::new(ctx, scope),
            },
            ProjectSection::TestRuns => SectionPage::TestRuns(ListResource::new(ctx, scope)),
            ProjectSection::TestPlans => SectionPage::TestPlans(ListResource::new(ctx, scope)),
            ProjectSection::Defects => SectionPage::Defects(ListResource::new(ctx, scope)),
            ProjectSection::Milestones => SectionPage::Milestones(ListResource::new(ctx, scope)),
            ProjectSection::Tags => SectionPage::Tags(ListResource::new(ctx, scope)),
            ProjectSection::Attachments => SectionPage::Attachments(AttachmentsViewModel::new(ctx, project_id)),
            ProjectSection::Settings => SectionPage::Settings(ProjectSettings::new(ctx, project_id)),
        }
    }

    pub async fn load(&self) {
        match self {
            SectionPage::Repository { cases, suites } => {
                suites.fetch().await;
                cases.fetch().await;
            }
            SectionPage::TestRuns(list) => list.fetch().await,
            SectionPage::TestPlans(list) => list.fetch().await,
            SectionPage::Defects(list) => {
                // El alta de defectos necesita al autor
                if let Ok(user) = current_user(&list.context().client).await {
                    list.update_scope(|scope| scope.current_user_id = Some(user.id));
                }
                list.fetch().await;
            }
            SectionPage::Milestones(list) => list.fetch().await,
            SectionPage::Tags(list) => list.fetch().await,
            SectionPage::Attachments(vm) => vm.list().fetch().await,
            SectionPage::Settings(settings) => settings.load().await,
        }
    }

    /// Suscribe `listener` a todos los controladores de la sección
    pub fn watch<F>(&self, listener: F)
    where
        F: Fn() + Clone + 'static,
    {
        match self {
            SectionPage::Repository { cases, suites } => {
                cases.subscribe(listener.clone());
                suites.subscribe(listener);
            }
            SectionPage::TestRuns(list) => list.subscribe(listener),
            SectionPage::TestPlans(list) => list.subscribe(listener),
            SectionPage::Defects(list) => list.subscribe(listener),
            SectionPage::Milestones(list) => list.subscribe(listener),
            SectionPage::Tags(list) => list.subscribe(listener),
            SectionPage::Attachments(vm) => vm.list().subscribe(listener),
            SectionPage::Settings(settings) => settings.detail().subscribe(listener),
        }
    }
}

/// Página activa: un controlador por ruta
#[derive(Clone)]
pub enum ActivePage {
    Login(AuthViewModel),
    Register(AuthViewModel),
    Projects(ProjectsViewModel),
    CreateProject(ProjectsViewModel),
    Profile(AuthViewModel),
    Section { project_id: String, section: ProjectSection, page: SectionPage },
    TestCase(DetailResource<TestCase>),
    CreateTestCase(Composer),
    TestRun(DetailResource<TestRun>),
    CreateTestRun(Composer),
    TestPlan(DetailResource<TestPlan>),
    CreateTestPlan(Composer),
}

impl ActivePage {
    pub fn for_route(route: &Route, ctx: &PageContext) -> Self {
        let ctx_owned = ctx.clone();
        match route {
            Route::Login => ActivePage::Login(AuthViewModel::new(ctx_owned)),
            Route::Register => ActivePage::Register(AuthViewModel::new(ctx_owned)),
            Route::Projects => ActivePage::Projects(ProjectsViewModel::new(ctx_owned)),
            Route::CreateProject => ActivePage::CreateProject(ProjectsViewModel::new(ctx_owned)),
            Route::Profile => ActivePage::Profile(AuthViewModel::new(ctx_owned)),
            Route::Project { project_id, section } => ActivePage::Section {
                project_id: project_id.clone(),
                section: *section,
                page: SectionPage::new(ctx, project_id, *section),
            },
            Route::TestCase { test_case_id, .. } => ActivePage::TestCase(DetailResource::new(
                ctx_owned,
                TEST_CASE_BY_ID,
                Some(DELETE_TEST_CASE),
                test_case_id,
            ).invalidating(CASE_LISTS)),
            Route::CreateTestCase { project_id } => ActivePage::CreateTestCase(Composer::new(ctx_owned, project_id)),
            Route::TestRun { test_run_id, .. } => ActivePage::TestRun(DetailResource::new(
                ctx_owned,
                TEST_RUN_BY_ID,
                Some(DELETE_TEST_RUN),
                test_run_id,
            ).invalidating(RUN_LISTS)),
            Route::CreateTestRun { project_id } => ActivePage::CreateTestRun(Composer::new(ctx_owned, project_id)),
            Route::TestPlan { test_plan_id, .. } => ActivePage::TestPlan(DetailResource::new(
                ctx_owned,
                TEST_PLAN_BY_ID,
                Some(DELETE_TEST_PLAN),
                test_plan_id,
            ).invalidating(PLAN_LISTS)),
            Route::CreateTestPlan { project_id } => ActivePage::CreateTestPlan(Composer::new(ctx_owned, project_id)),
        }
    }

    /// Primeras peticiones de la página
    pub async fn load(&self) {
        match self {
            ActivePage::Projects(vm) => vm.load().await,
            ActivePage::Section { page, .. } => page.load().await,
            ActivePage::TestCase(detail) => detail.fetch().await,
            ActivePage::TestRun(detail) => detail.fetch().await,
            ActivePage::TestPlan(detail) => detail.fetch().await,
            ActivePage::Login(_)
            | ActivePage::Register(_)
            | ActivePage::CreateProject(_)
            | ActivePage::Profile(_)
            | ActivePage::CreateTestCase(_)
            | ActivePage::CreateTestRun(_)
            | ActivePage::CreateTestPlan(_) => {}
        }
    }

    /// Suscribe `listener` a los cambios de estado de la página
    pub fn watch<F>(&self, listener: F)
    where
        F: Fn() + Clone + 'static,
    {
        match self {
            ActivePage::Projects(vm) | ActivePage::CreateProject(vm) => vm.list().subscribe(listener),
            ActivePage::Section { page, .. } => page.watch(listener),
            ActivePage::TestCase(detail) => detail.subscribe(listener),
            ActivePage::TestRun(detail) => detail.subscribe(listener),
            ActivePage::TestPlan(detail) => detail.subscribe(listener),
            ActivePage::Login(_)
            | ActivePage::Register(_)
            | ActivePage::Profile(_)
            | ActivePage::CreateTestCase(_)
            | ActivePage::CreateTestRun(_)
            | ActivePage::CreateTestPlan(_) => {}
        }
    }
}
