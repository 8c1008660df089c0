// ============================================================================
// ROUTES - Ruta activa y navegación (hash `#/...`)
// ============================================================================

use crate::state::reactivity::ReactiveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSection {
    Repository,
    TestRuns,
    TestPlans,
    Defects,
    Milestones,
    Tags,
    Attachments,
    Settings,
}

impl ProjectSection {
    pub const ALL: [ProjectSection; 8] = [
        ProjectSection::Repository,
        ProjectSection::TestRuns,
        ProjectSection::TestPlans,
        ProjectSection::Defects,
        ProjectSection::Milestones,
        ProjectSection::Tags,
        ProjectSection::Attachments,
        ProjectSection::Settings,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ProjectSection::Repository => "repository",
            ProjectSection::TestRuns => "test-runs",
            ProjectSection::TestPlans => "test-plans",
            ProjectSection::Defects => "defects",
            ProjectSection::Milestones => "milestones",
            ProjectSection::Tags => "tags",
            ProjectSection::Attachments => "attachments",
            ProjectSection::Settings => "settings",
        }
    }

    /// Clave i18n del título de la sección
    pub fn label_key(&self) -> &'static str {
        match self {
            ProjectSection::Repository => "repository",
            ProjectSection::TestRuns => "test_runs",
            ProjectSection::TestPlans => "test_plans",
            ProjectSection::Defects => "defects",
            ProjectSection::Milestones => "milestones",
            ProjectSection::Tags => "tags",
            ProjectSection::Attachments => "attachments",
            ProjectSection::Settings => "settings",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Projects,
    CreateProject,
    Profile,
    Project { project_id: String, section: ProjectSection },
    TestCase { project_id: String, test_case_id: String },
    CreateTestCase { project_id: String },
    TestRun { project_id: String, test_run_id: String },
    CreateTestRun { project_id: String },
    TestPlan { project_id: String, test_plan_id: String },
    CreateTestPlan { project_id: String },
}

impl Route {
    /// Rutas accesibles sin sesión
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/auth/login".to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::CreateProject => "/projects/create".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Project { project_id, section } => format!("/projects/{}/{}", project_id, section.slug()),
            Route::TestCase { project_id, test_case_id } => format!("/projects/{}/repository/{}", project_id, test_case_id),
            Route::CreateTestCase { project_id } => format!("/projects/{}/test-create", project_id),
            Route::TestRun { project_id, test_run_id } => format!("/projects/{}/test-runs/{}", project_id, test_run_id),
            Route::CreateTestRun { project_id } => format!("/projects/{}/test-runs/create", project_id),
            Route::TestPlan { project_id, test_plan_id } => format!("/projects/{}/test-plans/{}", project_id, test_plan_id),
            Route::CreateTestPlan { project_id } => format!("/projects/{}/test-plans/create", project_id),
        }
    }

    /// Interpreta una ruta (`/projects/..`, con o sin `#`). `None` si no existe.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_start_matches('#').trim_matches('/');
        let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();
        let route = match parts.as_slice() {
            ["auth", "login"] => Route::Login,
            ["auth", "register"] => Route::Register,
            ["projects"] => Route::Projects,
            ["projects", "create"] => Route::CreateProject,
            ["profile"] => Route::Profile,
            ["projects", id] => Route::Project {
                project_id: id.to_string(),
                section: ProjectSection::Repository,
            },
            ["projects", id, "test-create"] => Route::CreateTestCase { project_id: id.to_string() },
            ["projects", id, "test-runs", "create"] => Route::CreateTestRun { project_id: id.to_string() },
            ["projects", id, "test-plans", "create"] => Route::CreateTestPlan { project_id: id.to_string() },
            ["projects", id, "repository", case_id] => Route::TestCase {
                project_id: id.to_string(),
                test_case_id: case_id.to_string(),
            },
            ["projects", id, "test-runs", run_id] => Route::TestRun {
                project_id: id.to_string(),
                test_run_id: run_id.to_string(),
            },
            ["projects", id, "test-plans", plan_id] => Route::TestPlan {
                project_id: id.to_string(),
                test_plan_id: plan_id.to_string(),
            },
            ["projects", id, section] => Route::Project {
                project_id: id.to_string(),
                section: ProjectSection::from_slug(section)?,
            },
            _ => return None,
        };
        Some(route)
    }

    /// Ruta efectiva según haya o no sesión
    pub fn guard(self, authenticated: bool) -> Self {
        match (self.is_public(), authenticated) {
            (false, false) => Route::Login,
            (true, true) => Route::Projects,
            (_, _) => self,
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Route::Project { project_id, .. }
            | Route::TestCase { project_id, .. }
            | Route::CreateTestCase { project_id }
            | Route::TestRun { project_id, .. }
            | Route::CreateTestRun { project_id }
            | Route::TestPlan { project_id, .. }
            | Route::CreateTestPlan { project_id } => Some(project_id),
            _ => None,
        }
    }
}

/// Ruta inicial: Projects con token, Login sin él
pub fn initial_route(authenticated: bool) -> Route {
    Route::Projects.guard(authenticated)
}

#[derive(Clone)]
pub struct Navigator {
    route: ReactiveState<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self { route: ReactiveState::new(initial) }
    }

    pub fn current(&self) -> Route {
        self.route.get()
    }

    pub fn navigate(&self, route: Route) {
        if self.route.with(|current| *current == route) {
            return;
        }
        log::info!("🧭 [ROUTE] {}", route.path());
        self.route.set(route);
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.route.subscribe(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_route_depends_on_session() {
        assert_eq!(initial_route(true), Route::Projects);
        assert_eq!(initial_route(false), Route::Login);
    }

    #[test]
    fn guard_redirects_between_public_and_private() {
        let tags = Route::Project { project_id: "p1".into(), section: ProjectSection::Tags };
        assert_eq!(tags.clone().guard(false), Route::Login);
        assert_eq!(tags.clone().guard(true), tags);
        assert_eq!(Route::Register.guard(true), Route::Projects);
        assert_eq!(Route::Register.guard(false), Route::Register);
    }

    #[test]
    fn paths_parse_back() {
        let routes = vec![
            Route::Login,
            Route::CreateProject,
            Route::Project { project_id: "p1".into(), section: ProjectSection::Milestones },
            Route::TestCase { project_id: "p1".into(), test_case_id: "c9".into() },
            Route::CreateTestRun { project_id: "p1".into() },
            Route::TestPlan { project_id: "p1".into(), test_plan_id: "tp".into() },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route.clone()), "{}", route.path());
        }
        assert_eq!(Route::parse("#/projects/p1/unknown"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }
}
