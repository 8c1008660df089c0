// ============================================================================
// VIEWMODELS - Controladores de página (sin DOM)
// ============================================================================

pub mod page_context;
pub mod draft;
pub mod list_resource;
pub mod detail_resource;
pub mod entities;
pub mod lookup;
pub mod auth_viewmodel;
pub mod projects_viewmodel;
pub mod composers;
pub mod attachments_viewmodel;
pub mod pages;

pub use page_context::PageContext;
pub use draft::Draft;
pub use list_resource::{EntityForm, FieldKind, FormField, FormState, ListResource, ListScope, ListedEntity};
pub use detail_resource::DetailResource;
pub use auth_viewmodel::{AuthError, AuthViewModel};
pub use projects_viewmodel::{ProjectDraft, ProjectSettings, ProjectsViewModel};
pub use composers::{ComposeError, Composer, OptionSource, RunCaseDraft, StepDraft, TestCaseDraft, TestPlanDraft, TestRunDraft};
pub use attachments_viewmodel::AttachmentsViewModel;
pub use pages::{ActivePage, SectionPage};
