// ============================================================================
// MODELS - Registros validados por la API (solo los campos que usa la UI)
// ============================================================================

pub mod common;
pub mod auth;
pub mod user;
pub mod project;
pub mod test_case;
pub mod test_suite;
pub mod test_run;
pub mod test_plan;
pub mod defect;
pub mod milestone;
pub mod tag;
pub mod attachment;

pub use common::*;
pub use auth::*;
pub use user::User;
pub use project::Project;
pub use test_case::{TestCase, TestStep};
pub use test_suite::TestSuite;
pub use test_run::{TestRun, TestRunTestCase};
pub use test_plan::TestPlan;
pub use defect::Defect;
pub use milestone::Milestone;
pub use tag::Tag;
pub use attachment::{Attachment, FileUpload};
