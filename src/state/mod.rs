// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod query_state;
pub mod session_state;
pub mod notification_state;
pub mod route_state;
pub mod app_state;

pub use reactivity::*;
pub use query_state::*;
pub use session_state::*;
pub use notification_state::*;
pub use route_state::*;
pub use app_state::*;
