//! Session use cases.
//!
//! The turn engine: opening sessions, executing turns, reading them back.

use std::sync::Arc;

mod context;
mod create_session;
mod execute_action;
mod get_view;
mod locks;

pub use context::build_full_context;
pub use create_session::CreateSession;
pub use execute_action::{ExecuteAction, TurnError};
pub use get_view::GetSessionView;
pub use locks::{SessionGuard, SessionLocks};

/// Container for session use cases.
pub struct SessionUseCases {
    pub create: Arc<CreateSession>,
    pub execute_action: Arc<ExecuteAction>,
    pub get_view: Arc<GetSessionView>,
}

impl SessionUseCases {
    pub fn new(
        create: Arc<CreateSession>,
        execute_action: Arc<ExecuteAction>,
        get_view: Arc<GetSessionView>,
    ) -> Self {
        Self {
            create,
            execute_action,
            get_view,
        }
    }
}
