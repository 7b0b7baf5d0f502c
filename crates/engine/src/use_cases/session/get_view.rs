//! Get session view use case.

use std::sync::Arc;

use taleturn_domain::{SessionToken, SessionView};

use crate::infrastructure::ports::{ActionRepo, RepoError, SessionRepo};

/// Loads a session with its turns in narrative order.
pub struct GetSessionView {
    sessions: Arc<dyn SessionRepo>,
    actions: Arc<dyn ActionRepo>,
}

impl GetSessionView {
    pub fn new(sessions: Arc<dyn SessionRepo>, actions: Arc<dyn ActionRepo>) -> Self {
        Self { sessions, actions }
    }

    /// `Ok(None)` when no session has this token.
    pub async fn execute(&self, token: &SessionToken) -> Result<Option<SessionView>, RepoError> {
        let Some(session) = self.sessions.get(token).await? else {
            tracing::debug!(session_token = %token, "Session view requested for unknown token");
            return Ok(None);
        };

        let actions = self.actions.list_for_session(token).await?;
        Ok(Some(SessionView::new(session, actions)))
    }
}
