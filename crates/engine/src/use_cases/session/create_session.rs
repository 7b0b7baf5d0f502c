//! Create session use case - opens an adventure with a generated scenario.

use std::sync::Arc;

use taleturn_domain::{Session, SessionSetup, SessionToken};

use crate::infrastructure::ports::{ClockPort, RandomPort, RepoError, SessionRepo};
use crate::use_cases::narration::NarrationClient;

/// Starts a new session.
///
/// A failed generation does not abort creation: the placeholder text becomes
/// the initial scenario and the session is persisted anyway.
pub struct CreateSession {
    sessions: Arc<dyn SessionRepo>,
    narration: Arc<NarrationClient>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl CreateSession {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        narration: Arc<NarrationClient>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            sessions,
            narration,
            clock,
            random,
        }
    }

    pub async fn execute(&self, setup: SessionSetup) -> Result<Session, RepoError> {
        let scenario = self.narration.request_opening_scenario(&setup).await;
        if scenario.is_fallback() {
            tracing::warn!(
                theme = %setup.theme,
                "Opening scenario unavailable, storing placeholder"
            );
        }

        let token = SessionToken::from_uuid(self.random.gen_uuid());
        let session = Session::new(token, setup, scenario.into_text(), self.clock.now());
        self.sessions.create(&session).await?;

        tracing::info!(session_token = %session.token(), "Session created");
        Ok(session)
    }
}
