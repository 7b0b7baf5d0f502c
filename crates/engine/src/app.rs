//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{ActionRepo, ClockPort, LlmPort, RandomPort, SessionRepo};
use crate::use_cases;
use crate::use_cases::narration::NarrationClient;
use crate::use_cases::session::{CreateSession, ExecuteAction, GetSessionView, SessionLocks};

/// Main application state.
///
/// Holds repositories and use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Storage ports. One adapter usually backs both.
pub struct Repositories {
    pub session: Arc<dyn SessionRepo>,
    pub action: Arc<dyn ActionRepo>,
}

impl Repositories {
    /// Use a single store for sessions and actions.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: SessionRepo + ActionRepo + 'static,
    {
        Self {
            session: store.clone(),
            action: store,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub session: use_cases::SessionUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repositories: Repositories,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        config: &EngineConfig,
    ) -> Self {
        let narration = Arc::new(NarrationClient::new(
            llm,
            config.llm_temperature,
            config.llm_max_tokens,
        ));
        let locks = Arc::new(SessionLocks::new());

        let session = use_cases::SessionUseCases::new(
            Arc::new(CreateSession::new(
                repositories.session.clone(),
                narration.clone(),
                clock.clone(),
                random.clone(),
            )),
            Arc::new(ExecuteAction::new(
                repositories.session.clone(),
                repositories.action.clone(),
                narration,
                clock,
                random,
                locks,
                config.dice_policy,
            )),
            Arc::new(GetSessionView::new(
                repositories.session.clone(),
                repositories.action.clone(),
            )),
        );

        Self {
            repositories,
            use_cases: UseCases { session },
        }
    }
}
