//! Execute action use case - one full turn from raw input to persisted narration.

use std::sync::Arc;

use taleturn_domain::{
    Action, ActionDescription, ActionId, DicePolicy, DiceType, DomainError, OutcomeTier,
    SessionToken,
};

use super::context::build_full_context;
use super::locks::SessionLocks;
use crate::infrastructure::ports::{ActionRepo, ClockPort, RandomPort, RepoError, SessionRepo};
use crate::use_cases::narration::NarrationClient;

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionToken),
    #[error("Invalid dice type: {0}")]
    InvalidDice(DomainError),
    #[error("Invalid action: {0}")]
    InvalidAction(DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Rolls, classifies, narrates and records one turn.
///
/// Steps from loading prior turns to saving the session run while holding the
/// session's lock, so concurrent turns on one session get distinct,
/// contiguous order numbers.
pub struct ExecuteAction {
    sessions: Arc<dyn SessionRepo>,
    actions: Arc<dyn ActionRepo>,
    narration: Arc<NarrationClient>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    locks: Arc<SessionLocks>,
    dice_policy: DicePolicy,
}

impl ExecuteAction {
    pub fn new(
        sessions: Arc<dyn SessionRepo>,
        actions: Arc<dyn ActionRepo>,
        narration: Arc<NarrationClient>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        locks: Arc<SessionLocks>,
        dice_policy: DicePolicy,
    ) -> Self {
        Self {
            sessions,
            actions,
            narration,
            clock,
            random,
            locks,
            dice_policy,
        }
    }

    pub async fn execute(
        &self,
        token: &SessionToken,
        dice_text: &str,
        description: ActionDescription,
    ) -> Result<Action, TurnError> {
        // Unknown tokens are rejected before a lock entry is created for them.
        if self.sessions.get(token).await?.is_none() {
            return Err(TurnError::SessionNotFound(token.clone()));
        }
        let dice_type =
            DiceType::resolve(dice_text, self.dice_policy).map_err(TurnError::InvalidDice)?;

        let _guard = self.locks.lock(token).await;

        let mut session = self
            .sessions
            .get(token)
            .await?
            .ok_or_else(|| TurnError::SessionNotFound(token.clone()))?;

        let roll = dice_type.roll_with(|min, max| self.random.gen_range(min, max));
        let outcome = OutcomeTier::for_roll(&roll);
        tracing::debug!(
            session_token = %token,
            roll = %roll,
            outcome = outcome.label(),
            "Dice rolled"
        );

        let prior = self.actions.list_for_session(token).await?;
        let full_context = build_full_context(session.initial_scenario(), &prior);

        let narration = self
            .narration
            .request_turn_narration(&full_context, &description, &roll, outcome)
            .await;
        if narration.is_fallback() {
            tracing::warn!(session_token = %token, "Turn narration unavailable, storing placeholder");
        }

        let order = prior.len() as u32 + 1;
        if order != session.next_action_order() {
            tracing::warn!(
                session_token = %token,
                stored_count = session.action_count(),
                listed = prior.len(),
                "Session action count out of step with stored turns, using listed turns"
            );
            session = session.with_action_count(order - 1);
        }

        let now = self.clock.now();
        let action = Action::new(
            ActionId::from_uuid(self.random.gen_uuid()),
            token.clone(),
            order,
            roll,
            description,
            narration.into_text(),
            now,
        )
        .map_err(TurnError::InvalidAction)?;
        self.actions.append(&action).await?;

        session.record_turn(action.narration(), now);
        self.sessions.save(&session).await?;

        tracing::info!(
            session_token = %token,
            order,
            outcome = outcome.label(),
            "Turn recorded"
        );
        Ok(action)
    }
}
