//! Repository port traits for session storage.

use async_trait::async_trait;
use taleturn_domain::{Action, Session, SessionToken};

use super::error::RepoError;

/// Storage for session records, keyed by their public token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Insert a new session. A token that already names a stored session must
    /// be rejected with `RepoError::ConstraintViolation`.
    async fn create(&self, session: &Session) -> Result<(), RepoError>;
    /// Write back the turn state (context, count, updated time) of a session.
    /// Setup fields and the initial scenario are never overwritten.
    async fn save(&self, session: &Session) -> Result<(), RepoError>;
    /// Look up by token; absence is `Ok(None)`, not an error.
    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, RepoError>;
}

/// Storage for the turns of each session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionRepo: Send + Sync {
    /// Append a turn. A second action with the same (session, order) pair must
    /// be rejected with `RepoError::ConstraintViolation`.
    async fn append(&self, action: &Action) -> Result<(), RepoError>;
    /// All turns of a session, ascending by order number.
    async fn list_for_session(&self, token: &SessionToken) -> Result<Vec<Action>, RepoError>;
}
