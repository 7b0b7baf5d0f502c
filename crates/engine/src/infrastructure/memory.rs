//! In-process session storage.
//!
//! Used when no `SESSION_DB` is configured, and by the end-to-end tests.
//! Sessions and their turns live in [`DashMap`]s keyed by token; nothing
//! survives a restart.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use taleturn_domain::{Action, Session, SessionToken};

use crate::infrastructure::ports::{ActionRepo, RepoError, SessionRepo};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionToken, Session>,
    actions: DashMap<SessionToken, Vec<Action>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionRepo for InMemorySessionStore {
    async fn create(&self, session: &Session) -> Result<(), RepoError> {
        match self.sessions.entry(session.token().clone()) {
            Entry::Occupied(_) => Err(RepoError::constraint(format!(
                "session {} already exists",
                session.token()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(session.clone());
                Ok(())
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), RepoError> {
        self.sessions.insert(session.token().clone(), session.clone());
        Ok(())
    }

    async fn get(&self, token: &SessionToken) -> Result<Option<Session>, RepoError> {
        Ok(self.sessions.get(token).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl ActionRepo for InMemorySessionStore {
    async fn append(&self, action: &Action) -> Result<(), RepoError> {
        let mut turns = self
            .actions
            .entry(action.session_token().clone())
            .or_default();

        if turns.iter().any(|a| a.order() == action.order()) {
            return Err(RepoError::constraint(format!(
                "session {} already has action #{}",
                action.session_token(),
                action.order()
            )));
        }

        turns.push(action.clone());
        turns.sort_by_key(Action::order);
        Ok(())
    }

    async fn list_for_session(&self, token: &SessionToken) -> Result<Vec<Action>, RepoError> {
        Ok(self
            .actions
            .get(token)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
