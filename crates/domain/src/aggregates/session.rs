//! Session aggregate - one continuous adventure
//!
//! # Invariants
//!
//! - The initial scenario is fixed at construction. There is no setter.
//! - `current_context` is replaced (never appended) by each completed turn.
//! - `action_count` equals the number of actions persisted for the session and
//!   is the source of the next order number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Action;
use crate::ids::SessionToken;
use crate::value_objects::{Difficulty, PlayerClass, SessionSetup, Theme};

/// A running RPG session.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use taleturn_domain::{Session, SessionSetup, SessionToken};
///
/// let setup = SessionSetup::parse("Fantasy", "Normal", "Rogue").unwrap();
/// let token = SessionToken::parse("tok-1").unwrap();
/// let session = Session::new(token, setup, "You wake in a cellar.", Utc::now());
///
/// assert_eq!(session.initial_scenario(), "You wake in a cellar.");
/// assert_eq!(session.current_context(), session.initial_scenario());
/// assert_eq!(session.next_action_order(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    // Identity
    token: SessionToken,

    // Setup chosen by the player
    theme: Theme,
    difficulty: Difficulty,
    player_class: PlayerClass,

    // Narrative state
    initial_scenario: String,
    current_context: String,
    action_count: u32,

    // Timestamps
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Open a session. The scenario seeds both the immutable initial scenario
    /// and the first current context.
    pub fn new(
        token: SessionToken,
        setup: SessionSetup,
        initial_scenario: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let initial_scenario = initial_scenario.into();
        Self {
            token,
            theme: setup.theme,
            difficulty: setup.difficulty,
            player_class: setup.player_class,
            current_context: initial_scenario.clone(),
            initial_scenario,
            action_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    #[inline]
    pub fn player_class(&self) -> &PlayerClass {
        &self.player_class
    }

    #[inline]
    pub fn initial_scenario(&self) -> &str {
        &self.initial_scenario
    }

    /// Narration of the latest turn, or the initial scenario before any turn.
    #[inline]
    pub fn current_context(&self) -> &str {
        &self.current_context
    }

    #[inline]
    pub fn action_count(&self) -> u32 {
        self.action_count
    }

    /// Order number the next action must take.
    #[inline]
    pub fn next_action_order(&self) -> u32 {
        self.action_count + 1
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods (used when loading from storage)
    // =========================================================================

    pub fn with_current_context(mut self, current_context: impl Into<String>) -> Self {
        self.current_context = current_context.into();
        self
    }

    pub fn with_action_count(mut self, action_count: u32) -> Self {
        self.action_count = action_count;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Fold a completed turn into the session.
    ///
    /// Replaces the current context with the turn's narration (not the full
    /// transcript) and returns the order number consumed by the turn.
    pub fn record_turn(&mut self, narration: impl Into<String>, now: DateTime<Utc>) -> u32 {
        self.action_count += 1;
        self.current_context = narration.into();
        self.updated_at = now;
        self.action_count
    }
}

/// A session together with its turns, in narrative order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session: Session,
    pub actions: Vec<Action>,
}

impl SessionView {
    /// Build a view, sorting actions by order number.
    pub fn new(session: Session, mut actions: Vec<Action>) -> Self {
        actions.sort_by_key(|a| a.order());
        Self { session, actions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn create_test_session() -> Session {
        let setup = SessionSetup::parse("Space opera", "Hard", "Pilot").unwrap();
        Session::new(
            SessionToken::parse("tok").unwrap(),
            setup,
            "The station alarms blare.",
            created(),
        )
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_seeds_context_with_scenario() {
            let session = create_test_session();
            assert_eq!(session.theme().as_str(), "Space opera");
            assert_eq!(session.difficulty().as_str(), "Hard");
            assert_eq!(session.player_class().as_str(), "Pilot");
            assert_eq!(session.initial_scenario(), "The station alarms blare.");
            assert_eq!(session.current_context(), "The station alarms blare.");
            assert_eq!(session.action_count(), 0);
            assert_eq!(session.created_at(), session.updated_at());
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn record_turn_replaces_context_and_keeps_scenario() {
            let mut session = create_test_session();
            let later = Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap();

            let order = session.record_turn("You reach the hangar.", later);

            assert_eq!(order, 1);
            assert_eq!(session.current_context(), "You reach the hangar.");
            assert_eq!(session.initial_scenario(), "The station alarms blare.");
            assert_eq!(session.updated_at(), later);
            assert_eq!(session.created_at(), created());
            assert_eq!(session.next_action_order(), 2);
        }

        #[test]
        fn orders_are_contiguous() {
            let mut session = create_test_session();
            let orders: Vec<u32> = (0..4)
                .map(|i| session.record_turn(format!("turn {i}"), created()))
                .collect();
            assert_eq!(orders, vec![1, 2, 3, 4]);
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn serializes_camel_case() {
            let json = serde_json::to_value(create_test_session()).unwrap();
            assert_eq!(json["initialScenario"], "The station alarms blare.");
            assert_eq!(json["playerClass"], "Pilot");
            assert_eq!(json["actionCount"], 0);
        }
    }
}
