//! Action entity - one player turn within a session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;
use crate::ids::{ActionId, SessionToken};
use crate::value_objects::{ActionDescription, DiceRoll, DiceType, OutcomeTier};

const ORDER_STARTS_AT_ONE: &str = "action order must start at 1";

/// A single executed turn. Immutable once created.
///
/// # Invariants
///
/// - `order >= 1`, and equals the number of earlier actions in the session + 1
/// - the roll is within range for its dice type (enforced by `DiceRoll`)
/// - `narration` is exactly the text produced for the turn
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    id: ActionId,
    session_token: SessionToken,
    order: u32,
    roll: DiceRoll,
    description: ActionDescription,
    narration: String,
    created_at: DateTime<Utc>,
}

impl Action {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when `order` is 0.
    pub fn new(
        id: ActionId,
        session_token: SessionToken,
        order: u32,
        roll: DiceRoll,
        description: ActionDescription,
        narration: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if order == 0 {
            return Err(DomainError::validation(ORDER_STARTS_AT_ONE));
        }
        Ok(Self {
            id,
            session_token,
            order,
            roll,
            description,
            narration: narration.into(),
            created_at,
        })
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn session_token(&self) -> &SessionToken {
        &self.session_token
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn roll(&self) -> &DiceRoll {
        &self.roll
    }

    pub fn dice_type(&self) -> DiceType {
        self.roll.dice_type()
    }

    pub fn dice_result(&self) -> i32 {
        self.roll.result()
    }

    /// Tier the roll fell into.
    pub fn outcome(&self) -> OutcomeTier {
        OutcomeTier::for_roll(&self.roll)
    }

    pub fn description(&self) -> &ActionDescription {
        &self.description
    }

    pub fn narration(&self) -> &str {
        &self.narration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Flat wire format; the roll is split into its two columns.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionWireFormat {
    id: ActionId,
    session_token: SessionToken,
    order: u32,
    dice_type: DiceType,
    dice_result: i32,
    #[serde(default, skip_deserializing)]
    outcome: Option<OutcomeTier>,
    action_description: ActionDescription,
    narration: String,
    created_at: DateTime<Utc>,
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = ActionWireFormat {
            id: self.id,
            session_token: self.session_token.clone(),
            order: self.order,
            dice_type: self.roll.dice_type(),
            dice_result: self.roll.result(),
            outcome: Some(self.outcome()),
            action_description: self.description.clone(),
            narration: self.narration.clone(),
            created_at: self.created_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = ActionWireFormat::deserialize(deserializer)?;
        let roll = DiceRoll::new(wire.dice_type, wire.dice_result)
            .map_err(serde::de::Error::custom)?;
        Action::new(
            wire.id,
            wire.session_token,
            wire.order,
            roll,
            wire.action_description,
            wire.narration,
            wire.created_at,
        )
        .map_err(serde::de::Error::custom)
    }
}
