//! Outcome classification
//!
//! Turns a raw roll into one of four narrative tiers. The tier is a pure function
//! of `result / max`; boundaries are closed from above:
//!
//! | share of max | tier            |
//! |--------------|-----------------|
//! | >= 80%       | Critical Success|
//! | >= 50%       | Success         |
//! | >= 25%       | Partial Success |
//! | < 25%        | Failure         |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dice::DiceRoll;

/// Narrative tier derived from a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeTier {
    CriticalSuccess,
    Success,
    PartialSuccess,
    Failure,
}

impl OutcomeTier {
    /// Classify `result` out of `max`.
    ///
    /// Compares in integer percent space (`result * 100` against `threshold * max`)
    /// so exact boundaries such as 16/20 land on the right tier.
    pub fn classify(result: i32, max: i32) -> Self {
        let max = max.max(1) as i64;
        let scaled = result as i64 * 100;

        if scaled >= 80 * max {
            OutcomeTier::CriticalSuccess
        } else if scaled >= 50 * max {
            OutcomeTier::Success
        } else if scaled >= 25 * max {
            OutcomeTier::PartialSuccess
        } else {
            OutcomeTier::Failure
        }
    }

    pub fn for_roll(roll: &DiceRoll) -> Self {
        Self::classify(roll.result(), roll.max())
    }

    /// The fixed label other collaborators can match verbatim.
    pub fn label(self) -> &'static str {
        match self {
            OutcomeTier::CriticalSuccess => "Critical Success",
            OutcomeTier::Success => "Success",
            OutcomeTier::PartialSuccess => "Partial Success",
            OutcomeTier::Failure => "Failure",
        }
    }

    /// What the narrator should make of this tier.
    pub fn directive(self) -> &'static str {
        match self {
            OutcomeTier::CriticalSuccess => "spectacular action",
            OutcomeTier::Success => "action proceeds as expected",
            OutcomeTier::PartialSuccess => "succeeds but with a cost or complication",
            OutcomeTier::Failure => "action fails, with possible negative consequences",
        }
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.directive())
    }
}
