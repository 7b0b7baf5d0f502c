//! Dice value objects
//!
//! The engine supports the classic polyhedral set (d4 through d20). A roll is a
//! single die; there are no pools or modifiers. Randomness is injected by the
//! caller so the domain stays deterministic and testable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the supported polyhedral dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DiceType {
    /// Every supported dice type, smallest first.
    pub const ALL: [DiceType; 6] = [
        DiceType::D4,
        DiceType::D6,
        DiceType::D8,
        DiceType::D10,
        DiceType::D12,
        DiceType::D20,
    ];

    /// Number of faces, which is also the maximum roll.
    pub fn faces(self) -> i32 {
        match self {
            DiceType::D4 => 4,
            DiceType::D6 => 6,
            DiceType::D8 => 8,
            DiceType::D10 => 10,
            DiceType::D12 => 12,
            DiceType::D20 => 20,
        }
    }

    /// Canonical text form ("d4" .. "d20").
    pub fn as_str(self) -> &'static str {
        match self {
            DiceType::D4 => "d4",
            DiceType::D6 => "d6",
            DiceType::D8 => "d8",
            DiceType::D10 => "d10",
            DiceType::D12 => "d12",
            DiceType::D20 => "d20",
        }
    }

    /// Resolve free-text dice input under the given policy.
    ///
    /// With [`DicePolicy::Lenient`] any unrecognised text resolves to d20.
    /// With [`DicePolicy::Strict`] it is rejected.
    pub fn resolve(input: &str, policy: DicePolicy) -> Result<Self, DomainError> {
        match (input.parse::<DiceType>(), policy) {
            (Ok(dice), _) => Ok(dice),
            (Err(_), DicePolicy::Lenient) => Ok(DiceType::D20),
            (Err(e), DicePolicy::Strict) => Err(e),
        }
    }

    /// Roll this die using an injected range generator.
    ///
    /// `gen_range(min, max)` must return a value in `min..=max`. Values outside
    /// that range are clamped so the returned roll always upholds its invariant.
    pub fn roll_with(self, gen_range: impl FnOnce(i32, i32) -> i32) -> DiceRoll {
        let faces = self.faces();
        let result = gen_range(1, faces).clamp(1, faces);
        DiceRoll {
            dice_type: self,
            result,
        }
    }
}

impl fmt::Display for DiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d4" => Ok(DiceType::D4),
            "d6" => Ok(DiceType::D6),
            "d8" => Ok(DiceType::D8),
            "d10" => Ok(DiceType::D10),
            "d12" => Ok(DiceType::D12),
            "d20" => Ok(DiceType::D20),
            _ => Err(DomainError::parse(format!("Unknown dice type: {}", s))),
        }
    }
}

/// How unrecognised dice text is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DicePolicy {
    /// Unknown dice text rolls as a d20.
    #[default]
    Lenient,
    /// Unknown dice text is a usage error.
    Strict,
}

impl FromStr for DicePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" | "" => Ok(DicePolicy::Lenient),
            "strict" => Ok(DicePolicy::Strict),
            _ => Err(DomainError::parse(format!("Invalid dice policy: {}", s))),
        }
    }
}

/// The outcome of rolling a single die.
///
/// # Invariants
///
/// - `1 <= result <= dice_type.faces()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    dice_type: DiceType,
    result: i32,
}

impl DiceRoll {
    /// Rebuild a roll from stored values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `result` is outside `1..=faces`.
    pub fn new(dice_type: DiceType, result: i32) -> Result<Self, DomainError> {
        if !(1..=dice_type.faces()).contains(&result) {
            return Err(DomainError::validation(format!(
                "Roll {} is out of range for a {}",
                result, dice_type
            )));
        }
        Ok(Self { dice_type, result })
    }

    pub fn dice_type(&self) -> DiceType {
        self.dice_type
    }

    pub fn result(&self) -> i32 {
        self.result
    }

    pub fn max(&self) -> i32 {
        self.dice_type.faces()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.result, self.dice_type)
    }
}
