//! Validated text newtypes for session setup and player input
//!
//! These newtypes ensure that text is valid by construction:
//! - Non-empty
//! - Trimmed of leading/trailing whitespace
//!
//! Length is not limited here; the HTTP body limit bounds it in practice.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

macro_rules! define_text {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated value.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the text is empty after
            /// trimming.
            pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
                let text = text.into();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the text as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_text!(
    /// Adventure theme, e.g. "dark fantasy" (free text, not an enum)
    Theme,
    "Theme"
);
define_text!(
    /// Difficulty as the player phrased it (free text, not an enum)
    Difficulty,
    "Difficulty"
);
define_text!(
    /// The player's class, e.g. "rogue"
    PlayerClass,
    "Player class"
);
define_text!(
    /// What the player attempts this turn
    ActionDescription,
    "Action description"
);

/// Everything needed to open a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSetup {
    pub theme: Theme,
    pub difficulty: Difficulty,
    pub player_class: PlayerClass,
}

impl SessionSetup {
    pub fn new(theme: Theme, difficulty: Difficulty, player_class: PlayerClass) -> Self {
        Self {
            theme,
            difficulty,
            player_class,
        }
    }

    /// Validate raw strings into a setup.
    pub fn parse(
        theme: impl Into<String>,
        difficulty: impl Into<String>,
        player_class: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            theme: Theme::new(theme)?,
            difficulty: Difficulty::new(difficulty)?,
            player_class: PlayerClass::new(player_class)?,
        })
    }
}
