//! ProfileSelection / BotStrategy - Run configuration switches

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// How the profile for each configured session is chosen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSelection {
    #[default]
    Predefined,
    Random,
    Custom,
}

impl std::fmt::Display for ProfileSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSelection::Predefined => write!(f, "predefined"),
            ProfileSelection::Random => write!(f, "random"),
            ProfileSelection::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for ProfileSelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predefined" => Ok(ProfileSelection::Predefined),
            "random" => Ok(ProfileSelection::Random),
            "custom" => Ok(ProfileSelection::Custom),
            _ => Err(DomainError::unknown_key("profile type", s)),
        }
    }
}

/// Where persona prompt overrides are applied
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BotStrategy {
    /// Persona on the first participant slot, library defaults elsewhere
    #[default]
    PersonaSlot,
    /// One override set for every bot in the session
    WholeSession,
}

impl std::fmt::Display for BotStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotStrategy::PersonaSlot => write!(f, "persona_slot"),
            BotStrategy::WholeSession => write!(f, "whole_session"),
        }
    }
}
