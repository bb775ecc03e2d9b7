//! PersonalityTrait - How grief gets expressed

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    Expressive,
    Reserved,
    Analytical,
    Spiritual,
    Skeptical,
}

#[derive(Debug)]
pub struct PersonalityTraitInfo {
    pub description: &'static str,
    pub communication_style: &'static str,
}

static EXPRESSIVE: PersonalityTraitInfo = PersonalityTraitInfo {
    description: "open about emotions, talks freely about feelings",
    communication_style: "shares details, uses emotional language, seeks connection",
};

static RESERVED: PersonalityTraitInfo = PersonalityTraitInfo {
    description: "private about emotions, prefers practical approach",
    communication_style: "brief responses, focuses on facts, avoids emotional details",
};

static ANALYTICAL: PersonalityTraitInfo = PersonalityTraitInfo {
    description: "tries to understand and analyze the grief process",
    communication_style: "asks questions, wants explanations, seeks frameworks",
};

static SPIRITUAL: PersonalityTraitInfo = PersonalityTraitInfo {
    description: "finds meaning through faith or spirituality",
    communication_style: "references beliefs, seeks spiritual guidance, questions meaning",
};

static SKEPTICAL: PersonalityTraitInfo = PersonalityTraitInfo {
    description: "doubtful about help, may be resistant to suggestions",
    communication_style: "challenging questions, expresses doubt, needs convincing",
};

impl PersonalityTrait {
    pub const ALL: [PersonalityTrait; 5] = [
        PersonalityTrait::Expressive,
        PersonalityTrait::Reserved,
        PersonalityTrait::Analytical,
        PersonalityTrait::Spiritual,
        PersonalityTrait::Skeptical,
    ];

    pub fn info(&self) -> &'static PersonalityTraitInfo {
        match self {
            PersonalityTrait::Expressive => &EXPRESSIVE,
            PersonalityTrait::Reserved => &RESERVED,
            PersonalityTrait::Analytical => &ANALYTICAL,
            PersonalityTrait::Spiritual => &SPIRITUAL,
            PersonalityTrait::Skeptical => &SKEPTICAL,
        }
    }
}

impl std::fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonalityTrait::Expressive => write!(f, "expressive"),
            PersonalityTrait::Reserved => write!(f, "reserved"),
            PersonalityTrait::Analytical => write!(f, "analytical"),
            PersonalityTrait::Spiritual => write!(f, "spiritual"),
            PersonalityTrait::Skeptical => write!(f, "skeptical"),
        }
    }
}

impl std::str::FromStr for PersonalityTrait {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expressive" => Ok(PersonalityTrait::Expressive),
            "reserved" => Ok(PersonalityTrait::Reserved),
            "analytical" => Ok(PersonalityTrait::Analytical),
            "spiritual" => Ok(PersonalityTrait::Spiritual),
            "skeptical" => Ok(PersonalityTrait::Skeptical),
            _ => Err(DomainError::unknown_key("personality trait", s)),
        }
    }
}
