//! LossType - Who the participant lost

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Relationship to the person (or animal) who died
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Spouse,
    Parent,
    Child,
    Sibling,
    Friend,
    Pet,
}

/// Descriptive data attached to a loss type
#[derive(Debug)]
pub struct LossTypeInfo {
    pub relationship: &'static str,
    /// Inclusive age bounds used when no age is given
    pub typical_age_range: (u32, u32),
    pub common_concerns: &'static [&'static str],
}

static SPOUSE: LossTypeInfo = LossTypeInfo {
    relationship: "spouse/partner",
    typical_age_range: (40, 80),
    common_concerns: &[
        "loneliness and isolation",
        "financial worries about single income",
        "learning to do tasks my partner used to handle",
        "deciding what to do with shared belongings",
        "social situations as a single person",
    ],
};

static PARENT: LossTypeInfo = LossTypeInfo {
    relationship: "parent",
    typical_age_range: (25, 70),
    common_concerns: &[
        "feeling orphaned regardless of age",
        "regrets about things left unsaid",
        "managing inherited responsibilities",
        "family dynamics and inheritance conflicts",
        "preserving their memory and legacy",
    ],
};

static CHILD: LossTypeInfo = LossTypeInfo {
    relationship: "child",
    typical_age_range: (20, 60),
    common_concerns: &[
        "overwhelming guilt and questioning 'what if'",
        "marriage and family strain",
        "questioning faith and meaning in life",
        "inability to focus at work",
        "fear of having more children",
    ],
};

static SIBLING: LossTypeInfo = LossTypeInfo {
    relationship: "sibling",
    typical_age_range: (15, 80),
    common_concerns: &[
        "complicated family dynamics",
        "survivor's guilt",
        "changing role within the family",
        "childhood memories and shared experiences",
        "supporting aging parents through their grief",
    ],
};

static FRIEND: LossTypeInfo = LossTypeInfo {
    relationship: "close friend",
    typical_age_range: (16, 80),
    common_concerns: &[
        "feeling excluded from 'official' mourning",
        "not being recognized as a legitimate griever",
        "navigating relationships with the family",
        "preserving the friendship's memory",
        "finding support when others don't understand the depth of the friendship",
    ],
};

static PET: LossTypeInfo = LossTypeInfo {
    relationship: "beloved pet",
    typical_age_range: (8, 80),
    common_concerns: &[
        "others not taking the loss seriously",
        "decision-making about euthanasia",
        "emptiness in daily routines",
        "whether to get another pet",
        "feeling judged for the depth of grief",
    ],
};

impl LossType {
    pub const ALL: [LossType; 6] = [
        LossType::Spouse,
        LossType::Parent,
        LossType::Child,
        LossType::Sibling,
        LossType::Friend,
        LossType::Pet,
    ];

    pub fn info(&self) -> &'static LossTypeInfo {
        match self {
            LossType::Spouse => &SPOUSE,
            LossType::Parent => &PARENT,
            LossType::Child => &CHILD,
            LossType::Sibling => &SIBLING,
            LossType::Friend => &FRIEND,
            LossType::Pet => &PET,
        }
    }
}

impl std::fmt::Display for LossType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossType::Spouse => write!(f, "spouse"),
            LossType::Parent => write!(f, "parent"),
            LossType::Child => write!(f, "child"),
            LossType::Sibling => write!(f, "sibling"),
            LossType::Friend => write!(f, "friend"),
            LossType::Pet => write!(f, "pet"),
        }
    }
}

impl std::str::FromStr for LossType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spouse" => Ok(LossType::Spouse),
            "parent" => Ok(LossType::Parent),
            "child" => Ok(LossType::Child),
            "sibling" => Ok(LossType::Sibling),
            "friend" => Ok(LossType::Friend),
            "pet" => Ok(LossType::Pet),
            _ => Err(DomainError::unknown_key("loss type", s)),
        }
    }
}
