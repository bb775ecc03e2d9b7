//! LossCircumstance - How the death happened

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LossCircumstance {
    Sudden,
    IllnessShort,
    IllnessLong,
    Suicide,
    Accident,
}

#[derive(Debug)]
pub struct LossCircumstanceInfo {
    pub description: &'static str,
    pub typical_emotions: &'static [&'static str],
    pub common_phrases: &'static [&'static str],
}

static SUDDEN: LossCircumstanceInfo = LossCircumstanceInfo {
    description: "unexpected and sudden (accident, heart attack, etc.)",
    typical_emotions: &["shock", "disbelief", "anger", "regret"],
    common_phrases: &[
        "I can't believe they're gone",
        "It happened so fast",
        "I never got to say goodbye",
        "I keep expecting them to walk through the door",
    ],
};

static ILLNESS_SHORT: LossCircumstanceInfo = LossCircumstanceInfo {
    description: "after a brief illness (few weeks/months)",
    typical_emotions: &["exhaustion", "relief mixed with guilt", "regret"],
    common_phrases: &[
        "It all happened so quickly",
        "I feel guilty for feeling relieved",
        "I wasn't prepared for how fast it went",
        "I'm exhausted from caregiving",
    ],
};

static ILLNESS_LONG: LossCircumstanceInfo = LossCircumstanceInfo {
    description: "after a long illness (years of caregiving)",
    typical_emotions: &[
        "relief",
        "guilt about relief",
        "caregiver fatigue",
        "identity loss",
    ],
    common_phrases: &[
        "I don't know who I am without being their caregiver",
        "Part of me is relieved the suffering is over",
        "I feel guilty for having a life now",
        "I watched them disappear long before they died",
    ],
};

static SUICIDE: LossCircumstanceInfo = LossCircumstanceInfo {
    description: "by suicide",
    typical_emotions: &["guilt", "anger", "shame", "confusion", "stigma"],
    common_phrases: &[
        "I keep wondering what I could have done differently",
        "I'm angry at them but also miss them desperately",
        "People don't know what to say to me",
        "I feel like I failed them",
    ],
};

static ACCIDENT: LossCircumstanceInfo = LossCircumstanceInfo {
    description: "in an accident",
    typical_emotions: &["trauma", "anger at circumstances", "what-if thinking"],
    common_phrases: &[
        "If only they had left five minutes later",
        "I keep replaying that day",
        "I'm angry at the other driver/situation",
        "It feels so senseless",
    ],
};

impl LossCircumstance {
    pub const ALL: [LossCircumstance; 5] = [
        LossCircumstance::Sudden,
        LossCircumstance::IllnessShort,
        LossCircumstance::IllnessLong,
        LossCircumstance::Suicide,
        LossCircumstance::Accident,
    ];

    pub fn info(&self) -> &'static LossCircumstanceInfo {
        match self {
            LossCircumstance::Sudden => &SUDDEN,
            LossCircumstance::IllnessShort => &ILLNESS_SHORT,
            LossCircumstance::IllnessLong => &ILLNESS_LONG,
            LossCircumstance::Suicide => &SUICIDE,
            LossCircumstance::Accident => &ACCIDENT,
        }
    }
}

impl std::fmt::Display for LossCircumstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossCircumstance::Sudden => write!(f, "sudden"),
            LossCircumstance::IllnessShort => write!(f, "illness_short"),
            LossCircumstance::IllnessLong => write!(f, "illness_long"),
            LossCircumstance::Suicide => write!(f, "suicide"),
            LossCircumstance::Accident => write!(f, "accident"),
        }
    }
}

impl std::str::FromStr for LossCircumstance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sudden" => Ok(LossCircumstance::Sudden),
            "illness_short" => Ok(LossCircumstance::IllnessShort),
            "illness_long" => Ok(LossCircumstance::IllnessLong),
            "suicide" => Ok(LossCircumstance::Suicide),
            "accident" => Ok(LossCircumstance::Accident),
            _ => Err(DomainError::unknown_key("loss circumstance", s)),
        }
    }
}
