//! SupportPreference - What kind of help the participant is looking for

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SupportPreference {
    Practical,
    Emotional,
    Spiritual,
    Social,
}

#[derive(Debug)]
pub struct SupportPreferenceInfo {
    pub focus: &'static str,
    pub typical_requests: &'static [&'static str],
}

static PRACTICAL: SupportPreferenceInfo = SupportPreferenceInfo {
    focus: "practical help and concrete strategies",
    typical_requests: &[
        "help organizing their belongings",
        "guidance on legal/financial matters",
        "strategies for daily life management",
        "help with memorial planning",
    ],
};

static EMOTIONAL: SupportPreferenceInfo = SupportPreferenceInfo {
    focus: "emotional processing and validation",
    typical_requests: &[
        "someone to listen without judging",
        "validation that what I'm feeling is normal",
        "help processing difficult emotions",
        "safe space to share memories",
    ],
};

static SPIRITUAL: SupportPreferenceInfo = SupportPreferenceInfo {
    focus: "meaning-making and spiritual concerns",
    typical_requests: &[
        "help finding meaning in the loss",
        "exploring questions about afterlife",
        "connecting with spiritual practices",
        "understanding why this happened",
    ],
};

static SOCIAL: SupportPreferenceInfo = SupportPreferenceInfo {
    focus: "rebuilding social connections",
    typical_requests: &[
        "help navigating social situations",
        "connecting with others who understand",
        "rebuilding social identity",
        "managing others' reactions to my grief",
    ],
};

impl SupportPreference {
    pub const ALL: [SupportPreference; 4] = [
        SupportPreference::Practical,
        SupportPreference::Emotional,
        SupportPreference::Spiritual,
        SupportPreference::Social,
    ];

    pub fn info(&self) -> &'static SupportPreferenceInfo {
        match self {
            SupportPreference::Practical => &PRACTICAL,
            SupportPreference::Emotional => &EMOTIONAL,
            SupportPreference::Spiritual => &SPIRITUAL,
            SupportPreference::Social => &SOCIAL,
        }
    }
}

impl std::fmt::Display for SupportPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupportPreference::Practical => write!(f, "practical"),
            SupportPreference::Emotional => write!(f, "emotional"),
            SupportPreference::Spiritual => write!(f, "spiritual"),
            SupportPreference::Social => write!(f, "social"),
        }
    }
}

impl std::str::FromStr for SupportPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practical" => Ok(SupportPreference::Practical),
            "emotional" => Ok(SupportPreference::Emotional),
            "spiritual" => Ok(SupportPreference::Spiritual),
            "social" => Ok(SupportPreference::Social),
            _ => Err(DomainError::unknown_key("support preference", s)),
        }
    }
}
