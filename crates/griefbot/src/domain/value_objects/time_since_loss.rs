//! TimeSinceLoss - Grief stage by elapsed time

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeSinceLoss {
    VeryRecent,
    Recent,
    Intermediate,
    LongTerm,
}

#[derive(Debug)]
pub struct TimeSinceLossInfo {
    pub timeframe: &'static str,
    pub typical_state: &'static str,
    pub common_needs: &'static [&'static str],
}

static VERY_RECENT: TimeSinceLossInfo = TimeSinceLossInfo {
    timeframe: "1-4 weeks ago",
    typical_state: "acute grief, shock, numbness",
    common_needs: &[
        "immediate practical support",
        "validation of feelings",
        "help with arrangements",
    ],
};

static RECENT: TimeSinceLossInfo = TimeSinceLossInfo {
    timeframe: "1-6 months ago",
    typical_state: "raw grief, emotional volatility",
    common_needs: &[
        "coping strategies",
        "understanding grief process",
        "social support",
    ],
};

static INTERMEDIATE: TimeSinceLossInfo = TimeSinceLossInfo {
    timeframe: "6 months - 2 years ago",
    typical_state: "waves of grief, trying to rebuild",
    common_needs: &[
        "meaning-making",
        "identity reconstruction",
        "managing anniversary reactions",
    ],
};

static LONG_TERM: TimeSinceLossInfo = TimeSinceLossInfo {
    timeframe: "2+ years ago",
    typical_state: "integrated grief, occasional difficult moments",
    common_needs: &[
        "continued growth",
        "helping others",
        "managing unexpected grief surges",
    ],
};

impl TimeSinceLoss {
    pub const ALL: [TimeSinceLoss; 4] = [
        TimeSinceLoss::VeryRecent,
        TimeSinceLoss::Recent,
        TimeSinceLoss::Intermediate,
        TimeSinceLoss::LongTerm,
    ];

    pub fn info(&self) -> &'static TimeSinceLossInfo {
        match self {
            TimeSinceLoss::VeryRecent => &VERY_RECENT,
            TimeSinceLoss::Recent => &RECENT,
            TimeSinceLoss::Intermediate => &INTERMEDIATE,
            TimeSinceLoss::LongTerm => &LONG_TERM,
        }
    }
}

impl std::fmt::Display for TimeSinceLoss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeSinceLoss::VeryRecent => write!(f, "very_recent"),
            TimeSinceLoss::Recent => write!(f, "recent"),
            TimeSinceLoss::Intermediate => write!(f, "intermediate"),
            TimeSinceLoss::LongTerm => write!(f, "long_term"),
        }
    }
}

impl std::str::FromStr for TimeSinceLoss {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_recent" => Ok(TimeSinceLoss::VeryRecent),
            "recent" => Ok(TimeSinceLoss::Recent),
            "intermediate" => Ok(TimeSinceLoss::Intermediate),
            "long_term" => Ok(TimeSinceLoss::LongTerm),
            _ => Err(DomainError::unknown_key("time since loss", s)),
        }
    }
}
