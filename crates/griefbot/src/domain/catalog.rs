//! Profile Catalog
//!
//! Category lookups over the taxonomy tables and the fixed set of
//! predefined personas used for comparable runs.

use rand::Rng;
use std::collections::BTreeMap;

use crate::domain::entities::Profile;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    LossCircumstance, LossType, PersonalityTrait, SupportPreference, TimeSinceLoss,
};

/// The five taxonomies a profile is composed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyCategory {
    LossType,
    LossCircumstances,
    TimeSinceLoss,
    SupportPreference,
    PersonalityTrait,
}

impl TaxonomyCategory {
    pub const ALL: [TaxonomyCategory; 5] = [
        TaxonomyCategory::LossType,
        TaxonomyCategory::LossCircumstances,
        TaxonomyCategory::TimeSinceLoss,
        TaxonomyCategory::SupportPreference,
        TaxonomyCategory::PersonalityTrait,
    ];

    /// Every key of the taxonomy, in table order
    pub fn keys(&self) -> Vec<String> {
        match self {
            Self::LossType => LossType::ALL.iter().map(ToString::to_string).collect(),
            Self::LossCircumstances => {
                LossCircumstance::ALL.iter().map(ToString::to_string).collect()
            }
            Self::TimeSinceLoss => TimeSinceLoss::ALL.iter().map(ToString::to_string).collect(),
            Self::SupportPreference => {
                SupportPreference::ALL.iter().map(ToString::to_string).collect()
            }
            Self::PersonalityTrait => {
                PersonalityTrait::ALL.iter().map(ToString::to_string).collect()
            }
        }
    }
}

impl std::fmt::Display for TaxonomyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LossType => write!(f, "loss_type"),
            Self::LossCircumstances => write!(f, "loss_circumstances"),
            Self::TimeSinceLoss => write!(f, "time_since_loss"),
            Self::SupportPreference => write!(f, "support_preference"),
            Self::PersonalityTrait => write!(f, "personality_trait"),
        }
    }
}

impl std::str::FromStr for TaxonomyCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loss_type" => Ok(Self::LossType),
            "loss_circumstances" => Ok(Self::LossCircumstances),
            "time_since_loss" => Ok(Self::TimeSinceLoss),
            "support_preference" => Ok(Self::SupportPreference),
            "personality_trait" => Ok(Self::PersonalityTrait),
            _ => Err(DomainError::unknown_key("category", s)),
        }
    }
}

/// Descriptive text of one taxonomy entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The phrase substituted into the persona background
    pub text: &'static str,
    /// Example phrases (concerns, phrases, needs, requests, style)
    pub examples: &'static [&'static str],
}

/// Look up the fragment for `key` within `category`
pub fn lookup(category: TaxonomyCategory, key: &str) -> Result<Fragment, DomainError> {
    let fragment = match category {
        TaxonomyCategory::LossType => {
            let info = key.parse::<LossType>()?.info();
            Fragment {
                text: info.relationship,
                examples: info.common_concerns,
            }
        }
        TaxonomyCategory::LossCircumstances => {
            let info = key.parse::<LossCircumstance>()?.info();
            Fragment {
                text: info.description,
                examples: info.common_phrases,
            }
        }
        TaxonomyCategory::TimeSinceLoss => {
            let info = key.parse::<TimeSinceLoss>()?.info();
            Fragment {
                text: info.timeframe,
                examples: info.common_needs,
            }
        }
        TaxonomyCategory::SupportPreference => {
            let info = key.parse::<SupportPreference>()?.info();
            Fragment {
                text: info.focus,
                examples: info.typical_requests,
            }
        }
        TaxonomyCategory::PersonalityTrait => {
            let info = key.parse::<PersonalityTrait>()?.info();
            Fragment {
                text: info.description,
                examples: std::slice::from_ref(&info.communication_style),
            }
        }
    };
    Ok(fragment)
}

struct PredefinedProfile {
    name: &'static str,
    age: u32,
    loss_type: LossType,
    loss_circumstances: LossCircumstance,
    time_since_loss: TimeSinceLoss,
    support_preference: SupportPreference,
    personality_trait: PersonalityTrait,
    specific_situation: &'static str,
    main_challenge: &'static str,
}

impl PredefinedProfile {
    fn to_profile(&self) -> Profile {
        let mut custom_details = BTreeMap::new();
        custom_details.insert(
            "specific_situation".to_string(),
            self.specific_situation.to_string(),
        );
        custom_details.insert("main_challenge".to_string(), self.main_challenge.to_string());

        Profile {
            name: self.name.to_string(),
            age: self.age,
            loss_type: self.loss_type,
            loss_circumstances: self.loss_circumstances,
            time_since_loss: self.time_since_loss,
            support_preference: self.support_preference,
            personality_trait: self.personality_trait,
            custom_details,
        }
    }
}

static PREDEFINED_PROFILES: [PredefinedProfile; 5] = [
    PredefinedProfile {
        name: "Sarah",
        age: 45,
        loss_type: LossType::Spouse,
        loss_circumstances: LossCircumstance::Sudden,
        time_since_loss: TimeSinceLoss::Recent,
        support_preference: SupportPreference::Emotional,
        personality_trait: PersonalityTrait::Expressive,
        specific_situation: "Lost husband in car accident, has two teenage children",
        main_challenge: "How to help children cope while dealing with own grief",
    },
    PredefinedProfile {
        name: "Michael",
        age: 28,
        loss_type: LossType::Parent,
        loss_circumstances: LossCircumstance::IllnessLong,
        time_since_loss: TimeSinceLoss::Intermediate,
        support_preference: SupportPreference::Practical,
        personality_trait: PersonalityTrait::Analytical,
        specific_situation: "Father died after 3-year cancer battle, inherited family business",
        main_challenge: "Managing business responsibilities while grieving",
    },
    PredefinedProfile {
        name: "Elena",
        age: 34,
        loss_type: LossType::Child,
        loss_circumstances: LossCircumstance::IllnessShort,
        time_since_loss: TimeSinceLoss::VeryRecent,
        support_preference: SupportPreference::Spiritual,
        personality_trait: PersonalityTrait::Spiritual,
        specific_situation: "5-year-old daughter died from leukemia after 6-month battle",
        main_challenge: "Questioning faith and finding meaning",
    },
    PredefinedProfile {
        name: "Robert",
        age: 67,
        loss_type: LossType::Spouse,
        loss_circumstances: LossCircumstance::IllnessLong,
        time_since_loss: TimeSinceLoss::LongTerm,
        support_preference: SupportPreference::Social,
        personality_trait: PersonalityTrait::Reserved,
        specific_situation:
            "Wife died 3 years ago after Alzheimer's, feeling ready to engage socially again",
        main_challenge: "Rebuilding social life and possibly dating again",
    },
    PredefinedProfile {
        name: "Maya",
        age: 22,
        loss_type: LossType::Sibling,
        loss_circumstances: LossCircumstance::Suicide,
        time_since_loss: TimeSinceLoss::Recent,
        support_preference: SupportPreference::Emotional,
        personality_trait: PersonalityTrait::Skeptical,
        specific_situation: "Twin brother died by suicide, family is struggling",
        main_challenge: "Survivor's guilt and family blame dynamics",
    },
];

/// Number of predefined profiles
pub fn predefined_count() -> usize {
    PREDEFINED_PROFILES.len()
}

/// Predefined profile by index
pub fn get_predefined_profile(index: usize) -> Result<Profile, DomainError> {
    PREDEFINED_PROFILES
        .get(index)
        .map(PredefinedProfile::to_profile)
        .ok_or(DomainError::ProfileIndexOutOfRange {
            index,
            max: PREDEFINED_PROFILES.len() - 1,
        })
}

/// Predefined profile at a random index
pub fn get_any_predefined_profile<R: Rng + ?Sized>(rng: &mut R) -> Profile {
    let index = rng.gen_range(0..PREDEFINED_PROFILES.len());
    PREDEFINED_PROFILES[index].to_profile()
}

pub fn get_all_predefined_profiles() -> Vec<Profile> {
    PREDEFINED_PROFILES
        .iter()
        .map(PredefinedProfile::to_profile)
        .collect()
}

pub fn get_random_profile<R: Rng + ?Sized>(rng: &mut R) -> Profile {
    Profile::random(rng)
}
