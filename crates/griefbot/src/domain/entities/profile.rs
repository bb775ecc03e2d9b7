//! Profile - Synthesized grief persona for a bot participant
//!
//! Pure domain entity. Randomness is always supplied by the caller so a
//! seeded RNG reproduces the same persona and prompt text.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    LossCircumstance, LossType, PersonalityTrait, SupportPreference, TimeSinceLoss,
};

/// Names used when a profile does not specify one
pub const DEFAULT_NAMES: [&str; 8] = [
    "Alex", "Sam", "Jordan", "Casey", "Riley", "Morgan", "Taylor", "Avery",
];

/// Concerns sampled into the background narrative
const CONCERN_SAMPLE: usize = 3;
/// Typical requests and emotions quoted from the head of each list
const REQUEST_HEAD: usize = 2;
const EMOTION_HEAD: usize = 2;

/// Profile - A grief persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub loss_type: LossType,
    pub loss_circumstances: LossCircumstance,
    pub time_since_loss: TimeSinceLoss,
    pub support_preference: SupportPreference,
    pub personality_trait: PersonalityTrait,
    #[serde(default)]
    pub custom_details: BTreeMap<String, String>,
}

/// Explicit profile settings, every field optional
///
/// Missing fields are generated when the profile is built:
/// - taxonomy keys: uniform draw from the taxonomy
/// - `age`: uniform within the loss type's typical age range
/// - `name`: uniform from [`DEFAULT_NAMES`]
/// - `custom_details`: empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_circumstances: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_since_loss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality_trait: Option<String>,
    #[serde(default)]
    pub custom_details: BTreeMap<String, String>,
}

/// Uniform pick from a non-empty table
fn pick<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> T {
    items[rng.gen_range(0..items.len())]
}

fn parse_key<T>(value: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    value.map(str::parse).transpose()
}

impl Profile {
    /// Build a profile from overrides, filling the gaps with random defaults
    pub fn from_overrides<R: Rng + ?Sized>(
        overrides: &ProfileOverrides,
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        let loss_type = parse_key::<LossType>(overrides.loss_type.as_deref())?;
        let loss_circumstances =
            parse_key::<LossCircumstance>(overrides.loss_circumstances.as_deref())?;
        let time_since_loss = parse_key::<TimeSinceLoss>(overrides.time_since_loss.as_deref())?;
        let support_preference =
            parse_key::<SupportPreference>(overrides.support_preference.as_deref())?;
        let personality_trait =
            parse_key::<PersonalityTrait>(overrides.personality_trait.as_deref())?;

        if let Some(name) = &overrides.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("Profile name must not be empty".into()));
            }
        }
        if overrides.age == Some(0) {
            return Err(DomainError::Validation("Profile age must be positive".into()));
        }

        let mut profile = Self::draw(
            loss_type,
            loss_circumstances,
            time_since_loss,
            support_preference,
            personality_trait,
            overrides.age,
            overrides.name.clone(),
            rng,
        );
        profile.custom_details = overrides.custom_details.clone();
        Ok(profile)
    }

    /// Fully random profile
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::draw(None, None, None, None, None, None, None, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw<R: Rng + ?Sized>(
        loss_type: Option<LossType>,
        loss_circumstances: Option<LossCircumstance>,
        time_since_loss: Option<TimeSinceLoss>,
        support_preference: Option<SupportPreference>,
        personality_trait: Option<PersonalityTrait>,
        age: Option<u32>,
        name: Option<String>,
        rng: &mut R,
    ) -> Self {
        let loss_type = loss_type.unwrap_or_else(|| pick(&LossType::ALL, rng));
        let loss_circumstances =
            loss_circumstances.unwrap_or_else(|| pick(&LossCircumstance::ALL, rng));
        let time_since_loss = time_since_loss.unwrap_or_else(|| pick(&TimeSinceLoss::ALL, rng));
        let support_preference =
            support_preference.unwrap_or_else(|| pick(&SupportPreference::ALL, rng));
        let personality_trait =
            personality_trait.unwrap_or_else(|| pick(&PersonalityTrait::ALL, rng));

        let age = age.unwrap_or_else(|| {
            let (low, high) = loss_type.info().typical_age_range;
            rng.gen_range(low..=high)
        });
        let name = name.unwrap_or_else(|| pick(&DEFAULT_NAMES, rng).to_string());

        Self {
            name,
            age,
            loss_type,
            loss_circumstances,
            time_since_loss,
            support_preference,
            personality_trait,
            custom_details: BTreeMap::new(),
        }
    }

    /// Narrative the bot adopts as its persona
    pub fn background_prompt<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let loss = self.loss_type.info();
        let circumstances = self.loss_circumstances.info();
        let time = self.time_since_loss.info();
        let support = self.support_preference.info();
        let personality = self.personality_trait.info();

        let concerns: Vec<&str> = loss
            .common_concerns
            .choose_multiple(rng, CONCERN_SAMPLE.min(loss.common_concerns.len()))
            .copied()
            .collect();
        let requests = head(support.typical_requests, REQUEST_HEAD);
        let emotions = head(circumstances.typical_emotions, EMOTION_HEAD);

        format!(
            "You are {name}, a {age}-year-old person who lost your {relationship} {circumstance} {timeframe}. \n\
             \n\
             Your loss circumstances: The death was {circumstance}. You are currently experiencing {state}.\n\
             \n\
             Your personality: You are {personality}. Your communication style: {style}.\n\
             \n\
             Your primary concerns include: {concerns}\n\
             \n\
             You are seeking {focus}. You typically need: {requests}.\n\
             \n\
             Your emotional state often includes: {emotions}.\n\
             \n\
             When interacting with the service provider, respond authentically as this person would, \
             drawing on these experiences and needs. Be genuine about your grief while staying true \
             to your personality style.",
            name = self.name,
            age = self.age,
            relationship = loss.relationship,
            circumstance = circumstances.description,
            timeframe = time.timeframe,
            state = time.typical_state,
            personality = personality.description,
            style = personality.communication_style,
            concerns = concerns.join(", "),
            focus = support.focus,
            requests = requests,
            emotions = emotions,
        )
    }

    /// Guidance for answering the service provider's opening message
    pub fn response_guidance<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let circumstances = self.loss_circumstances.info();
        let phrase = circumstances
            .common_phrases
            .choose(rng)
            .copied()
            .unwrap_or_default();

        format!(
            "When responding to the service provider's introduction, consider:\n\
             - You are looking for {focus}\n\
             - You might use phrases like: {phrase}\n\
             - Your main concerns right now are: {needs}\n\
             - Communicate in a way that reflects your {personality} personality",
            focus = self.support_preference.info().focus,
            phrase = phrase,
            needs = self.time_since_loss.info().common_needs.join(", "),
            personality = self.personality_trait.info().description,
        )
    }

    /// Operator-facing description of the profile
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Name: {}, Age: {}", self.name, self.age),
            format!("Lost: {} ({})", self.loss_type, self.loss_circumstances),
            format!("Time since: {}", self.time_since_loss),
            format!("Seeking: {} support", self.support_preference),
            format!("Personality: {}", self.personality_trait),
        ];
        if !self.custom_details.is_empty() {
            let details: Vec<String> = self
                .custom_details
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            lines.push(format!("Details: {}", details.join("; ")));
        }
        lines
    }
}

fn head(items: &[&str], count: usize) -> String {
    items.iter().take(count).copied().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed(loss_type: LossType) -> Profile {
        Profile {
            name: "Test".to_string(),
            age: 40,
            loss_type,
            loss_circumstances: LossCircumstance::Sudden,
            time_since_loss: TimeSinceLoss::Recent,
            support_preference: SupportPreference::Emotional,
            personality_trait: PersonalityTrait::Expressive,
            custom_details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_background_contains_every_taxonomy_fragment() {
        let mut rng = StdRng::seed_from_u64(7);

        for loss_type in LossType::ALL {
            let text = fixed(loss_type).background_prompt(&mut rng);
            assert!(text.contains(loss_type.info().relationship), "{}", loss_type);
        }
        for circumstance in LossCircumstance::ALL {
            let profile = Profile {
                loss_circumstances: circumstance,
                ..fixed(LossType::Parent)
            };
            let text = profile.background_prompt(&mut rng);
            assert!(text.contains(circumstance.info().description), "{}", circumstance);
        }
        for time in TimeSinceLoss::ALL {
            let profile = Profile {
                time_since_loss: time,
                ..fixed(LossType::Parent)
            };
            let text = profile.background_prompt(&mut rng);
            assert!(text.contains(time.info().timeframe), "{}", time);
        }
        for support in SupportPreference::ALL {
            let profile = Profile {
                support_preference: support,
                ..fixed(LossType::Parent)
            };
            let text = profile.background_prompt(&mut rng);
            assert!(text.contains(support.info().focus), "{}", support);
        }
        for personality in PersonalityTrait::ALL {
            let profile = Profile {
                personality_trait: personality,
                ..fixed(LossType::Parent)
            };
            let text = profile.background_prompt(&mut rng);
            assert!(text.contains(personality.info().description), "{}", personality);
        }
    }

    #[test]
    fn test_partial_overrides_filled_from_random_defaults() {
        let mut rng = StdRng::seed_from_u64(11);
        let overrides = ProfileOverrides {
            name: Some("Chris".to_string()),
            loss_type: Some("pet".to_string()),
            personality_trait: Some("expressive".to_string()),
            ..Default::default()
        };

        let profile = Profile::from_overrides(&overrides, &mut rng).unwrap();

        assert_eq!(profile.name, "Chris");
        assert_eq!(profile.loss_type, LossType::Pet);
        assert_eq!(profile.personality_trait, PersonalityTrait::Expressive);
        let (low, high) = LossType::Pet.info().typical_age_range;
        assert!(profile.age >= low && profile.age <= high);
        assert!(LossCircumstance::ALL.contains(&profile.loss_circumstances));
        assert!(TimeSinceLoss::ALL.contains(&profile.time_since_loss));
        assert!(SupportPreference::ALL.contains(&profile.support_preference));
        assert!(profile.custom_details.is_empty());

        // Round-trips through the taxonomy parsers
        assert_eq!(
            profile.loss_circumstances.to_string().parse::<LossCircumstance>().unwrap(),
            profile.loss_circumstances
        );
    }

    #[test]
    fn test_unknown_key_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let overrides = ProfileOverrides {
            loss_type: Some("cousin".to_string()),
            ..Default::default()
        };

        let err = Profile::from_overrides(&overrides, &mut rng).unwrap_err();
        match err {
            DomainError::UnknownKey { category, key } => {
                assert_eq!(category, "loss type");
                assert_eq!(key, "cousin");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let overrides = ProfileOverrides {
            age: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Profile::from_overrides(&overrides, &mut rng),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_random_default_name_comes_from_pool() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            let profile = Profile::random(&mut rng);
            assert!(DEFAULT_NAMES.contains(&profile.name.as_str()));
        }
    }

    #[test]
    fn test_concerns_sampled_without_replacement() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = fixed(LossType::Child).background_prompt(&mut rng);
        let line = text
            .lines()
            .find(|l| l.starts_with("Your primary concerns include: "))
            .unwrap();
        let concerns: Vec<&str> = line
            .trim_start_matches("Your primary concerns include: ")
            .split(", ")
            .collect();
        assert_eq!(concerns.len(), 3);
        for (i, c) in concerns.iter().enumerate() {
            assert!(!concerns[i + 1..].contains(c));
        }
    }

    #[test]
    fn test_response_guidance_lists_needs() {
        let mut rng = StdRng::seed_from_u64(5);
        let profile = fixed(LossType::Spouse);
        let guidance = profile.response_guidance(&mut rng);

        assert!(guidance.contains("emotional processing and validation"));
        assert!(guidance.contains("coping strategies, understanding grief process, social support"));
        assert!(LossCircumstance::Sudden
            .info()
            .common_phrases
            .iter()
            .any(|p| guidance.contains(p)));
    }
}
