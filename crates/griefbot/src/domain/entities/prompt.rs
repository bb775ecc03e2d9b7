//! Prompt - Named prompt overrides for the bot library
//!
//! Slots that are not set fall back to the library's own instructions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::Profile;

/// Well-known prompt slot names understood by the bot library
pub mod slots {
    pub const SYSTEM: &str = "system";
    pub const ANALYZE_FIRST_PAGE_NO_Q: &str = "analyze_first_page_no_q";
    pub const ANALYZE_PAGE_Q: &str = "analyze_page_q";
}

/// Mapping from prompt slot to literal text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptOverrides(BTreeMap<String, String>);

impl PromptOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(slot.into(), text.into());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Persona overrides for a single participant slot
pub fn build_persona_prompts<R: Rng + ?Sized>(profile: &Profile, rng: &mut R) -> PromptOverrides {
    let background = profile.background_prompt(rng);
    let guidance = profile.response_guidance(rng);
    let relationship = profile.loss_type.info().relationship;
    let timeframe = profile.time_since_loss.info().timeframe;

    let system = format!(
        "You are participating in an online experiment about grief support interactions. \n\
         \n\
         {background}\n\
         \n\
         Throughout this experiment:\n\
         - Stay in character as {name}\n\
         - Draw on your specific experiences and emotional state  \n\
         - Respond authentically based on your personality and circumstances\n\
         - Consider your current needs and what kind of support would be most helpful\n\
         \n\
         When making decisions about payment or responses, think about:\n\
         - Your current emotional state and needs\n\
         - Your financial situation and what feels reasonable to pay\n\
         - Whether the service provider seems trustworthy and understanding\n\
         - What kind of support would actually help you right now\n\
         \n\
         Be genuine in your interactions, but remember this is an experiment designed to study \
         support-seeking behavior.",
        background = background,
        name = profile.name,
    );

    let first_page = format!(
        "Analyze this webpage as {name}, someone who lost their {relationship} {timeframe}. \n\
         \n\
         Read the content carefully and understand what this experiment is about. You are looking \
         for {support} support and tend to be {personality} in your communication style.\n\
         \n\
         What do you see on this page? What should you do next?",
        name = profile.name,
        relationship = relationship,
        timeframe = timeframe,
        support = profile.support_preference,
        personality = profile.personality_trait,
    );

    let question_page = format!(
        "As {name}, analyze this page and the questions being asked. \n\
         \n\
         Remember your situation: You lost your {relationship} {timeframe} under {circumstances} \
         circumstances. You are seeking {support} support.\n\
         \n\
         {guidance}\n\
         \n\
         Answer the questions authentically based on your character and current emotional state.",
        name = profile.name,
        relationship = relationship,
        timeframe = timeframe,
        circumstances = profile.loss_circumstances.info().description,
        support = profile.support_preference,
        guidance = guidance,
    );

    PromptOverrides::new()
        .with(slots::SYSTEM, system)
        .with(slots::ANALYZE_FIRST_PAGE_NO_Q, first_page)
        .with(slots::ANALYZE_PAGE_Q, question_page)
}

/// Single system override applied to every bot in a session
pub fn build_session_prompts(profile: &Profile) -> PromptOverrides {
    let mut concerns: Vec<&str> = profile
        .loss_type
        .info()
        .common_concerns
        .iter()
        .take(2)
        .copied()
        .collect();
    if let Some(challenge) = profile.custom_details.get("main_challenge") {
        concerns.push(challenge);
    }
    let background = profile
        .custom_details
        .get("specific_situation")
        .cloned()
        .unwrap_or_else(|| {
            format!(
                "Lost {} {} {}",
                profile.loss_type.info().relationship,
                profile.loss_circumstances.info().description,
                profile.time_since_loss.info().timeframe
            )
        });
    let personality = profile.personality_trait.info();

    let system = format!(
        "You are {name}, a {age}-year-old person participating in a grief support interaction experiment.\n\
         \n\
         Background: {background}\n\
         Personality: {trait_key} - {style}\n\
         Support needed: {support}\n\
         Main concerns: {concerns}\n\
         \n\
         Respond authentically as this person throughout the experiment. Make decisions about \
         payment and support based on your situation and personality.",
        name = profile.name,
        age = profile.age,
        background = background,
        trait_key = profile.personality_trait,
        style = personality.communication_style,
        support = profile.support_preference,
        concerns = concerns.join(", "),
    );

    PromptOverrides::new().with(slots::SYSTEM, system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::get_predefined_profile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_persona_prompts_fill_three_slots() {
        let profile = get_predefined_profile(0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let prompts = build_persona_prompts(&profile, &mut rng);

        assert_eq!(prompts.len(), 3);
        let system = prompts.get(slots::SYSTEM).unwrap();
        assert!(system.contains("Stay in character as Sarah"));
        assert!(system.contains("45-year-old"));
        assert!(prompts
            .get(slots::ANALYZE_FIRST_PAGE_NO_Q)
            .unwrap()
            .contains("emotional support"));
        assert!(prompts
            .get(slots::ANALYZE_PAGE_Q)
            .unwrap()
            .contains("When responding to the service provider's introduction"));
    }

    #[test]
    fn test_page_prompts_use_descriptive_text() {
        let profile = get_predefined_profile(0).unwrap();
        let prompts = build_persona_prompts(&profile, &mut StdRng::seed_from_u64(7));

        let first_page = prompts.get(slots::ANALYZE_FIRST_PAGE_NO_Q).unwrap();
        assert!(first_page.contains("someone who lost their spouse/partner 1-6 months ago"));
        assert!(!first_page.contains("recent"));

        let question_page = prompts.get(slots::ANALYZE_PAGE_Q).unwrap();
        assert!(question_page.contains(
            "You lost your spouse/partner 1-6 months ago under unexpected and sudden \
             (accident, heart attack, etc.) circumstances"
        ));
    }

    #[test]
    fn test_persona_prompts_deterministic_under_seed() {
        let profile = get_predefined_profile(1).unwrap();
        let a = build_persona_prompts(&profile, &mut StdRng::seed_from_u64(9));
        let b = build_persona_prompts(&profile, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_session_prompts_use_custom_details() {
        let profile = get_predefined_profile(4).unwrap();
        let prompts = build_session_prompts(&profile);

        assert_eq!(prompts.slots().collect::<Vec<_>>(), vec![slots::SYSTEM]);
        let system = prompts.get(slots::SYSTEM).unwrap();
        assert!(system.contains("Twin brother died by suicide"));
        assert!(system.contains("Survivor's guilt and family blame dynamics"));
    }

    #[test]
    fn test_overrides_serialize_as_flat_object() {
        let prompts = PromptOverrides::new().with(slots::SYSTEM, "hello");
        let json = serde_json::to_value(&prompts).unwrap();
        assert_eq!(json, serde_json::json!({ "system": "hello" }));
    }
}
