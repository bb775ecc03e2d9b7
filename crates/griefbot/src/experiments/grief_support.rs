//! Grief support interaction game
//!
//! A grieving person (player 1) and a service provider (player 2) exchange
//! messages. The grieving person decides how much to pay for support; the
//! provider decides effort and service quality.

use super::field::{Choices, FieldSpec, LIKERT_SCALE};
use super::page::{FormModel, PageSpec, PlayerContext};
use super::{Currency, GameDefinition};
use crate::domain::errors::DomainError;

pub const NAME_IN_URL: &str = "grief_support";
pub const PLAYERS_PER_GROUP: usize = 2;
pub const NUM_ROUNDS: u32 = 3;
pub const INITIAL_BUDGET: Currency = 100;
/// How much more effective professional help is
pub const EFFORT_MULTIPLIER: Currency = 2;
/// Cost to the provider per effort point
pub const EFFORT_COST: Currency = 5;
pub const MAX_SCALE: i64 = 10;

pub const GRIEVING_PERSON: usize = 1;
pub const SERVICE_PROVIDER: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GriefGroup {
    pub initial_message: String,
    pub response_message: String,
    pub final_message: String,
    pub payment_amount: Currency,
    pub effort_level: i64,
    pub service_quality: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GriefPayoffs {
    pub grieving_person: Currency,
    pub service_provider: Currency,
}

pub fn support_received(group: &GriefGroup) -> Currency {
    (group.service_quality + group.effort_level) * EFFORT_MULTIPLIER
}

pub fn effort_cost(group: &GriefGroup) -> Currency {
    group.effort_level * EFFORT_COST
}

pub fn validate_group(group: &GriefGroup) -> Result<(), DomainError> {
    if !(0..=INITIAL_BUDGET).contains(&group.payment_amount) {
        return Err(DomainError::Validation(format!(
            "payment_amount must be between 0 and {}, got {}",
            INITIAL_BUDGET, group.payment_amount
        )));
    }
    for (name, value) in [
        ("effort_level", group.effort_level),
        ("service_quality", group.service_quality),
    ] {
        if !(0..=MAX_SCALE).contains(&value) {
            return Err(DomainError::Validation(format!(
                "{} must be between 0 and {}, got {}",
                name, MAX_SCALE, value
            )));
        }
    }
    Ok(())
}

/// Runs once both players reached the results wait page
pub fn set_payoffs(group: &GriefGroup) -> GriefPayoffs {
    GriefPayoffs {
        grieving_person: INITIAL_BUDGET - group.payment_amount + support_received(group),
        service_provider: group.payment_amount - effort_cost(group),
    }
}

/// Well-being accumulated over rounds, indexed by `id_in_group - 1`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WellBeing(pub [Currency; PLAYERS_PER_GROUP]);

impl WellBeing {
    pub fn add(&mut self, payoffs: GriefPayoffs) {
        self.0[GRIEVING_PERSON - 1] += payoffs.grieving_person;
        self.0[SERVICE_PROVIDER - 1] += payoffs.service_provider;
    }

    /// `None` for an id outside the group
    pub fn of(&self, id_in_group: usize) -> Option<Currency> {
        id_in_group
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .copied()
    }
}

fn first_round(player: &PlayerContext) -> bool {
    player.round_number == 1
}

fn provider_first_round(player: &PlayerContext) -> bool {
    player.id_in_group == SERVICE_PROVIDER && player.round_number == 1
}

fn grieving_person(player: &PlayerContext) -> bool {
    player.id_in_group == GRIEVING_PERSON
}

fn service_provider(player: &PlayerContext) -> bool {
    player.id_in_group == SERVICE_PROVIDER
}

fn last_round(player: &PlayerContext) -> bool {
    player.round_number == NUM_ROUNDS
}

pub fn definition() -> GameDefinition {
    let group_fields = vec![
        FieldSpec::long_string("initial_message")
            .label("Please enter your initial message to the grief-stricken person:")
            .blank(),
        FieldSpec::long_string("response_message")
            .label("Please enter your response to the service provider:")
            .blank(),
        FieldSpec::long_string("final_message")
            .label("Please enter your final message:")
            .blank(),
        FieldSpec::currency("payment_amount")
            .label("How much are you willing to pay for support services (0 to 100):")
            .min(0.0)
            .max(INITIAL_BUDGET as f64),
        FieldSpec::integer("effort_level")
            .label("How much effort will you put into providing support (0 = minimal, 10 = maximum):")
            .min(0.0)
            .max(MAX_SCALE as f64),
        FieldSpec::integer("service_quality")
            .label("What quality of service will you provide (0 = minimal, 10 = exceptional):")
            .min(0.0)
            .max(MAX_SCALE as f64),
    ];

    let player_fields = vec![
        FieldSpec::currency("well_being"),
        FieldSpec::integer("comprehension_check")
            .label("What is the role of payment in this interaction?")
            .choices(Choices::Coded(&[
                (1, "It only benefits the service provider"),
                (2, "It only benefits the grief-stricken person"),
                (
                    3,
                    "It enables better support services, potentially benefiting both parties",
                ),
            ])),
        FieldSpec::integer("manipulation_check")
            .label("What was your role in the experiment?")
            .choices(Choices::Coded(&[
                (1, "Grief-stricken person"),
                (2, "Service provider"),
            ])),
        FieldSpec::integer("empathy")
            .label("I can easily understand how others are feeling.")
            .choices(Choices::Coded(LIKERT_SCALE)),
        FieldSpec::integer("support_seeking")
            .label("I am comfortable seeking help from others when I need it.")
            .choices(Choices::Coded(LIKERT_SCALE)),
        FieldSpec::integer("helping_motivation")
            .label("I am motivated to help others who are going through difficult times.")
            .choices(Choices::Coded(LIKERT_SCALE)),
        FieldSpec::integer("professional_trust")
            .label("I believe professional service providers genuinely care about helping people.")
            .choices(Choices::Coded(LIKERT_SCALE)),
        FieldSpec::long_string("feedback")
            .label("Do you have any feedback about this interaction that you want to share?")
            .blank(),
    ];

    let pages = vec![
        PageSpec::page("Introduction").shown_when(first_round),
        PageSpec::page("InitialMessage")
            .form(FormModel::Group, &["initial_message"])
            .shown_when(provider_first_round),
        PageSpec::wait_page("MessageWaitPage").shown_when(first_round),
        PageSpec::page("Response")
            .form(FormModel::Group, &["response_message", "payment_amount"])
            .shown_when(grieving_person),
        PageSpec::wait_page("ServiceWaitPage"),
        PageSpec::page("ServiceProvision")
            .form(
                FormModel::Group,
                &["effort_level", "service_quality", "final_message"],
            )
            .shown_when(service_provider),
        PageSpec::payoff_wait_page("ResultsWaitPage"),
        PageSpec::page("Results"),
        PageSpec::page("Checks")
            .form(
                FormModel::Player,
                &[
                    "comprehension_check",
                    "manipulation_check",
                    "empathy",
                    "support_seeking",
                    "helping_motivation",
                    "professional_trust",
                    "feedback",
                ],
            )
            .shown_when(last_round),
        PageSpec::page("Thanks").shown_when(last_round),
    ];

    GameDefinition {
        name_in_url: NAME_IN_URL,
        description: "A grief-stricken person and a service provider chat; the grieving person decides what to pay, the provider how much effort to put in.",
        players_per_group: Some(PLAYERS_PER_GROUP),
        num_rounds: NUM_ROUNDS,
        group_fields,
        player_fields,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::page::page_sequence_for;

    #[test]
    fn test_payoffs() {
        let group = GriefGroup {
            payment_amount: 30,
            effort_level: 6,
            service_quality: 8,
            ..Default::default()
        };
        assert!(validate_group(&group).is_ok());

        let payoffs = set_payoffs(&group);
        // 100 - 30 + (8 + 6) * 2
        assert_eq!(payoffs.grieving_person, 98);
        // 30 - 6 * 5
        assert_eq!(payoffs.service_provider, 0);
    }

    #[test]
    fn test_effort_out_of_range() {
        let group = GriefGroup {
            effort_level: 11,
            ..Default::default()
        };
        assert!(validate_group(&group).is_err());
    }

    #[test]
    fn test_well_being_accumulates() {
        let mut well_being = WellBeing::default();
        let group = GriefGroup {
            payment_amount: 50,
            effort_level: 10,
            service_quality: 10,
            ..Default::default()
        };
        well_being.add(set_payoffs(&group));
        well_being.add(set_payoffs(&group));
        assert_eq!(well_being.of(GRIEVING_PERSON), Some(2 * (100 - 50 + 40)));
        assert_eq!(well_being.of(SERVICE_PROVIDER), Some(0));
    }

    #[test]
    fn test_well_being_of_unknown_id() {
        let totals = WellBeing::default();
        assert_eq!(totals.of(GRIEVING_PERSON), Some(0));
        assert_eq!(totals.of(0), None);
        assert_eq!(totals.of(SERVICE_PROVIDER + 1), None);
    }

    #[test]
    fn test_role_pages() {
        let game = definition();
        let provider: Vec<&str> =
            page_sequence_for(&game.pages, &PlayerContext::new(SERVICE_PROVIDER, 1))
                .iter()
                .map(|p| p.name)
                .collect();
        assert!(provider.contains(&"InitialMessage"));
        assert!(provider.contains(&"ServiceProvision"));
        assert!(!provider.contains(&"Response"));
    }
}
