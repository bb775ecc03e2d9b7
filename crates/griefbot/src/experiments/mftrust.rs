//! Framed trust game with a message option
//!
//! Variant of Berg, Dickhaut and McCabe (1995). The manager (player 2) may
//! message the investor (player 1) before the first investment decision.
//! The investor sends part of the endowment, the amount is multiplied, and
//! the manager decides how much to send back.

use super::field::{Choices, FieldSpec, AGREEMENT_SCALE};
use super::page::{FormModel, PageSpec, PlayerContext};
use super::{Currency, GameDefinition};
use crate::domain::errors::DomainError;

pub const NAME_IN_URL: &str = "mftrust";
pub const PLAYERS_PER_GROUP: usize = 2;
pub const NUM_ROUNDS: u32 = 3;
pub const ENDOWMENT: Currency = 100;
pub const MULTIPLIER: Currency = 3;

pub const INVESTOR: usize = 1;
pub const MANAGER: usize = 2;

/// Group record of one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustGroup {
    pub message: String,
    pub sent_amount: Currency,
    pub sent_back_amount: Currency,
}

/// Round payoffs of both roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustPayoffs {
    pub investor: Currency,
    pub manager: Currency,
}

/// Upper bound of the amount the manager can return
pub fn sent_back_amount_max(sent_amount: Currency) -> Currency {
    sent_amount * MULTIPLIER
}

/// Trust game payoff formula
pub fn compute_payoffs(
    endowment: Currency,
    multiplier: Currency,
    sent: Currency,
    returned: Currency,
) -> TrustPayoffs {
    TrustPayoffs {
        investor: endowment - sent + returned,
        manager: sent * multiplier - returned,
    }
}

/// Check submitted amounts against the declared bounds
pub fn validate_group(group: &TrustGroup) -> Result<(), DomainError> {
    if !(0..=ENDOWMENT).contains(&group.sent_amount) {
        return Err(DomainError::Validation(format!(
            "sent_amount must be between 0 and {}, got {}",
            ENDOWMENT, group.sent_amount
        )));
    }
    let max_back = sent_back_amount_max(group.sent_amount);
    if !(0..=max_back).contains(&group.sent_back_amount) {
        return Err(DomainError::Validation(format!(
            "sent_back_amount must be between 0 and {}, got {}",
            max_back, group.sent_back_amount
        )));
    }
    Ok(())
}

/// Runs once both players reached the results wait page
///
/// Nothing sent means nothing can come back.
pub fn set_payoffs(group: &mut TrustGroup) -> TrustPayoffs {
    if group.sent_amount == 0 {
        group.sent_back_amount = 0;
    }
    compute_payoffs(ENDOWMENT, MULTIPLIER, group.sent_amount, group.sent_back_amount)
}

/// Wealth accumulated over rounds, indexed by `id_in_group - 1`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wealth(pub [Currency; PLAYERS_PER_GROUP]);

impl Wealth {
    pub fn add(&mut self, payoffs: TrustPayoffs) {
        self.0[INVESTOR - 1] += payoffs.investor;
        self.0[MANAGER - 1] += payoffs.manager;
    }

    /// `None` for an id outside the group
    pub fn of(&self, id_in_group: usize) -> Option<Currency> {
        id_in_group
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .copied()
    }
}

/// Form fields of the send-back page; empty when nothing was sent
pub fn send_back_form_fields(sent_amount: Currency) -> &'static [&'static str] {
    if sent_amount > 0 {
        &["sent_back_amount"]
    } else {
        &[]
    }
}

fn first_round(player: &PlayerContext) -> bool {
    player.round_number == 1
}

fn manager_first_round(player: &PlayerContext) -> bool {
    player.id_in_group == MANAGER && player.round_number == 1
}

fn investor(player: &PlayerContext) -> bool {
    player.id_in_group == INVESTOR
}

fn manager(player: &PlayerContext) -> bool {
    player.id_in_group == MANAGER
}

fn last_round(player: &PlayerContext) -> bool {
    player.round_number == NUM_ROUNDS
}

pub fn definition() -> GameDefinition {
    let group_fields = vec![
        FieldSpec::long_string("message")
            .label("Please enter your message to the investor:")
            .blank(),
        FieldSpec::currency("sent_amount")
            .label("Please enter an amount from 0 to 100:")
            .min(0.0)
            .max(ENDOWMENT as f64),
        FieldSpec::currency("sent_back_amount")
            .min(0.0)
            .max((ENDOWMENT * MULTIPLIER) as f64),
    ];

    let player_fields = vec![
        FieldSpec::currency("wealth"),
        FieldSpec::integer("comprehension_check")
            .label("What is the role of the multiplier in the experiment?")
            .choices(Choices::Coded(&[
                (1, "It increases the private wealth of the investor"),
                (2, "It increases the private wealth of the manager"),
                (
                    3,
                    "It increases the invested amount, potentially benefiting both the investor and the manager",
                ),
            ])),
        FieldSpec::integer("manipulation_check")
            .label("What was your role in the experiment?")
            .choices(Choices::Coded(&[(1, "Investor"), (2, "Manager")])),
        FieldSpec::integer("altruism")
            .label("I am willing to help others even if I expect that I will never meet them again.")
            .choices(Choices::Coded(AGREEMENT_SCALE)),
        FieldSpec::integer("trust")
            .label("I believe that most people can be trusted.")
            .choices(Choices::Coded(AGREEMENT_SCALE)),
        FieldSpec::integer("reciprocity")
            .label("I am willing to incur costs to help someone who has helped me before.")
            .choices(Choices::Coded(AGREEMENT_SCALE)),
        FieldSpec::integer("negative_reciprocity")
            .label("If someone puts me in a difficult position, I would do the same to that person.")
            .choices(Choices::Coded(AGREEMENT_SCALE)),
        FieldSpec::long_string("feedback")
            .label("Do you have any feedback that you want to share?")
            .blank(),
    ];

    let pages = vec![
        PageSpec::page("Introduction").shown_when(first_round),
        PageSpec::page("Message")
            .form(FormModel::Group, &["message"])
            .shown_when(manager_first_round),
        PageSpec::wait_page("SendWaitPage").shown_when(first_round),
        PageSpec::page("Send")
            .form(FormModel::Group, &["sent_amount"])
            .shown_when(investor),
        PageSpec::wait_page("SendBackWaitPage"),
        PageSpec::page("SendBack")
            .form(FormModel::Group, &["sent_back_amount"])
            .shown_when(manager),
        PageSpec::payoff_wait_page("ResultsWaitPage"),
        PageSpec::page("Results"),
        PageSpec::page("Checks")
            .form(
                FormModel::Player,
                &[
                    "comprehension_check",
                    "manipulation_check",
                    "altruism",
                    "trust",
                    "reciprocity",
                    "negative_reciprocity",
                    "feedback",
                ],
            )
            .shown_when(last_round),
        PageSpec::page("Thanks").shown_when(last_round),
    ];

    GameDefinition {
        name_in_url: NAME_IN_URL,
        description: "A framed trust game in which the manager can message the investor before the first investment decision.",
        players_per_group: Some(PLAYERS_PER_GROUP),
        num_rounds: NUM_ROUNDS,
        group_fields,
        player_fields,
        pages,
    }
}
