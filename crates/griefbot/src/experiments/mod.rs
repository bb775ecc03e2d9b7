//! Experiment Definitions
//!
//! Declarative game definitions served by the experiment framework: session
//! configs, record fields, page sequences and payoff formulas. Page
//! rendering, wait-page synchronisation and form handling belong to the
//! framework itself.

pub mod field;
pub mod grief_support;
pub mod mftrust;
pub mod page;
pub mod stakeholder;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

use crate::domain::errors::DomainError;
use field::FieldSpec;
use page::{page_sequence_for, PageSpec, PlayerContext};

/// Amounts are whole points
pub type Currency = i64;

/// Fields stored on every participant across apps
pub const PARTICIPANT_FIELDS: &[&str] = &["wealth", "part_id", "well_being"];

/// Entry of the framework's session config list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfig {
    pub name: &'static str,
    pub display_name: &'static str,
    pub app_sequence: &'static [&'static str],
    pub num_demo_participants: usize,
    pub real_world_currency_per_point: f64,
    pub participation_fee: f64,
}

static SESSION_CONFIGS: [SessionConfig; 3] = [
    SessionConfig {
        name: "mftrust",
        display_name: "A Framed Trust Game with Message Option",
        app_sequence: &["mftrust"],
        num_demo_participants: 2,
        real_world_currency_per_point: 1.0,
        participation_fee: 0.0,
    },
    SessionConfig {
        name: "grief_support",
        display_name: "Grief Support Interaction Game",
        app_sequence: &["grief_support"],
        num_demo_participants: 2,
        real_world_currency_per_point: 1.0,
        participation_fee: 0.0,
    },
    SessionConfig {
        name: "stakeholder",
        display_name: "A Stakeholder Game",
        app_sequence: &["stakeholder"],
        num_demo_participants: 1,
        real_world_currency_per_point: 1.0,
        participation_fee: 0.0,
    },
];

pub fn session_configs() -> &'static [SessionConfig] {
    &SESSION_CONFIGS
}

pub fn session_config(name: &str) -> Result<&'static SessionConfig, DomainError> {
    SESSION_CONFIGS
        .iter()
        .find(|config| config.name == name)
        .ok_or_else(|| DomainError::unknown_key("session config", name))
}

/// A game app: constants, record fields and page sequence
#[derive(Debug, Clone, Serialize)]
pub struct GameDefinition {
    pub name_in_url: &'static str,
    pub description: &'static str,
    /// `None` for single-player games
    pub players_per_group: Option<usize>,
    pub num_rounds: u32,
    pub group_fields: Vec<FieldSpec>,
    pub player_fields: Vec<FieldSpec>,
    pub pages: Vec<PageSpec>,
}

impl GameDefinition {
    pub fn group_field(&self, name: &str) -> Option<&FieldSpec> {
        self.group_fields.iter().find(|field| field.name == name)
    }

    pub fn player_field(&self, name: &str) -> Option<&FieldSpec> {
        self.player_fields.iter().find(|field| field.name == name)
    }

    pub fn page_sequence_for(&self, player: &PlayerContext) -> Vec<&PageSpec> {
        page_sequence_for(&self.pages, player)
    }

    /// Every form field named by a page is declared on its model
    pub fn check_consistency(&self) -> Result<(), DomainError> {
        for page in &self.pages {
            let Some(model) = page.form_model else {
                continue;
            };
            for field in page.form_fields {
                let declared = match model {
                    page::FormModel::Group => self.group_field(field).is_some(),
                    page::FormModel::Player => self.player_field(field).is_some(),
                };
                if !declared {
                    return Err(DomainError::Validation(format!(
                        "{}: page {} uses undeclared field {}",
                        self.name_in_url, page.name, field
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Definition of a game app by its URL name
pub fn game_definition(app: &str) -> Result<GameDefinition, DomainError> {
    match app {
        mftrust::NAME_IN_URL => Ok(mftrust::definition()),
        grief_support::NAME_IN_URL => Ok(grief_support::definition()),
        stakeholder::NAME_IN_URL => Ok(stakeholder::definition()),
        _ => Err(DomainError::unknown_key("game", app)),
    }
}

/// Participant label `"XXXX YYYY"`: a public and a private 4-char id
pub fn create_participant_label<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut id = || -> String {
        (0..4)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    };
    let public = id();
    let private = id();
    format!("{} {}", public, private)
}
