//! Single-player stakeholder game
//!
//! The player assesses Acme LLC under a randomly assigned stakeholder
//! relevance condition and consensus trend. The assessment's Altman
//! Z-score is computed from the submitted EBIT, net sales and market cap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::field::{Choices, FieldSpec, SEVEN_POINT_SCALE};
use super::page::{FormModel, PageSpec};
use super::{Currency, GameDefinition};

pub const NAME_IN_URL: &str = "stakeholder";
pub const NUM_ROUNDS: u32 = 1;
pub const ENDOWMENT: Currency = 100;

/// Balance sheet figures shown to every participant
pub const TOTAL_ASSETS: f64 = 90_000.0;
pub const TOTAL_LIABILITIES: f64 = 65_000.0;
pub const CURRENT_ASSETS: f64 = 50_000.0;
pub const CURRENT_LIABILITIES: f64 = 40_000.0;
pub const RETAINED_EARNINGS: f64 = 5_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Low Stakeholder Relevance")]
    LowRelevance,
    #[serde(rename = "High Stakeholder Relevance")]
    HighRelevance,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::LowRelevance => write!(f, "Low Stakeholder Relevance"),
            Condition::HighRelevance => write!(f, "High Stakeholder Relevance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeholderConsensus {
    #[serde(rename = "Negative Stakeholder Consensus")]
    Negative,
    #[serde(rename = "Positive Stakeholder Consensus")]
    Positive,
}

impl std::fmt::Display for StakeholderConsensus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StakeholderConsensus::Negative => write!(f, "Negative Stakeholder Consensus"),
            StakeholderConsensus::Positive => write!(f, "Positive Stakeholder Consensus"),
        }
    }
}

/// Treatment assigned when the session is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub condition: Condition,
    pub stakeholder_consensus: StakeholderConsensus,
}

pub fn assign_treatment<R: Rng + ?Sized>(rng: &mut R) -> Treatment {
    Treatment {
        condition: if rng.gen_bool(0.5) {
            Condition::LowRelevance
        } else {
            Condition::HighRelevance
        },
        stakeholder_consensus: if rng.gen_bool(0.5) {
            StakeholderConsensus::Negative
        } else {
            StakeholderConsensus::Positive
        },
    }
}

/// Figures entered on the assessment page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub ebit: f64,
    pub net_sales: f64,
    pub market_cap: f64,
}

/// Altman Z-score over the fixed balance sheet
pub fn altman_z(assessment: &Assessment) -> f64 {
    let x1 = (CURRENT_ASSETS - CURRENT_LIABILITIES) / TOTAL_ASSETS;
    let x2 = RETAINED_EARNINGS / TOTAL_ASSETS;
    let x3 = assessment.ebit / TOTAL_ASSETS;
    let x4 = assessment.market_cap / TOTAL_LIABILITIES;
    let x5 = assessment.net_sales / TOTAL_ASSETS;

    1.2 * x1 + 1.4 * x2 + 3.3 * x3 + 0.6 * x4 + x5
}

pub const INTERNAL_STAKEHOLDER_OPTIONS: &[&str] = &[
    "investors",
    "suppliers",
    "customers",
    "regulators",
    "ngos",
    "community",
    "media",
];

pub const EXTERNAL_STAKEHOLDER_OPTIONS: &[&str] =
    &["employees", "executive", "board", "chairman", "ceo"];

/// One checkbox field per internal option, same order as the option list
pub const INTERNAL_STAKEHOLDER_FIELDS: &[&str] = &[
    "internal_investors",
    "internal_suppliers",
    "internal_customers",
    "internal_regulators",
    "internal_ngos",
    "internal_community",
    "internal_media",
];

/// One checkbox field per external option, same order as the option list
pub const EXTERNAL_STAKEHOLDER_FIELDS: &[&str] = &[
    "external_employees",
    "external_executive",
    "external_board",
    "external_chairman",
    "external_ceo",
];

/// Checkbox selections stored as one comma-separated field
pub fn join_selections(selected: &[&str]) -> String {
    selected.join(", ")
}

pub fn definition() -> GameDefinition {
    let mut player_fields = vec![
        FieldSpec::string("stakeholder_consensus")
            .label("Stakeholder Consensus")
            .choices(Choices::Labels(&[
                "Negative Stakeholder Consensus",
                "Positive Stakeholder Consensus",
            ])),
        FieldSpec::string("condition")
            .label("Condition assigned to the player")
            .choices(Choices::Labels(&[
                "Low Stakeholder Relevance",
                "High Stakeholder Relevance",
            ])),
        FieldSpec::float("ebit").label("EBIT"),
        FieldSpec::float("net_sales").label("Net Sales"),
        FieldSpec::float("market_cap").label("Market Capitalization"),
        FieldSpec::float("altman_z").label("Altman Z-Score"),
        FieldSpec::long_string("justifications")
            .label("Please provide your written justifications for your assessment."),
        FieldSpec::integer("risk_attitudes")
            .label("Are you generally a person who is willing to take risks or do you try to avoid taking risks?")
            .choices(Choices::Coded(SEVEN_POINT_SCALE)),
        FieldSpec::integer("disclosure_transparency")
            .label("Do you believe that Acme LLC should provide additional information about its ESG impacts and stakeholder engagement process?")
            .choices(Choices::Coded(SEVEN_POINT_SCALE)),
        FieldSpec::integer("esg_relevance")
            .label("How strongly do you personally agree that companies should sacrifice profitability to promote ESG themes?")
            .choices(Choices::Coded(SEVEN_POINT_SCALE)),
        FieldSpec::string("stakeholder_attributes")
            .label("Which of the following describes the relevance of the stakeholders consulted for the ESG prioritization initiative?")
            .choices(Choices::Labels(&[
                "Low power, legitimacy, and urgency",
                "High power, legitimacy, and urgency",
            ])),
        FieldSpec::string("trendline")
            .label("Which of the following describes the trendline of the stakeholder consensus depicted in Acme's ESG theme prioritization chart?")
            .choices(Choices::Labels(&["Negative correlation", "Positive correlation"])),
        FieldSpec::long_string("internal_stakeholders")
            .label("When considering internal stakeholders, who did you think about?")
            .blank(),
        FieldSpec::string("internal_stakeholders_other")
            .label("If other, please explain:")
            .blank(),
        FieldSpec::long_string("external_stakeholders")
            .label("When considering external stakeholders, who did you think about?")
            .blank(),
        FieldSpec::string("external_stakeholders_other")
            .label("If other, please explain:")
            .blank(),
    ];

    player_fields.extend(
        INTERNAL_STAKEHOLDER_FIELDS
            .iter()
            .chain(EXTERNAL_STAKEHOLDER_FIELDS)
            .copied()
            .map(FieldSpec::boolean),
    );

    player_fields.extend([
        FieldSpec::string("age")
            .label("What is your age?")
            .choices(Choices::Labels(&[
                "Less than 25 years old",
                "25-34 years old",
                "35-44 years old",
                "45-54 years old",
                "55-64 years old",
                "65-74 years old",
                "Above 74 years old",
            ])),
        FieldSpec::string("gender")
            .label("What is your gender?")
            .choices(Choices::Labels(&["Male", "Female", "Other"])),
        FieldSpec::string("qualification")
            .label("Please select the highest academic qualification that you have.")
            .choices(Choices::Labels(&[
                "Diploma",
                "Bachelor Degree",
                "Masters Degree",
                "Doctoral Degree",
                "None of the above",
            ])),
        FieldSpec::integer("finance_experience")
            .label("How many years of full-time working experience in a finance role do you have?")
            .min(0.0),
        FieldSpec::integer("investment_research")
            .label("How involved are you with investment research?")
            .choices(Choices::Coded(SEVEN_POINT_SCALE)),
        FieldSpec::integer("risk_assessments")
            .label("How involved are you with risk assessments?")
            .choices(Choices::Coded(SEVEN_POINT_SCALE)),
        FieldSpec::long_string("feedback")
            .label("Participant feedback")
            .blank(),
    ]);

    let pages = vec![
        PageSpec::page("Introduction"),
        PageSpec::page("Background"),
        PageSpec::page("Strategy"),
        PageSpec::page("Condition1"),
        PageSpec::page("Condition2"),
        PageSpec::page("Assessment").form(
            FormModel::Player,
            &["ebit", "net_sales", "market_cap", "justifications"],
        ),
        PageSpec::page("Checks").form(
            FormModel::Player,
            &[
                "stakeholder_attributes",
                "trendline",
                "internal_stakeholders_other",
                "external_stakeholders_other",
            ],
        ),
        PageSpec::page("Controls").form(
            FormModel::Player,
            &["risk_attitudes", "disclosure_transparency", "esg_relevance"],
        ),
        PageSpec::page("Demographics").form(
            FormModel::Player,
            &[
                "age",
                "gender",
                "qualification",
                "finance_experience",
                "investment_research",
                "risk_assessments",
            ],
        ),
        PageSpec::page("Thanks").form(FormModel::Player, &["feedback"]),
    ];

    GameDefinition {
        name_in_url: NAME_IN_URL,
        description: "Single-player assessment of Acme LLC under randomly assigned stakeholder relevance and consensus conditions.",
        players_per_group: None,
        num_rounds: NUM_ROUNDS,
        group_fields: Vec::new(),
        player_fields,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiments::field::{FieldKind, FieldValue};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_altman_z() {
        let assessment = Assessment {
            ebit: 9_000.0,
            net_sales: 90_000.0,
            market_cap: 65_000.0,
        };
        // 1.2*(1/9) + 1.4*(1/18) + 3.3*0.1 + 0.6*1 + 1
        let expected = 1.2 / 9.0 + 1.4 / 18.0 + 0.33 + 0.6 + 1.0;
        assert!((altman_z(&assessment) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_treatment_covers_all_conditions() {
        let mut rng = StdRng::seed_from_u64(17);
        let treatments: Vec<Treatment> = (0..64).map(|_| assign_treatment(&mut rng)).collect();
        assert!(treatments.iter().any(|t| t.condition == Condition::LowRelevance));
        assert!(treatments.iter().any(|t| t.condition == Condition::HighRelevance));
        assert!(treatments
            .iter()
            .any(|t| t.stakeholder_consensus == StakeholderConsensus::Negative));
        assert!(treatments
            .iter()
            .any(|t| t.stakeholder_consensus == StakeholderConsensus::Positive));
    }

    #[test]
    fn test_treatment_labels_match_field_choices() {
        let game = definition();
        let mut rng = StdRng::seed_from_u64(3);
        let treatment = assign_treatment(&mut rng);

        let condition = game.player_field("condition").unwrap();
        assert!(condition
            .validate(&FieldValue::Text(treatment.condition.to_string()))
            .is_ok());
        let consensus = game.player_field("stakeholder_consensus").unwrap();
        assert!(consensus
            .validate(&FieldValue::Text(treatment.stakeholder_consensus.to_string()))
            .is_ok());
    }

    #[test]
    fn test_checkbox_fields_follow_options() {
        let internal: Vec<String> = INTERNAL_STAKEHOLDER_OPTIONS
            .iter()
            .map(|option| format!("internal_{}", option))
            .collect();
        let external: Vec<String> = EXTERNAL_STAKEHOLDER_OPTIONS
            .iter()
            .map(|option| format!("external_{}", option))
            .collect();
        assert_eq!(INTERNAL_STAKEHOLDER_FIELDS, internal.as_slice());
        assert_eq!(EXTERNAL_STAKEHOLDER_FIELDS, external.as_slice());
    }

    #[test]
    fn test_checkbox_fields_declared_as_booleans() {
        let game = definition();
        for name in INTERNAL_STAKEHOLDER_FIELDS
            .iter()
            .chain(EXTERNAL_STAKEHOLDER_FIELDS)
        {
            let field = game.player_field(name).unwrap();
            assert_eq!(field.kind, FieldKind::Boolean);
        }

        let investors = game.player_field("internal_investors").unwrap();
        assert!(investors.validate(&FieldValue::Bool(true)).is_ok());
        assert!(investors.validate(&FieldValue::Empty).is_ok());
        assert!(investors.validate(&FieldValue::from(1)).is_err());
        game.check_consistency().unwrap();
    }

    #[test]
    fn test_join_selections() {
        assert_eq!(join_selections(&["investors", "media"]), "investors, media");
        assert_eq!(join_selections(&[]), "");
    }
}
