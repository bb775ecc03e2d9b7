//! Field specs for group and player records

use serde::Serialize;

use crate::domain::errors::DomainError;

/// Storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Currency,
    Integer,
    Float,
    String,
    LongString,
    Boolean,
}

/// Allowed values of a choice field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Choices {
    Coded(&'static [(i64, &'static str)]),
    Labels(&'static [&'static str]),
}

/// A submitted form value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Empty,
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Declared field of a group or player record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Choices>,
    pub blank: bool,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            label: None,
            min: None,
            max: None,
            choices: None,
            blank: false,
        }
    }

    pub fn currency(name: &'static str) -> Self {
        Self::new(name, FieldKind::Currency)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: &'static str) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn long_string(name: &'static str) -> Self {
        Self::new(name, FieldKind::LongString)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Check a submitted value against kind, bounds, choices and blank
    pub fn validate(&self, value: &FieldValue) -> Result<(), DomainError> {
        match value {
            FieldValue::Empty => {
                if self.blank || self.kind == FieldKind::Boolean {
                    Ok(())
                } else {
                    Err(self.invalid("field is required"))
                }
            }
            FieldValue::Number(n) => self.validate_number(*n),
            FieldValue::Text(text) => self.validate_text(text),
            FieldValue::Bool(_) => match self.kind {
                FieldKind::Boolean => Ok(()),
                _ => Err(self.invalid("expected a boolean")),
            },
        }
    }

    fn validate_number(&self, n: f64) -> Result<(), DomainError> {
        match self.kind {
            FieldKind::Currency | FieldKind::Float => {}
            FieldKind::Integer => {
                if n.fract() != 0.0 {
                    return Err(self.invalid("expected a whole number"));
                }
            }
            _ => return Err(self.invalid("expected text")),
        }
        if let Some(min) = self.min {
            if n < min {
                return Err(self.invalid(&format!("{} is below the minimum {}", n, min)));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                return Err(self.invalid(&format!("{} is above the maximum {}", n, max)));
            }
        }
        if let Some(Choices::Coded(codes)) = self.choices {
            if !codes.iter().any(|(code, _)| *code as f64 == n) {
                return Err(self.invalid(&format!("{} is not a valid choice", n)));
            }
        }
        Ok(())
    }

    fn validate_text(&self, text: &str) -> Result<(), DomainError> {
        match self.kind {
            FieldKind::String | FieldKind::LongString => {}
            _ => return Err(self.invalid("expected a number")),
        }
        if text.is_empty() && !self.blank {
            return Err(self.invalid("field is required"));
        }
        if let Some(Choices::Labels(labels)) = self.choices {
            if !text.is_empty() && !labels.contains(&text) {
                return Err(self.invalid(&format!("'{}' is not a valid choice", text)));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> DomainError {
        DomainError::Validation(format!("{}: {}", self.name, reason))
    }
}

/// 1 (absolutely) .. 5 (not at all)
pub const AGREEMENT_SCALE: &[(i64, &str)] = &[
    (1, "Absolutely"),
    (2, "Very"),
    (3, "Moderately"),
    (4, "Slightly"),
    (5, "Not at all"),
];

/// 1 (strongly agree) .. 5 (strongly disagree)
pub const LIKERT_SCALE: &[(i64, &str)] = &[
    (1, "Strongly agree"),
    (2, "Agree"),
    (3, "Neutral"),
    (4, "Disagree"),
    (5, "Strongly disagree"),
];

/// Seven-point numeric scale
pub const SEVEN_POINT_SCALE: &[(i64, &str)] = &[
    (1, "1"),
    (2, "2"),
    (3, "3"),
    (4, "4"),
    (5, "5"),
    (6, "6"),
    (7, "7"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_bounds() {
        let field = FieldSpec::currency("sent_amount").min(0.0).max(100.0);
        assert!(field.validate(&FieldValue::from(40)).is_ok());
        assert!(field.validate(&FieldValue::from(100)).is_ok());
        assert!(field.validate(&FieldValue::from(101)).is_err());
        assert!(field.validate(&FieldValue::from(-1)).is_err());
        assert!(field.validate(&FieldValue::Empty).is_err());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let field = FieldSpec::integer("effort_level").min(0.0).max(10.0);
        assert!(field.validate(&FieldValue::from(3.5)).is_err());
        assert!(field.validate(&FieldValue::from(3)).is_ok());
    }

    #[test]
    fn test_coded_choices() {
        let field = FieldSpec::integer("trust").choices(Choices::Coded(AGREEMENT_SCALE));
        assert!(field.validate(&FieldValue::from(5)).is_ok());
        assert!(field.validate(&FieldValue::from(6)).is_err());
    }

    #[test]
    fn test_blank_text() {
        let optional = FieldSpec::long_string("message").blank();
        assert!(optional.validate(&FieldValue::from("")).is_ok());
        assert!(optional.validate(&FieldValue::Empty).is_ok());

        let required = FieldSpec::long_string("justifications");
        assert!(required.validate(&FieldValue::from("")).is_err());
        assert!(required.validate(&FieldValue::from(3)).is_err());
    }

    #[test]
    fn test_label_choices() {
        let field = FieldSpec::string("gender").choices(Choices::Labels(&["Male", "Female", "Other"]));
        assert!(field.validate(&FieldValue::from("Other")).is_ok());
        assert!(field.validate(&FieldValue::from("Unknown")).is_err());
    }
}
