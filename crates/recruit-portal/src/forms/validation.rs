use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::definition::{FieldDefinition, FieldType, ValidationRule};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reason a field value was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    MissingRequired,
    PatternMismatch,
    LengthOutOfRange,
    NotANumber,
    NotADate,
    NotInOptions,
}

impl FailureKind {
    pub const fn code(self) -> &'static str {
        match self {
            FailureKind::MissingRequired => "MISSING_REQUIRED",
            FailureKind::PatternMismatch => "PATTERN_MISMATCH",
            FailureKind::LengthOutOfRange => "LENGTH_OUT_OF_RANGE",
            FailureKind::NotANumber => "NOT_A_NUMBER",
            FailureKind::NotADate => "NOT_A_DATE",
            FailureKind::NotInOptions => "NOT_IN_OPTIONS",
        }
    }

    fn default_message(self, definition: &FieldDefinition) -> String {
        let label = &definition.label;
        match self {
            FailureKind::MissingRequired => format!("{label} is required"),
            FailureKind::PatternMismatch => format!("{label} is not in the expected format"),
            FailureKind::LengthOutOfRange => {
                let rule = definition.validation.as_ref();
                match (
                    rule.and_then(|rule| rule.min_length),
                    rule.and_then(|rule| rule.max_length),
                ) {
                    (Some(min), Some(max)) => {
                        format!("{label} must be between {min} and {max} characters")
                    }
                    (Some(min), None) => format!("{label} must be at least {min} characters"),
                    (None, Some(max)) => format!("{label} must be at most {max} characters"),
                    (None, None) => format!("{label} has an invalid length"),
                }
            }
            FailureKind::NotANumber => format!("{label} must be a number"),
            FailureKind::NotADate => format!("{label} must be a date (YYYY-MM-DD)"),
            FailureKind::NotInOptions => {
                format!("{label} must be one of: {}", definition.options.join(", "))
            }
        }
    }
}

/// Result of checking one raw value against its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FieldVerdict {
    pub(crate) fn accepted() -> Self {
        Self {
            valid: true,
            failure: None,
            error: None,
        }
    }

    fn rejected(definition: &FieldDefinition, kind: FailureKind) -> Self {
        let error = definition
            .validation
            .as_ref()
            .and_then(|rule| rule.error_message.clone())
            .unwrap_or_else(|| kind.default_message(definition));

        Self {
            valid: false,
            failure: Some(kind),
            error: Some(error),
        }
    }
}

/// Validate using the definition's own `required` flag.
pub fn validate(definition: &FieldDefinition, raw: &str) -> FieldVerdict {
    validate_with(definition, raw, definition.required)
}

/// Validate with an explicit required flag, so draft saves can relax it.
pub fn validate_with(definition: &FieldDefinition, raw: &str, required: bool) -> FieldVerdict {
    match check(definition, raw, required) {
        Ok(()) => FieldVerdict::accepted(),
        Err(kind) => FieldVerdict::rejected(definition, kind),
    }
}

fn check(definition: &FieldDefinition, raw: &str, required: bool) -> Result<(), FailureKind> {
    if definition.field_type == FieldType::Checkbox {
        return if required && !is_checked(raw) {
            Err(FailureKind::MissingRequired)
        } else {
            Ok(())
        };
    }

    if raw.trim().is_empty() {
        return if required {
            Err(FailureKind::MissingRequired)
        } else {
            Ok(())
        };
    }

    match definition.field_type {
        FieldType::Number => {
            let parsed = raw.trim().parse::<f64>().map_err(|_| FailureKind::NotANumber)?;
            if !parsed.is_finite() {
                return Err(FailureKind::NotANumber);
            }
        }
        FieldType::Date => {
            NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map_err(|_| FailureKind::NotADate)?;
        }
        FieldType::Dropdown | FieldType::Radio => {
            if !definition.options.iter().any(|option| option == raw) {
                return Err(FailureKind::NotInOptions);
            }
        }
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Checkbox
        | FieldType::File => {}
    }

    if definition.field_type.accepts_text_rules() {
        if let Some(rule) = &definition.validation {
            check_rule(definition, rule, raw)?;
        }
    }

    Ok(())
}

fn check_rule(
    definition: &FieldDefinition,
    rule: &ValidationRule,
    raw: &str,
) -> Result<(), FailureKind> {
    let length = raw.chars().count();
    let too_short = rule.min_length.is_some_and(|min| length < min);
    let too_long = rule.max_length.is_some_and(|max| length > max);
    if too_short || too_long {
        return Err(FailureKind::LengthOutOfRange);
    }

    if let Some(pattern) = &rule.pattern {
        if !matches_whole(definition, pattern, raw) {
            return Err(FailureKind::PatternMismatch);
        }
    }

    Ok(())
}

fn matches_whole(definition: &FieldDefinition, pattern: &str, raw: &str) -> bool {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex.is_match(raw),
        Err(err) => {
            warn!(field = %definition.id, %err, "unusable validation pattern");
            false
        }
    }
}

fn is_checked(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
