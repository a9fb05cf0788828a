use super::common::*;
use crate::forms::{
    validate, validate_with, FailureKind, FieldDefinition, FieldType, ValidationRule,
};

#[test]
fn dropdown_requires_exact_case_sensitive_option() {
    let field = certification_field();

    let rejected = validate(&field, "ccna");
    assert!(!rejected.valid);
    assert_eq!(rejected.failure, Some(FailureKind::NotInOptions));
    assert_eq!(
        rejected.error.as_deref(),
        Some("Highest certification must be one of: CCNA, AWS, Azure, None")
    );

    assert!(validate(&field, "AWS").valid);
}

#[test]
fn required_text_rejects_blank_values() {
    let field = FieldDefinition::new("motivation", "Motivation", FieldType::Textarea).required();

    for raw in ["", "   "] {
        let verdict = validate(&field, raw);
        assert_eq!(verdict.failure, Some(FailureKind::MissingRequired), "{raw:?}");
        assert_eq!(verdict.error.as_deref(), Some("Motivation is required"));
    }
    assert!(validate(&field, "Public research").valid);
}

#[test]
fn relaxed_requirement_accepts_empty_values() {
    let field = certification_field();
    assert!(validate_with(&field, "", false).valid);
    assert!(!validate_with(&field, "", true).valid);
}

#[test]
fn number_fields_parse_decimals_only() {
    let field = FieldDefinition::new("score", "Score", FieldType::Number);

    assert!(validate(&field, "72.5").valid);
    assert!(validate(&field, " -3 ").valid);
    assert!(validate(&field, "").valid);
    for raw in ["seventy", "NaN", "inf", "7,5"] {
        assert_eq!(
            validate(&field, raw).failure,
            Some(FailureKind::NotANumber),
            "{raw}"
        );
    }
}

#[test]
fn date_fields_require_calendar_dates() {
    let field = FieldDefinition::new("dob", "Date of birth", FieldType::Date).required();

    assert!(validate(&field, "1994-02-28").valid);
    assert_eq!(
        validate(&field, "1994-02-30").failure,
        Some(FailureKind::NotADate)
    );
    assert_eq!(
        validate(&field, "28/02/1994").failure,
        Some(FailureKind::NotADate)
    );
    assert_eq!(validate(&field, "").failure, Some(FailureKind::MissingRequired));
}

#[test]
fn required_checkbox_must_be_ticked() {
    let field = FieldDefinition::new("declaration", "Declaration", FieldType::Checkbox).required();

    assert!(validate(&field, "true").valid);
    assert!(validate(&field, "TRUE").valid);
    for raw in ["false", "", "yes"] {
        assert_eq!(
            validate(&field, raw).failure,
            Some(FailureKind::MissingRequired),
            "{raw}"
        );
    }

    let optional = FieldDefinition::new("newsletter", "Newsletter", FieldType::Checkbox);
    assert!(validate(&optional, "false").valid);
}

#[test]
fn file_references_are_opaque() {
    let field = FieldDefinition::new("noc", "No objection certificate", FieldType::File)
        .required()
        .with_validation(ValidationRule {
            pattern: Some("[0-9]+".to_string()),
            ..ValidationRule::default()
        });

    assert!(validate(&field, "uploads/app-12/noc.pdf").valid);
    assert_eq!(validate(&field, "").failure, Some(FailureKind::MissingRequired));
}

#[test]
fn pattern_must_match_the_whole_value() {
    let field = gate_score_field();

    assert!(validate(&field, "CE123456").valid);
    assert!(validate(&field, "").valid);
    assert_eq!(
        validate(&field, "CE12345X").failure,
        Some(FailureKind::PatternMismatch)
    );
    assert_eq!(
        validate(&field, "ce123456").failure,
        Some(FailureKind::PatternMismatch)
    );
}

#[test]
fn length_bounds_count_characters() {
    let field = gate_score_field();

    let verdict = validate(&field, "CE1234567");
    assert_eq!(verdict.failure, Some(FailureKind::LengthOutOfRange));
    assert_eq!(
        verdict.error.as_deref(),
        Some("GATE registration number must be between 8 and 8 characters")
    );

    let unicode = FieldDefinition::new("name", "Name", FieldType::Text).with_validation(
        ValidationRule {
            max_length: Some(4),
            ..ValidationRule::default()
        },
    );
    assert!(validate(&unicode, "अजय").valid);
}

#[test]
fn custom_message_replaces_default() {
    let field = FieldDefinition::new("mobile", "Mobile", FieldType::Text)
        .required()
        .with_validation(ValidationRule {
            pattern: Some("[6-9][0-9]{9}".to_string()),
            error_message: Some("Enter a 10 digit Indian mobile number".to_string()),
            ..ValidationRule::default()
        });

    let mismatch = validate(&field, "12345");
    assert_eq!(mismatch.failure, Some(FailureKind::PatternMismatch));
    assert_eq!(
        mismatch.error.as_deref(),
        Some("Enter a 10 digit Indian mobile number")
    );

    let missing = validate(&field, "");
    assert_eq!(missing.failure, Some(FailureKind::MissingRequired));
    assert_eq!(
        missing.error.as_deref(),
        Some("Enter a 10 digit Indian mobile number")
    );
}
