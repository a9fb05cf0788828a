use crate::forms::{
    ApplicationValueSet, Condition, FieldDefinition, FieldType, FormSchema, ValidationRule,
};
use crate::postings::PostingId;

pub(super) fn posting_id() -> PostingId {
    PostingId::new("post-sci-01")
}

pub(super) fn certification_field() -> FieldDefinition {
    FieldDefinition::new("certification", "Highest certification", FieldType::Dropdown)
        .with_options(["CCNA", "AWS", "Azure", "None"])
        .required()
        .at(0)
}

pub(super) fn prior_service_field() -> FieldDefinition {
    FieldDefinition::new("prior_service", "Served in a CSIR lab before?", FieldType::Radio)
        .with_options(["Yes", "No"])
        .required()
        .at(1)
}

pub(super) fn lab_name_field() -> FieldDefinition {
    FieldDefinition::new("lab_name", "Name of the lab", FieldType::Text)
        .required()
        .visible_when("prior_service", Condition::Equals, "Yes")
        .at(2)
}

pub(super) fn service_years_field() -> FieldDefinition {
    FieldDefinition::new("service_years", "Years of service", FieldType::Number)
        .visible_when("lab_name", Condition::Contains, "CSIR")
        .at(3)
}

pub(super) fn gate_score_field() -> FieldDefinition {
    FieldDefinition::new("gate_score", "GATE registration number", FieldType::Text)
        .with_validation(ValidationRule {
            pattern: Some("[A-Z]{2}[0-9]{6}".to_string()),
            min_length: Some(8),
            max_length: Some(8),
            error_message: None,
        })
        .at(4)
}

pub(super) fn recruitment_form() -> Vec<FieldDefinition> {
    vec![
        certification_field(),
        prior_service_field(),
        lab_name_field(),
        service_years_field(),
        gate_score_field(),
    ]
}

pub(super) fn recruitment_schema() -> FormSchema {
    FormSchema::build(recruitment_form()).expect("fixture form is valid")
}

pub(super) fn complete_values() -> ApplicationValueSet {
    ApplicationValueSet::new()
        .with("certification", "AWS")
        .with("prior_service", "Yes")
        .with("lab_name", "CSIR-SERC Chennai")
        .with("service_years", "4.5")
        .with("gate_score", "CE123456")
}
