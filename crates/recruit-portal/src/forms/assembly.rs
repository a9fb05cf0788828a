use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::definition::{FieldDefinition, FieldId};
use super::validation::{validate_with, FailureKind, FieldVerdict};
use super::values::ApplicationValueSet;
use super::visibility::rule_holds;

/// Strictness of an assembly pass.
///
/// Draft saves run lenient (`require_all = false`) so incomplete forms can be
/// stored; submission runs strict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub require_all: bool,
}

impl AssemblyOptions {
    pub const fn lenient() -> Self {
        Self { require_all: false }
    }

    pub const fn strict() -> Self {
        Self { require_all: true }
    }
}

/// Per-field evaluation produced by [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub field_id: FieldId,
    pub label: String,
    pub visible: bool,
    /// Required after applying visibility and strictness.
    pub required: bool,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw value, or `None` when the field is suppressed or unanswered.
    pub value: Option<String>,
}

/// Outcome of evaluating a whole value set against a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAssessment {
    pub outcomes: Vec<FieldOutcome>,
    pub accepted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<FieldId>,
}

impl FormAssessment {
    pub fn outcome(&self, field: &FieldId) -> Option<&FieldOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| &outcome.field_id == field)
    }

    /// Visible fields that failed validation.
    pub fn blocking(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.valid)
    }

    /// Error message per failing field, for display next to the inputs.
    pub fn errors(&self) -> BTreeMap<FieldId, String> {
        self.blocking()
            .filter_map(|outcome| {
                outcome
                    .error
                    .clone()
                    .map(|error| (outcome.field_id.clone(), error))
            })
            .collect()
    }
}

/// Evaluate `values` against `definitions` in sort order.
///
/// A suppressed field is always valid and contributes no effective value, so
/// fields that depend on it read an empty string. Keys in `values` with no
/// definition are listed in `unknown_fields` but never block acceptance.
pub fn assemble(
    definitions: &[FieldDefinition],
    values: &ApplicationValueSet,
    options: AssemblyOptions,
) -> FormAssessment {
    let mut ordered: Vec<&FieldDefinition> = definitions.iter().collect();
    ordered.sort_by_key(|definition| definition.sort_order);

    let mut effective: HashMap<&FieldId, Option<&str>> = HashMap::with_capacity(ordered.len());
    let mut outcomes = Vec::with_capacity(ordered.len());
    let mut accepted = true;

    for definition in ordered {
        let visible = rule_holds(definition.visibility.as_ref(), |field| {
            effective.get(field).copied().flatten()
        });
        let raw = values.get(&definition.id);

        let outcome = if visible {
            let required = definition.required && options.require_all;
            let FieldVerdict {
                valid,
                failure,
                error,
            } = validate_with(definition, raw.unwrap_or_default(), required);
            accepted &= valid;
            effective.insert(&definition.id, raw);

            FieldOutcome {
                field_id: definition.id.clone(),
                label: definition.label.clone(),
                visible,
                required,
                valid,
                failure,
                error,
                value: raw.map(str::to_string),
            }
        } else {
            effective.insert(&definition.id, None);

            FieldOutcome {
                field_id: definition.id.clone(),
                label: definition.label.clone(),
                visible,
                required: false,
                valid: true,
                failure: None,
                error: None,
                value: None,
            }
        };

        outcomes.push(outcome);
    }

    let unknown_fields = values
        .iter()
        .map(|(field, _)| field)
        .filter(|field| !definitions.iter().any(|definition| &definition.id == *field))
        .cloned()
        .collect();

    FormAssessment {
        outcomes,
        accepted,
        unknown_fields,
    }
}
