use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::assembly::{assemble, AssemblyOptions, FormAssessment};
use super::definition::{FieldDefinition, FieldId};
use super::error::{FormError, ReferenceProblem};
use super::values::ApplicationValueSet;

/// Validated, sort-ordered set of field definitions for one posting.
///
/// Construction enforces the authoring invariants: unique ids, options on
/// choice fields, compilable patterns, sane length bounds, and visibility
/// rules that only point at fields sorting strictly earlier. The last rule
/// makes single-pass evaluation in sort order sufficient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDefinition>", into = "Vec<FieldDefinition>")]
pub struct FormSchema {
    fields: Vec<FieldDefinition>,
}

impl FormSchema {
    pub fn build(mut definitions: Vec<FieldDefinition>) -> Result<Self, FormError> {
        definitions.sort_by_key(|definition| definition.sort_order);

        let mut positions: HashMap<&FieldId, usize> = HashMap::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            if positions.insert(&definition.id, index).is_some() {
                return Err(FormError::DuplicateField(definition.id.clone()));
            }
        }

        for definition in &definitions {
            check_definition(definition)?;

            if let Some(rule) = &definition.visibility {
                let target = positions
                    .get(&rule.depends_on)
                    .map(|&index| &definitions[index]);
                let problem = match target {
                    None => Some(ReferenceProblem::UnknownField),
                    Some(target) if target.sort_order >= definition.sort_order => {
                        Some(ReferenceProblem::NotEarlier)
                    }
                    Some(_) => None,
                };
                if let Some(problem) = problem {
                    return Err(FormError::InvalidFieldReference {
                        field: definition.id.clone(),
                        depends_on: rule.depends_on.clone(),
                        problem,
                    });
                }
            }
        }

        Ok(Self {
            fields: definitions,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldDefinition> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|definition| &definition.id == id)
    }

    pub fn contains(&self, id: &FieldId) -> bool {
        self.get(id).is_some()
    }

    /// First field whose visibility rule points at `id`.
    pub fn referenced_by(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|definition| definition.depends_on() == Some(id))
    }

    /// Copy of the schema with `id` removed, refusing while another field depends on it.
    pub fn without(&self, id: &FieldId) -> Result<Option<Self>, FormError> {
        if !self.contains(id) {
            return Ok(None);
        }

        if let Some(dependent) = self.referenced_by(id) {
            return Err(FormError::ReferentialConflict {
                field: id.clone(),
                referenced_by: dependent.id.clone(),
            });
        }

        let fields = self
            .fields
            .iter()
            .filter(|definition| &definition.id != id)
            .cloned()
            .collect();
        Ok(Some(Self { fields }))
    }

    pub fn assess(&self, values: &ApplicationValueSet, options: AssemblyOptions) -> FormAssessment {
        assemble(&self.fields, values, options)
    }
}

impl TryFrom<Vec<FieldDefinition>> for FormSchema {
    type Error = FormError;

    fn try_from(value: Vec<FieldDefinition>) -> Result<Self, Self::Error> {
        Self::build(value)
    }
}

impl From<FormSchema> for Vec<FieldDefinition> {
    fn from(value: FormSchema) -> Self {
        value.fields
    }
}

fn check_definition(definition: &FieldDefinition) -> Result<(), FormError> {
    if definition.field_type.has_options() && definition.options.is_empty() {
        return Err(FormError::MissingOptions(definition.id.clone()));
    }

    let Some(rule) = &definition.validation else {
        return Ok(());
    };

    if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
        if min > max {
            return Err(FormError::InvalidLengthBounds {
                field: definition.id.clone(),
                min,
                max,
            });
        }
    }

    if let Some(pattern) = &rule.pattern {
        Regex::new(pattern).map_err(|err| FormError::InvalidPattern {
            field: definition.id.clone(),
            message: err.to_string(),
        })?;
    }

    Ok(())
}
