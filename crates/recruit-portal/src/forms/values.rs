use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::definition::FieldId;
use super::schema::FormSchema;

/// Applicant answers keyed by field id, all carried as raw strings.
///
/// Each save replaces the whole set; entries not resupplied are gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationValueSet(BTreeMap<FieldId, String>);

impl ApplicationValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldId, value: impl Into<String>) -> Option<String> {
        self.0.insert(field, value.into())
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(FieldId::new(field), value);
        self
    }

    pub fn get(&self, field: &FieldId) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &str)> {
        self.0.iter().map(|(field, value)| (field, value.as_str()))
    }

    /// Keys with no matching definition in `schema`.
    pub fn unknown_fields(&self, schema: &FormSchema) -> Vec<FieldId> {
        self.0
            .keys()
            .filter(|field| !schema.contains(field))
            .cloned()
            .collect()
    }

    /// Split into the entries `schema` defines and the ids it does not.
    pub fn sanitized(self, schema: &FormSchema) -> (Self, Vec<FieldId>) {
        let mut dropped = Vec::new();
        let kept = self
            .0
            .into_iter()
            .filter(|(field, _)| {
                let known = schema.contains(field);
                if !known {
                    dropped.push(field.clone());
                }
                known
            })
            .collect();
        (Self(kept), dropped)
    }
}

impl FromIterator<(FieldId, String)> for ApplicationValueSet {
    fn from_iter<T: IntoIterator<Item = (FieldId, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
