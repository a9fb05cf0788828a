use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::definition::{FieldDefinition, FieldId};
use super::error::FormError;
use super::schema::FormSchema;
use crate::postings::PostingId;

/// Storage of each posting's custom field definitions.
///
/// Implementations must make `upsert_fields` all-or-nothing: a rejected set
/// leaves the previously stored form in place.
pub trait FieldDefinitionStore: Send + Sync {
    /// Definitions ordered by sort order; empty when the posting has no form yet.
    fn list_fields(&self, posting: &PostingId) -> Result<Vec<FieldDefinition>, FormError> {
        Ok(self.schema(posting)?.into_fields())
    }

    fn schema(&self, posting: &PostingId) -> Result<FormSchema, FormError>;

    fn upsert_fields(
        &self,
        posting: &PostingId,
        definitions: Vec<FieldDefinition>,
    ) -> Result<FormSchema, FormError>;

    fn remove_field(&self, posting: &PostingId, field: &FieldId) -> Result<FormSchema, FormError>;

    fn remove_posting(&self, posting: &PostingId) -> Result<(), FormError>;
}

/// Process-local store; each posting's form is swapped in one write.
#[derive(Debug, Default)]
pub struct InMemoryFieldStore {
    forms: RwLock<HashMap<PostingId, FormSchema>>,
}

impl InMemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldDefinitionStore for InMemoryFieldStore {
    fn schema(&self, posting: &PostingId) -> Result<FormSchema, FormError> {
        let forms = self.forms.read().unwrap_or_else(PoisonError::into_inner);
        Ok(forms.get(posting).cloned().unwrap_or_default())
    }

    fn upsert_fields(
        &self,
        posting: &PostingId,
        definitions: Vec<FieldDefinition>,
    ) -> Result<FormSchema, FormError> {
        let schema = FormSchema::build(definitions)?;
        let mut forms = self.forms.write().unwrap_or_else(PoisonError::into_inner);
        forms.insert(posting.clone(), schema.clone());
        Ok(schema)
    }

    fn remove_field(&self, posting: &PostingId, field: &FieldId) -> Result<FormSchema, FormError> {
        let mut forms = self.forms.write().unwrap_or_else(PoisonError::into_inner);
        let unknown = || FormError::UnknownField {
            posting: posting.clone(),
            field: field.clone(),
        };

        let current = forms.get(posting).ok_or_else(unknown)?;
        let reduced = current.without(field)?.ok_or_else(unknown)?;
        forms.insert(posting.clone(), reduced.clone());
        Ok(reduced)
    }

    fn remove_posting(&self, posting: &PostingId) -> Result<(), FormError> {
        let mut forms = self.forms.write().unwrap_or_else(PoisonError::into_inner);
        forms.remove(posting);
        Ok(())
    }
}
