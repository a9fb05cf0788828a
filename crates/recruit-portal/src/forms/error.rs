use std::fmt;

use super::definition::FieldId;
use crate::postings::PostingId;

/// Why a visibility rule's target was rejected at authoring time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceProblem {
    UnknownField,
    NotEarlier,
}

impl fmt::Display for ReferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceProblem::UnknownField => f.write_str("is not defined on this form"),
            ReferenceProblem::NotEarlier => f.write_str("does not sort before it"),
        }
    }
}

/// Structural errors raised while authoring or editing a posting's form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field `{field}` depends on `{depends_on}`, which {problem}")]
    InvalidFieldReference {
        field: FieldId,
        depends_on: FieldId,
        problem: ReferenceProblem,
    },
    #[error("field `{field}` is still referenced by the visibility rule of `{referenced_by}`")]
    ReferentialConflict {
        field: FieldId,
        referenced_by: FieldId,
    },
    #[error("field id `{0}` is defined more than once")]
    DuplicateField(FieldId),
    #[error("field `{0}` offers choices but defines no options")]
    MissingOptions(FieldId),
    #[error("field `{field}` has an invalid pattern: {message}")]
    InvalidPattern { field: FieldId, message: String },
    #[error("field `{field}` has min length {min} above max length {max}")]
    InvalidLengthBounds {
        field: FieldId,
        min: usize,
        max: usize,
    },
    #[error("field `{field}` is not defined on posting `{posting}`")]
    UnknownField { posting: PostingId, field: FieldId },
}
