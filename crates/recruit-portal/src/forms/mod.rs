//! Dynamic custom-field forms attached to job postings.
//!
//! A posting owns an ordered list of [`FieldDefinition`]s. Applicants answer
//! with an [`ApplicationValueSet`] of raw strings, and [`assemble`] evaluates
//! those answers field by field: visibility first, then type and rule checks.
//! Everything here is pure apart from the [`FieldDefinitionStore`].

pub mod assembly;
pub mod definition;
pub mod error;
pub mod schema;
pub mod store;
pub mod validation;
pub mod values;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use assembly::{assemble, AssemblyOptions, FieldOutcome, FormAssessment};
pub use definition::{
    Condition, FieldDefinition, FieldId, FieldType, ValidationRule, VisibilityRule,
};
pub use error::{FormError, ReferenceProblem};
pub use schema::FormSchema;
pub use store::{FieldDefinitionStore, InMemoryFieldStore};
pub use validation::{validate, validate_with, FailureKind, FieldVerdict};
pub use values::ApplicationValueSet;
pub use visibility::is_visible;
