use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::forms::{
    FieldDefinition, FieldId, FieldType, FormSchema, ValidationRule, VisibilityRule,
};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(pub String);

impl PostingId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    Scientist,
    TechnicalOfficer,
    Technician,
    TechnicalAssistant,
}

/// Lifecycle of a posting, from authoring to declared results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingStatus {
    Draft,
    Published,
    ApplicationClosed,
    ScrutinyInProgress,
    PendingDirectorApproval,
    DirectorApproved,
    ResultDeclared,
}

impl PostingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PostingStatus::Draft => "draft",
            PostingStatus::Published => "published",
            PostingStatus::ApplicationClosed => "application_closed",
            PostingStatus::ScrutinyInProgress => "scrutiny_in_progress",
            PostingStatus::PendingDirectorApproval => "pending_director_approval",
            PostingStatus::DirectorApproved => "director_approved",
            PostingStatus::ResultDeclared => "result_declared",
        }
    }

    /// Postings only move forward through their lifecycle.
    pub fn can_advance_to(self, next: PostingStatus) -> bool {
        next > self
    }

    pub fn is_public(self) -> bool {
        self != PostingStatus::Draft
    }

    pub fn accepts_applications(self) -> bool {
        self == PostingStatus::Published
    }

    /// Once applications close the form is frozen.
    pub fn form_locked(self) -> bool {
        self >= PostingStatus::ApplicationClosed
    }
}

impl fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored posting metadata; the form lives in the field store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub code: String,
    pub title: String,
    pub post_type: PostType,
    pub department: String,
    pub vacancies: u32,
    pub last_date: NaiveDate,
    pub description: Option<String>,
    pub status: PostingStatus,
    pub final_result_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    /// Codes are unique across postings, ignoring ASCII case.
    pub fn shares_code_with(&self, other: &JobPosting) -> bool {
        self.id != other.id && self.code.trim().eq_ignore_ascii_case(other.code.trim())
    }
}

/// Posting plus its custom form, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostingView {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub custom_fields: Vec<FieldDefinition>,
}

/// Author-supplied custom field; its position in the list is its sort order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDraft {
    #[serde(default)]
    pub id: Option<FieldId>,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation: Option<ValidationRule>,
    #[serde(default)]
    pub visibility: Option<VisibilityRule>,
}

impl FieldDraft {
    fn into_definition(self, position: usize) -> FieldDefinition {
        FieldDefinition {
            id: self.id.unwrap_or_else(FieldId::generate),
            label: self.label,
            field_type: self.field_type,
            required: self.required,
            placeholder: self.placeholder,
            options: self.options,
            validation: self.validation,
            visibility: self.visibility,
            sort_order: i32::try_from(position).unwrap_or(i32::MAX),
        }
    }
}

impl From<FieldDefinition> for FieldDraft {
    fn from(definition: FieldDefinition) -> Self {
        Self {
            id: Some(definition.id),
            label: definition.label,
            field_type: definition.field_type,
            required: definition.required,
            placeholder: definition.placeholder,
            options: definition.options,
            validation: definition.validation,
            visibility: definition.visibility,
        }
    }
}

/// Resolve drafts into a validated schema, numbering them in list order.
pub fn schema_from_drafts(drafts: Vec<FieldDraft>) -> Result<FormSchema, crate::forms::FormError> {
    let definitions = drafts
        .into_iter()
        .enumerate()
        .map(|(position, draft)| draft.into_definition(position))
        .collect();
    FormSchema::build(definitions)
}

fn default_vacancies() -> u32 {
    1
}

/// Create/update payload for a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDraft {
    pub code: String,
    pub title: String,
    pub post_type: PostType,
    pub department: String,
    #[serde(default = "default_vacancies")]
    pub vacancies: u32,
    pub last_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    /// `None` keeps the current form on update.
    #[serde(default)]
    pub custom_fields: Option<Vec<FieldDraft>>,
}

impl PostingDraft {
    pub(crate) fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.code.trim().is_empty() {
            problems.push("code is required");
        }
        if self.title.trim().is_empty() {
            problems.push("title is required");
        }
        if self.department.trim().is_empty() {
            problems.push("department is required");
        }
        if self.vacancies == 0 {
            problems.push("at least one vacancy is required");
        }
        problems
    }
}
