use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::access::UserId;
use crate::forms::{ApplicationValueSet, FieldId, FormAssessment};
use crate::postings::PostingId;

/// Identifier wrapper for applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Draft,
    Submitted,
    UnderScrutiny,
    ScrutinyCompleted,
    EligibleWritten,
    EligiblePractical,
    EligibleInterview,
    NotEligible,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderScrutiny => "under_scrutiny",
            ApplicationStatus::ScrutinyCompleted => "scrutiny_completed",
            ApplicationStatus::EligibleWritten => "eligible_written",
            ApplicationStatus::EligiblePractical => "eligible_practical",
            ApplicationStatus::EligibleInterview => "eligible_interview",
            ApplicationStatus::NotEligible => "not_eligible",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_eligible(self) -> bool {
        matches!(
            self,
            ApplicationStatus::EligibleWritten
                | ApplicationStatus::EligiblePractical
                | ApplicationStatus::EligibleInterview
        )
    }

    pub fn is_final(self) -> bool {
        matches!(
            self,
            ApplicationStatus::NotEligible | ApplicationStatus::Selected | ApplicationStatus::Rejected
        )
    }

    /// Statuses set only by the applicant's own actions.
    pub fn is_applicant_owned(self) -> bool {
        matches!(self, ApplicationStatus::Draft | ApplicationStatus::Submitted)
    }

    /// Legal single-step moves through scrutiny and selection.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        match (self, next) {
            (Draft, Submitted) => true,
            (Submitted, UnderScrutiny) => true,
            (UnderScrutiny, ScrutinyCompleted) => true,
            (ScrutinyCompleted, next) => next.is_eligible() || next == NotEligible,
            (EligibleWritten, EligiblePractical | EligibleInterview) => true,
            (EligiblePractical, EligibleInterview) => true,
            (current, Selected | Rejected) => current.is_eligible(),
            _ => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reservation category declared by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Gen,
    Obc,
    Sc,
    St,
    Ews,
    Pwd,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Gen => "GEN",
            Category::Obc => "OBC",
            Category::Sc => "SC",
            Category::St => "ST",
            Category::Ews => "EWS",
            Category::Pwd => "PWD",
        }
    }

    pub fn ordered() -> [Category; 6] {
        [
            Category::Gen,
            Category::Obc,
            Category::Sc,
            Category::St,
            Category::Ews,
            Category::Pwd,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Fixed personal section of every application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

/// One qualification in the education section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// Qualification level, e.g. "B.E." or "Class XII".
    pub level: String,
    pub institution: String,
    #[serde(default)]
    pub board: Option<String>,
    pub year_of_passing: u16,
    #[serde(default)]
    pub percentage: Option<String>,
}

/// One position in the experience section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub organization: String,
    pub designation: String,
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    /// `None` while the position is held.
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub responsibilities: Option<String>,
}

/// Payload for creating or saving an application draft.
///
/// Every section is replaced wholesale on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub posting_id: PostingId,
    #[serde(default)]
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub statement_of_purpose: Option<String>,
    #[serde(default)]
    pub custom_values: ApplicationValueSet,
}

impl ApplicationForm {
    pub(crate) fn section_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (index, entry) in self.education.iter().enumerate() {
            if entry.level.trim().is_empty() || entry.institution.trim().is_empty() {
                problems.push(format!(
                    "education entry {} needs a level and an institution",
                    index + 1
                ));
            }
        }
        for (index, entry) in self.experience.iter().enumerate() {
            if entry.organization.trim().is_empty() {
                problems.push(format!("experience entry {} needs an organization", index + 1));
            }
            if let (Some(from), Some(to)) = (entry.from_date, entry.to_date) {
                if to < from {
                    problems.push(format!(
                        "experience entry {} ends before it starts",
                        index + 1
                    ));
                }
            }
        }
        problems
    }
}

/// Stored application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub application_number: String,
    pub applicant: UserId,
    pub posting: PostingId,
    pub status: ApplicationStatus,
    pub personal_details: PersonalDetails,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    pub statement_of_purpose: Option<String>,
    pub values: ApplicationValueSet,
    /// Assessment from the most recent save or submission.
    pub last_assessment: Option<FormAssessment>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the repository on every stored update.
    #[serde(default)]
    pub revision: u64,
}

impl ApplicationRecord {
    /// Another application by the same applicant for the same posting.
    pub fn duplicates(&self, other: &ApplicationRecord) -> bool {
        self.id != other.id && self.applicant == other.applicant && self.posting == other.posting
    }

    /// Level of the most recently completed qualification.
    pub fn highest_qualification(&self) -> Option<&str> {
        self.education
            .iter()
            .max_by_key(|entry| entry.year_of_passing)
            .map(|entry| entry.level.as_str())
    }

    pub fn summary(&self) -> ApplicationSummary {
        ApplicationSummary {
            id: self.id.clone(),
            application_number: self.application_number.clone(),
            posting: self.posting.clone(),
            applicant: self.applicant.clone(),
            full_name: self.personal_details.full_name.clone(),
            category: self.personal_details.category,
            highest_qualification: self.highest_qualification().map(str::to_string),
            status: self.status,
            status_label: self.status.label(),
            submitted_at: self.submitted_at,
        }
    }
}

/// List entry used by applicant and staff listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub id: ApplicationId,
    pub application_number: String,
    pub posting: PostingId,
    pub applicant: UserId,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_qualification: Option<String>,
    pub status: ApplicationStatus,
    pub status_label: &'static str,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Result of a draft save: the stored record plus what the form flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedApplication {
    pub application: ApplicationRecord,
    pub errors: BTreeMap<FieldId, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped_fields: Vec<FieldId>,
}

/// Staff request moving several applications at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStatusUpdate {
    pub application_ids: Vec<ApplicationId>,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkOutcome {
    Updated { status: ApplicationStatus },
    NotFound,
    IllegalTransition { from: ApplicationStatus },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkItemResult {
    pub application_id: ApplicationId,
    #[serde(flatten)]
    pub outcome: BulkOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkUpdateReport {
    pub updated: usize,
    pub results: Vec<BulkItemResult>,
}
