use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{info, warn};

use super::dashboard::{daily_trend, DashboardStats, TrendPoint};
use super::domain::{
    ApplicationForm, ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationSummary,
    BulkItemResult, BulkOutcome, BulkStatusUpdate, BulkUpdateReport, SavedApplication,
};
use super::repository::ApplicationRepository;
use crate::access::{AccessError, Actor, UserId, AUTHORS, STAFF};
use crate::config::PortalConfig;
use crate::error::RepositoryError;
use crate::forms::{
    ApplicationValueSet, AssemblyOptions, FieldDefinitionStore, FieldId, FormAssessment,
    FormError,
};
use crate::postings::{JobPosting, PostingId, PostingRepository, PostingStatus};

/// Service gating application drafts and submissions through the posting's form.
pub struct ApplicationService<R, P, F> {
    repository: Arc<R>,
    postings: Arc<P>,
    fields: Arc<F>,
    number_prefix: String,
}

impl<R, P, F> ApplicationService<R, P, F>
where
    R: ApplicationRepository + 'static,
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    pub fn new(repository: Arc<R>, postings: Arc<P>, fields: Arc<F>, config: &PortalConfig) -> Self {
        Self {
            repository,
            postings,
            fields,
            number_prefix: config.application_prefix.clone(),
        }
    }

    /// Open a draft application against a published posting.
    pub fn create_draft(
        &self,
        actor: &Actor,
        form: ApplicationForm,
    ) -> Result<SavedApplication, ApplicationServiceError> {
        let applicant = actor.require_user()?.clone();
        check_sections(&form)?;
        let posting = self.open_posting(&form.posting_id, Utc::now())?;

        let existing = self.repository.list_for_applicant(&applicant)?;
        if existing.iter().any(|record| record.posting == posting.id) {
            return Err(ApplicationServiceError::AlreadyApplied {
                posting: posting.id,
            });
        }

        let (values, dropped, assessment) = self.assess_values(&posting.id, form.custom_values)?;

        let now = Utc::now();
        let application_number = self.next_application_number(now)?;
        let record = ApplicationRecord {
            id: ApplicationId::generate(),
            application_number,
            applicant,
            posting: posting.id,
            status: ApplicationStatus::Draft,
            personal_details: form.personal_details,
            education: form.education,
            experience: form.experience,
            statement_of_purpose: form.statement_of_purpose,
            values,
            last_assessment: Some(assessment),
            submitted_at: None,
            remarks: None,
            created_at: now,
            updated_at: now,
            revision: 0,
        };

        let posting_id = record.posting.clone();
        let stored = self.repository.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => ApplicationServiceError::AlreadyApplied {
                posting: posting_id,
            },
            other => ApplicationServiceError::Repository(other),
        })?;
        info!(
            application = %stored.id,
            number = %stored.application_number,
            posting = %stored.posting,
            "application draft created"
        );
        Ok(saved(stored, dropped))
    }

    /// Replace a draft's contents wholesale; incomplete drafts are still stored.
    ///
    /// Fails with a stale-record conflict when the draft changed (or was
    /// submitted) after it was read here.
    pub fn save_draft(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        form: ApplicationForm,
    ) -> Result<SavedApplication, ApplicationServiceError> {
        check_sections(&form)?;
        let mut record = self.owned_draft(actor, id)?;
        if form.posting_id != record.posting {
            return Err(ApplicationServiceError::PostingMismatch {
                expected: record.posting,
                supplied: form.posting_id,
            });
        }

        let (values, dropped, assessment) =
            self.assess_values(&record.posting, form.custom_values)?;

        record.personal_details = form.personal_details;
        record.education = form.education;
        record.experience = form.experience;
        record.statement_of_purpose = form.statement_of_purpose;
        record.values = values;
        record.last_assessment = Some(assessment);
        record.updated_at = Utc::now();

        let record = self.repository.update(record)?;
        info!(application = %record.id, "application draft saved");
        Ok(saved(record, dropped))
    }

    /// Submit a draft once every visible field passes strict assembly.
    ///
    /// A blocked submission leaves the stored draft untouched.
    pub fn submit(
        &self,
        actor: &Actor,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let mut record = self.owned_draft(actor, id)?;
        let now = Utc::now();
        self.open_posting(&record.posting, now)?;

        let schema = self.fields.schema(&record.posting)?;
        let assessment = schema.assess(&record.values, AssemblyOptions::strict());
        if !assessment.accepted {
            let blocking: Vec<&FieldId> = assessment
                .blocking()
                .map(|outcome| &outcome.field_id)
                .collect();
            warn!(application = %record.id, ?blocking, "submission blocked by form validation");
            return Err(ApplicationServiceError::SubmissionBlocked(Box::new(
                assessment,
            )));
        }

        record.status = ApplicationStatus::Submitted;
        record.submitted_at = Some(now);
        record.last_assessment = Some(assessment);
        record.updated_at = now;

        let record = self.repository.update(record)?;
        info!(
            application = %record.id,
            number = %record.application_number,
            "application submitted"
        );
        Ok(record)
    }

    /// Fetch an application for its owner or for staff.
    pub fn get(
        &self,
        actor: &Actor,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.load(id)?;
        if actor.is_staff() {
            return Ok(record);
        }

        let user = actor.require_user()?;
        if &record.applicant != user {
            return Err(ApplicationServiceError::NotOwner);
        }
        Ok(record)
    }

    /// The caller's own applications, newest first.
    pub fn list_for_applicant(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ApplicationSummary>, ApplicationServiceError> {
        let applicant = actor.require_user()?;
        let mut records = self.repository.list_for_applicant(applicant)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records.iter().map(ApplicationRecord::summary).collect())
    }

    /// Applications against one posting, most recently submitted first.
    pub fn list_for_posting(
        &self,
        actor: &Actor,
        posting: &PostingId,
    ) -> Result<Vec<ApplicationSummary>, ApplicationServiceError> {
        actor.require_role(STAFF)?;
        self.postings
            .fetch(posting)?
            .ok_or(RepositoryError::NotFound)?;

        let mut records = self.repository.list_for_posting(posting)?;
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records.iter().map(ApplicationRecord::summary).collect())
    }

    /// Apply a staff decision to many applications, reporting each one.
    pub fn bulk_update_status(
        &self,
        actor: &Actor,
        request: BulkStatusUpdate,
    ) -> Result<BulkUpdateReport, ApplicationServiceError> {
        actor.require_role(AUTHORS)?;
        if request.status.is_applicant_owned() {
            return Err(ApplicationServiceError::InvalidBulkTarget(request.status));
        }

        let remarks = request
            .remarks
            .map(|remarks| remarks.trim().to_string())
            .filter(|remarks| !remarks.is_empty());

        let mut report = BulkUpdateReport::default();
        for application_id in request.application_ids {
            let outcome = self.apply_status(&application_id, request.status, remarks.as_deref());
            if matches!(outcome, BulkOutcome::Updated { .. }) {
                report.updated += 1;
            }
            report.results.push(BulkItemResult {
                application_id,
                outcome,
            });
        }

        info!(
            status = %request.status,
            requested = report.results.len(),
            updated = report.updated,
            "bulk status update applied"
        );
        Ok(report)
    }

    pub fn dashboard(&self, actor: &Actor) -> Result<DashboardStats, ApplicationServiceError> {
        actor.require_role(STAFF)?;
        let applications = self.repository.list()?;
        let postings = self.postings.list()?;
        Ok(DashboardStats::collect(&applications, &postings))
    }

    pub fn trends(
        &self,
        actor: &Actor,
        today: NaiveDate,
    ) -> Result<Vec<TrendPoint>, ApplicationServiceError> {
        actor.require_role(STAFF)?;
        let applications = self.repository.list()?;
        Ok(daily_trend(&applications, today))
    }

    fn apply_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        remarks: Option<&str>,
    ) -> BulkOutcome {
        let mut record = match self.repository.fetch(id) {
            Ok(Some(record)) => record,
            Ok(None) => return BulkOutcome::NotFound,
            Err(err) => return BulkOutcome::Failed { error: err.to_string() },
        };

        if !record.status.can_transition_to(status) {
            return BulkOutcome::IllegalTransition {
                from: record.status,
            };
        }

        record.status = status;
        if let Some(remarks) = remarks {
            record.remarks = Some(remarks.to_string());
        }
        record.updated_at = Utc::now();

        match self.repository.update(record) {
            Ok(_) => BulkOutcome::Updated { status },
            Err(err) => BulkOutcome::Failed { error: err.to_string() },
        }
    }

    fn load(&self, id: &ApplicationId) -> Result<ApplicationRecord, ApplicationServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn owned_draft(
        &self,
        actor: &Actor,
        id: &ApplicationId,
    ) -> Result<ApplicationRecord, ApplicationServiceError> {
        let user: &UserId = actor.require_user()?;
        let record = self.load(id)?;
        if &record.applicant != user {
            return Err(ApplicationServiceError::NotOwner);
        }
        if record.status != ApplicationStatus::Draft {
            return Err(ApplicationServiceError::NotEditable(record.status));
        }
        Ok(record)
    }

    fn open_posting(
        &self,
        id: &PostingId,
        now: DateTime<Utc>,
    ) -> Result<JobPosting, ApplicationServiceError> {
        let posting = self.postings.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if !posting.status.accepts_applications() {
            return Err(ApplicationServiceError::PostingClosed {
                posting: posting.id,
                status: posting.status,
            });
        }
        if now.date_naive() > posting.last_date {
            return Err(ApplicationServiceError::DeadlinePassed {
                posting: posting.id,
                last_date: posting.last_date,
            });
        }
        Ok(posting)
    }

    /// Lenient assessment of the supplied values; undefined keys are dropped.
    fn assess_values(
        &self,
        posting: &PostingId,
        values: ApplicationValueSet,
    ) -> Result<(ApplicationValueSet, Vec<FieldId>, FormAssessment), ApplicationServiceError> {
        let schema = self.fields.schema(posting)?;
        let assessment = schema.assess(&values, AssemblyOptions::lenient());
        let (values, dropped) = values.sanitized(&schema);
        if !dropped.is_empty() {
            warn!(posting = %posting, ?dropped, "dropping values for undefined fields");
        }
        Ok((values, dropped, assessment))
    }

    fn next_application_number(&self, now: DateTime<Utc>) -> Result<String, ApplicationServiceError> {
        let year = now.year();
        let sequence = self.repository.next_sequence(year)?;
        Ok(format!("{}-{}-{:05}", self.number_prefix, year, sequence))
    }
}

fn check_sections(form: &ApplicationForm) -> Result<(), ApplicationServiceError> {
    let problems = form.section_problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ApplicationServiceError::InvalidSections(problems))
    }
}

fn saved(application: ApplicationRecord, dropped_fields: Vec<FieldId>) -> SavedApplication {
    let errors = application
        .last_assessment
        .as_ref()
        .map(FormAssessment::errors)
        .unwrap_or_default();
    SavedApplication {
        application,
        errors,
        dropped_fields,
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("posting `{posting}` is {status} and not accepting applications")]
    PostingClosed {
        posting: PostingId,
        status: PostingStatus,
    },
    #[error("applications for posting `{posting}` closed on {last_date}")]
    DeadlinePassed {
        posting: PostingId,
        last_date: NaiveDate,
    },
    #[error("an application for posting `{posting}` already exists")]
    AlreadyApplied { posting: PostingId },
    #[error("application belongs to another applicant")]
    NotOwner,
    #[error("application is {0} and can no longer be edited")]
    NotEditable(ApplicationStatus),
    #[error("application is for posting `{expected}`, not `{supplied}`")]
    PostingMismatch {
        expected: PostingId,
        supplied: PostingId,
    },
    #[error("submission blocked: {} field(s) need attention", .0.blocking().count())]
    SubmissionBlocked(Box<FormAssessment>),
    #[error("{0} cannot be set by a bulk update")]
    InvalidBulkTarget(ApplicationStatus),
    #[error("invalid application: {}", .0.join(", "))]
    InvalidSections(Vec<String>),
}

impl ApplicationServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApplicationServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationServiceError::Repository(err) => err.status(),
            ApplicationServiceError::Access(err) => err.status(),
            ApplicationServiceError::PostingClosed { .. }
            | ApplicationServiceError::DeadlinePassed { .. }
            | ApplicationServiceError::SubmissionBlocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationServiceError::AlreadyApplied { .. }
            | ApplicationServiceError::NotEditable(_) => StatusCode::CONFLICT,
            ApplicationServiceError::NotOwner => StatusCode::FORBIDDEN,
            ApplicationServiceError::PostingMismatch { .. }
            | ApplicationServiceError::InvalidBulkTarget(_)
            | ApplicationServiceError::InvalidSections(_) => StatusCode::BAD_REQUEST,
        }
    }
}
