use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;

use super::domain::{
    schema_from_drafts, FieldDraft, JobPosting, PostingDraft, PostingId, PostingStatus,
    PostingView,
};
use super::repository::PostingRepository;
use crate::access::{AccessError, Actor, Role, AUTHORS, STAFF};
use crate::error::RepositoryError;
use crate::forms::{FieldDefinitionStore, FieldId, FormError, FormSchema};

/// Service owning posting metadata and the custom form attached to each posting.
pub struct PostingService<P, F> {
    repository: Arc<P>,
    fields: Arc<F>,
}

impl<P, F> PostingService<P, F>
where
    P: PostingRepository + 'static,
    F: FieldDefinitionStore + 'static,
{
    pub fn new(repository: Arc<P>, fields: Arc<F>) -> Self {
        Self { repository, fields }
    }

    /// Create a draft posting; its form is validated before anything is stored.
    pub fn create(
        &self,
        actor: &Actor,
        mut draft: PostingDraft,
    ) -> Result<PostingView, PostingServiceError> {
        actor.require_role(AUTHORS)?;
        check_draft(&draft)?;

        let schema = match draft.custom_fields.take() {
            Some(fields) => schema_from_drafts(fields)?,
            None => FormSchema::empty(),
        };

        let posting = JobPosting {
            id: PostingId::generate(),
            code: draft.code.trim().to_string(),
            title: draft.title.trim().to_string(),
            post_type: draft.post_type,
            department: draft.department.trim().to_string(),
            vacancies: draft.vacancies,
            last_date: draft.last_date,
            description: draft.description,
            status: PostingStatus::Draft,
            final_result_url: None,
            created_at: Utc::now(),
        };

        let stored = self
            .repository
            .insert(posting)
            .map_err(|err| code_conflict(err, &draft.code))?;
        let schema = self.fields.upsert_fields(&stored.id, schema.into_fields())?;
        info!(posting = %stored.id, code = %stored.code, fields = schema.len(), "posting created");

        Ok(PostingView {
            posting: stored,
            custom_fields: schema.into_fields(),
        })
    }

    /// Replace posting metadata, and the whole form when fields are supplied.
    pub fn update(
        &self,
        actor: &Actor,
        id: &PostingId,
        mut draft: PostingDraft,
    ) -> Result<PostingView, PostingServiceError> {
        actor.require_role(AUTHORS)?;
        check_draft(&draft)?;
        let mut posting = self.load(id)?;

        let schema = match draft.custom_fields.take() {
            Some(fields) => {
                ensure_form_editable(&posting)?;
                Some(schema_from_drafts(fields)?)
            }
            None => None,
        };

        posting.code = draft.code.trim().to_string();
        posting.title = draft.title.trim().to_string();
        posting.post_type = draft.post_type;
        posting.department = draft.department.trim().to_string();
        posting.vacancies = draft.vacancies;
        posting.last_date = draft.last_date;
        posting.description = draft.description;
        self.repository
            .update(posting.clone())
            .map_err(|err| code_conflict(err, &draft.code))?;

        let schema = match schema {
            Some(schema) => self.fields.upsert_fields(id, schema.into_fields())?,
            None => self.fields.schema(id)?,
        };
        info!(posting = %id, fields = schema.len(), "posting updated");

        Ok(PostingView {
            posting,
            custom_fields: schema.into_fields(),
        })
    }

    /// Replace the posting's form wholesale.
    pub fn define_fields(
        &self,
        actor: &Actor,
        id: &PostingId,
        fields: Vec<FieldDraft>,
    ) -> Result<FormSchema, PostingServiceError> {
        actor.require_role(AUTHORS)?;
        let posting = self.load(id)?;
        ensure_form_editable(&posting)?;

        let schema = schema_from_drafts(fields)?;
        let schema = self.fields.upsert_fields(id, schema.into_fields())?;
        info!(posting = %id, fields = schema.len(), "posting form replaced");
        Ok(schema)
    }

    pub fn remove_field(
        &self,
        actor: &Actor,
        id: &PostingId,
        field: &FieldId,
    ) -> Result<FormSchema, PostingServiceError> {
        actor.require_role(AUTHORS)?;
        let posting = self.load(id)?;
        ensure_form_editable(&posting)?;

        let schema = self.fields.remove_field(id, field)?;
        info!(posting = %id, field = %field, "custom field removed");
        Ok(schema)
    }

    /// Delete a posting that never left the draft stage.
    pub fn delete(&self, actor: &Actor, id: &PostingId) -> Result<(), PostingServiceError> {
        actor.require_role(&[Role::Admin])?;
        let posting = self.load(id)?;
        if posting.status != PostingStatus::Draft {
            return Err(PostingServiceError::NotDeletable(posting.status));
        }

        self.repository.delete(id)?;
        self.fields.remove_posting(id)?;
        info!(posting = %id, "posting deleted");
        Ok(())
    }

    /// Move a posting forward; a result link may accompany the move.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &PostingId,
        status: PostingStatus,
        final_result_url: Option<String>,
    ) -> Result<JobPosting, PostingServiceError> {
        actor.require_role(STAFF)?;
        let mut posting = self.load(id)?;
        if !posting.status.can_advance_to(status) {
            return Err(PostingServiceError::InvalidStatusTransition {
                from: posting.status,
                to: status,
            });
        }

        let from = posting.status;
        posting.status = status;
        if let Some(url) = final_result_url.filter(|url| !url.trim().is_empty()) {
            posting.final_result_url = Some(url);
        }
        self.repository.update(posting.clone())?;
        info!(posting = %id, %from, to = %status, "posting status changed");
        Ok(posting)
    }

    /// Fetch a posting with its form; drafts are invisible outside staff.
    pub fn get(&self, actor: &Actor, id: &PostingId) -> Result<PostingView, PostingServiceError> {
        let posting = self.load(id)?;
        if !posting.status.is_public() && !actor.is_staff() {
            return Err(RepositoryError::NotFound.into());
        }

        let custom_fields = self.fields.list_fields(id)?;
        Ok(PostingView {
            posting,
            custom_fields,
        })
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<JobPosting>, PostingServiceError> {
        if actor.is_staff() {
            self.list_all()
        } else {
            self.list_published()
        }
    }

    pub fn list_all(&self) -> Result<Vec<JobPosting>, PostingServiceError> {
        let mut postings = self.repository.list()?;
        postings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(postings)
    }

    pub fn list_published(&self) -> Result<Vec<JobPosting>, PostingServiceError> {
        let mut postings = self.list_all()?;
        postings.retain(|posting| posting.status.is_public());
        Ok(postings)
    }

    fn load(&self, id: &PostingId) -> Result<JobPosting, PostingServiceError> {
        let posting = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(posting)
    }
}

/// The repository owns code uniqueness; a conflict on write means the code is taken.
fn code_conflict(err: RepositoryError, code: &str) -> PostingServiceError {
    match err {
        RepositoryError::Conflict => PostingServiceError::DuplicateCode(code.trim().to_string()),
        other => PostingServiceError::Repository(other),
    }
}

fn check_draft(draft: &PostingDraft) -> Result<(), PostingServiceError> {
    let problems = draft.problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(PostingServiceError::InvalidDraft(problems))
    }
}

fn ensure_form_editable(posting: &JobPosting) -> Result<(), PostingServiceError> {
    if posting.status.form_locked() {
        return Err(PostingServiceError::SchemaLocked {
            posting: posting.id.clone(),
            status: posting.status,
        });
    }
    Ok(())
}

/// Error raised by the posting service.
#[derive(Debug, thiserror::Error)]
pub enum PostingServiceError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("invalid posting: {}", .0.join(", "))]
    InvalidDraft(Vec<&'static str>),
    #[error("posting code `{0}` is already in use")]
    DuplicateCode(String),
    #[error("posting `{posting}` is {status}; its form can no longer change")]
    SchemaLocked {
        posting: PostingId,
        status: PostingStatus,
    },
    #[error("posting cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: PostingStatus,
        to: PostingStatus,
    },
    #[error("posting is {0}; only drafts can be deleted")]
    NotDeletable(PostingStatus),
}

impl PostingServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            PostingServiceError::Form(FormError::UnknownField { .. }) => StatusCode::NOT_FOUND,
            PostingServiceError::Form(FormError::ReferentialConflict { .. }) => {
                StatusCode::CONFLICT
            }
            PostingServiceError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PostingServiceError::Repository(err) => err.status(),
            PostingServiceError::Access(err) => err.status(),
            PostingServiceError::InvalidDraft(_) => StatusCode::BAD_REQUEST,
            PostingServiceError::DuplicateCode(_) | PostingServiceError::NotDeletable(_) => {
                StatusCode::CONFLICT
            }
            PostingServiceError::SchemaLocked { .. }
            | PostingServiceError::InvalidStatusTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}
