use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::access::{Actor, Role};
use crate::error::RepositoryError;
use crate::forms::{Condition, FieldId, FieldType, InMemoryFieldStore, VisibilityRule};
use crate::postings::{
    FieldDraft, JobPosting, PostType, PostingDraft, PostingId, PostingRepository, PostingService,
};

pub(super) fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

pub(super) fn supervisor() -> Actor {
    Actor::new("supervisor-1", Role::Supervisor)
}

pub(super) fn director() -> Actor {
    Actor::new("director-1", Role::Director)
}

pub(super) fn applicant() -> Actor {
    Actor::new("applicant-1", Role::Applicant)
}

pub(super) fn field(id: &str, label: &str, field_type: FieldType) -> FieldDraft {
    FieldDraft {
        id: Some(FieldId::new(id)),
        label: label.to_string(),
        field_type,
        required: false,
        placeholder: None,
        options: Vec::new(),
        validation: None,
        visibility: None,
    }
}

pub(super) fn prior_service_fields() -> Vec<FieldDraft> {
    let mut prior = field("prior_service", "Previous CSIR service", FieldType::Radio);
    prior.required = true;
    prior.options = vec!["Yes".to_string(), "No".to_string()];

    let mut lab = field("lab_name", "Laboratory", FieldType::Text);
    lab.required = true;
    lab.visibility = Some(VisibilityRule {
        depends_on: FieldId::new("prior_service"),
        condition: Condition::Equals,
        value: "Yes".to_string(),
    });

    vec![prior, lab]
}

pub(super) fn posting_draft(code: &str) -> PostingDraft {
    PostingDraft {
        code: code.to_string(),
        title: "Senior Scientist (Structural Engineering)".to_string(),
        post_type: PostType::Scientist,
        department: "Structural Health Monitoring".to_string(),
        vacancies: 2,
        last_date: NaiveDate::from_ymd_opt(2099, 12, 31).expect("valid date"),
        description: Some("Full-time research position".to_string()),
        custom_fields: Some(prior_service_fields()),
    }
}

pub(super) type TestPostingService = PostingService<MemoryPostings, InMemoryFieldStore>;

pub(super) fn build_service() -> (
    TestPostingService,
    Arc<MemoryPostings>,
    Arc<InMemoryFieldStore>,
) {
    let repository = Arc::new(MemoryPostings::default());
    let fields = Arc::new(InMemoryFieldStore::new());
    let service = PostingService::new(repository.clone(), fields.clone());
    (service, repository, fields)
}

#[derive(Default, Clone)]
pub(super) struct MemoryPostings {
    pub(super) records: Arc<Mutex<HashMap<PostingId, JobPosting>>>,
}

impl PostingRepository for MemoryPostings {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&posting.id)
            || guard.values().any(|existing| existing.shares_code_with(&posting))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(posting.id.clone(), posting.clone());
        Ok(posting)
    }

    fn update(&self, posting: JobPosting) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.values().any(|existing| existing.shares_code_with(&posting)) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(posting.id.clone(), posting);
        Ok(())
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &PostingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailablePostings;

impl PostingRepository for UnavailablePostings {
    fn insert(&self, _posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _posting: JobPosting) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PostingId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
