use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::access::{Actor, Role, UserId};
use crate::applications::{
    ApplicationForm, ApplicationId, ApplicationRecord, ApplicationRepository, ApplicationService,
    Category, EducationEntry, PersonalDetails,
};
use crate::config::PortalConfig;
use crate::error::RepositoryError;
use crate::forms::{
    ApplicationValueSet, Condition, FieldDefinition, FieldDefinitionStore, FieldType,
    InMemoryFieldStore, ValidationRule,
};
use crate::postings::{JobPosting, PostType, PostingId, PostingRepository, PostingStatus};

pub(super) type TestApplicationService =
    ApplicationService<MemoryApplications, MemoryPostings, InMemoryFieldStore>;

pub(super) struct Fixture {
    pub(super) service: TestApplicationService,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) postings: Arc<MemoryPostings>,
    pub(super) fields: Arc<InMemoryFieldStore>,
    pub(super) posting: PostingId,
}

pub(super) fn applicant() -> Actor {
    Actor::new("aadhaar-1111", Role::Applicant)
}

pub(super) fn other_applicant() -> Actor {
    Actor::new("aadhaar-2222", Role::Applicant)
}

pub(super) fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

pub(super) fn director() -> Actor {
    Actor::new("director-1", Role::Director)
}

pub(super) fn recruitment_form() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("certification", "Highest certification", FieldType::Dropdown)
            .required()
            .with_options(["CCNA", "AWS", "Azure", "None"])
            .at(0),
        FieldDefinition::new("prior_service", "Previous CSIR service", FieldType::Radio)
            .required()
            .with_options(["Yes", "No"])
            .at(1),
        FieldDefinition::new("lab_name", "Laboratory", FieldType::Text)
            .required()
            .visible_when("prior_service", Condition::Equals, "Yes")
            .at(2),
        FieldDefinition::new("gate_score", "GATE registration number", FieldType::Text)
            .with_validation(ValidationRule {
                pattern: Some("[A-Z]{2}[0-9]{6}".to_string()),
                ..ValidationRule::default()
            })
            .at(3),
    ]
}

pub(super) fn posting(id: &str, status: PostingStatus) -> JobPosting {
    JobPosting {
        id: PostingId::new(id),
        code: id.to_uppercase(),
        title: "Technical Officer (Networks)".to_string(),
        post_type: PostType::TechnicalOfficer,
        department: "Computing Facility".to_string(),
        vacancies: 1,
        last_date: NaiveDate::from_ymd_opt(2099, 12, 31).expect("valid date"),
        description: None,
        status,
        final_result_url: None,
        created_at: Utc::now(),
    }
}

pub(super) fn fixture() -> Fixture {
    let applications = Arc::new(MemoryApplications::default());
    let postings = Arc::new(MemoryPostings::default());
    let fields = Arc::new(InMemoryFieldStore::new());

    let open = posting("to-2026-01", PostingStatus::Published);
    postings.insert(open.clone()).expect("posting stored");
    fields
        .upsert_fields(&open.id, recruitment_form())
        .expect("form stored");

    let service = ApplicationService::new(
        applications.clone(),
        postings.clone(),
        fields.clone(),
        &PortalConfig::default(),
    );

    Fixture {
        service,
        applications,
        postings,
        fields,
        posting: open.id,
    }
}

pub(super) fn complete_values() -> ApplicationValueSet {
    ApplicationValueSet::new()
        .with("certification", "AWS")
        .with("prior_service", "Yes")
        .with("lab_name", "CSIR-SERC Chennai")
        .with("gate_score", "CE123456")
}

pub(super) fn form(posting: &PostingId, values: ApplicationValueSet) -> ApplicationForm {
    ApplicationForm {
        posting_id: posting.clone(),
        personal_details: PersonalDetails {
            full_name: "Meena Raghavan".to_string(),
            category: Some(Category::Obc),
            nationality: Some("Indian".to_string()),
            ..PersonalDetails::default()
        },
        education: vec![
            EducationEntry {
                level: "Class XII".to_string(),
                institution: "Kendriya Vidyalaya, Adyar".to_string(),
                board: Some("CBSE".to_string()),
                year_of_passing: 2012,
                percentage: Some("91.4".to_string()),
            },
            EducationEntry {
                level: "B.E. (ECE)".to_string(),
                institution: "Anna University".to_string(),
                board: None,
                year_of_passing: 2016,
                percentage: Some("8.2 CGPA".to_string()),
            },
        ],
        experience: Vec::new(),
        statement_of_purpose: Some("Network operations for the campus".to_string()),
        custom_values: values,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    pub(super) records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    sequences: Arc<Mutex<HashMap<i32, u32>>>,
}

impl MemoryApplications {
    pub(super) fn stored(&self, id: &ApplicationId) -> ApplicationRecord {
        self.fetch(id).expect("fetch").expect("record stored")
    }
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id)
            || guard.values().any(|existing| existing.duplicates(&record))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(&record.id).ok_or(RepositoryError::NotFound)?;
        if stored.revision != record.revision {
            return Err(RepositoryError::Stale);
        }
        *stored = ApplicationRecord {
            revision: record.revision + 1,
            ..record
        };
        Ok(stored.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        let mut guard = self.sequences.lock().expect("sequence mutex poisoned");
        let next = guard.entry(year).or_insert(0);
        *next += 1;
        Ok(*next)
    }
}

/// Holds the first `armed` reads until that many callers have read, so
/// concurrent requests all act on the same snapshot before any of them writes.
pub(super) struct ReadGate {
    barrier: Barrier,
    armed: AtomicUsize,
}

impl ReadGate {
    pub(super) fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
            armed: AtomicUsize::new(0),
        }
    }

    pub(super) fn arm(&self, reads: usize) {
        self.armed.store(reads, Ordering::SeqCst);
    }

    fn pass(&self) {
        let held = self
            .armed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if held {
            self.barrier.wait();
        }
    }
}

/// [`MemoryApplications`] whose record reads wait at a [`ReadGate`].
pub(super) struct GatedApplications {
    pub(super) inner: MemoryApplications,
    pub(super) gate: ReadGate,
}

impl ApplicationRepository for GatedApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let record = self.inner.fetch(id)?;
        self.gate.pass();
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        self.inner.list()
    }

    fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        self.inner.next_sequence(year)
    }

    fn list_for_applicant(
        &self,
        applicant: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let records = self.inner.list_for_applicant(applicant)?;
        self.gate.pass();
        Ok(records)
    }
}

pub(super) type GatedApplicationService =
    ApplicationService<GatedApplications, MemoryPostings, InMemoryFieldStore>;

/// Service over a gated repository, with the open posting and its form in place.
pub(super) fn gated_service() -> (GatedApplicationService, Arc<GatedApplications>, PostingId) {
    let applications = Arc::new(GatedApplications {
        inner: MemoryApplications::default(),
        gate: ReadGate::new(2),
    });
    let postings = Arc::new(MemoryPostings::default());
    let fields = Arc::new(InMemoryFieldStore::new());

    let open = posting("to-2026-01", PostingStatus::Published);
    postings.insert(open.clone()).expect("posting stored");
    fields
        .upsert_fields(&open.id, recruitment_form())
        .expect("form stored");

    let service = ApplicationService::new(
        applications.clone(),
        postings,
        fields,
        &PortalConfig::default(),
    );
    (service, applications, open.id)
}

#[derive(Default, Clone)]
pub(super) struct MemoryPostings {
    pub(super) records: Arc<Mutex<HashMap<PostingId, JobPosting>>>,
}

impl MemoryPostings {
    pub(super) fn set_status(&self, id: &PostingId, status: PostingStatus) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(posting) = guard.get_mut(id) {
            posting.status = status;
        }
    }
}

impl PostingRepository for MemoryPostings {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.values().any(|existing| existing.shares_code_with(&posting)) {
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
        guard.remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
