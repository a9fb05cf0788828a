use metrics_exporter_prometheus::PrometheusHandle;
use recruit_portal::applications::{ApplicationId, ApplicationRecord, ApplicationRepository};
use recruit_portal::error::RepositoryError;
use recruit_portal::helpdesk::{SupportTicket, TicketId, TicketRepository};
use recruit_portal::postings::{JobPosting, PostingId, PostingRepository};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPostingRepository {
    records: Arc<RwLock<HashMap<PostingId, JobPosting>>>,
}

impl PostingRepository for InMemoryPostingRepository {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.contains_key(&posting.id)
            || guard.values().any(|existing| existing.shares_code_with(&posting))
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(posting.id.clone(), posting.clone());
        Ok(posting)
    }

    fn update(&self, posting: JobPosting) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.values().any(|existing| existing.shares_code_with(&posting)) {
            return Err(RepositoryError::Conflict);
        }
        match guard.get_mut(&posting.id) {
            Some(slot) => {
                *slot = posting;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &PostingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default)]
struct ApplicationTable {
    records: HashMap<ApplicationId, ApplicationRecord>,
    sequences: HashMap<i32, u32>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    table: Arc<RwLock<ApplicationTable>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        if table.records.contains_key(&record.id)
            || table.records.values().any(|existing| existing.duplicates(&record))
        {
            return Err(RepositoryError::Conflict);
        }
        table.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let slot = table
            .records
            .get_mut(&record.id)
            .ok_or(RepositoryError::NotFound)?;
        if slot.revision != record.revision {
            return Err(RepositoryError::Stale);
        }
        *slot = ApplicationRecord {
            revision: record.revision + 1,
            ..record
        };
        Ok(slot.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.records.values().cloned().collect())
    }

    fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let sequence = table.sequences.entry(year).or_insert(0);
        *sequence += 1;
        Ok(*sequence)
    }
}

#[derive(Default)]
struct TicketTable {
    records: HashMap<TicketId, SupportTicket>,
    issued: u32,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTicketRepository {
    table: Arc<RwLock<TicketTable>>,
}

impl TicketRepository for InMemoryTicketRepository {
    fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        if table.records.contains_key(&ticket.id) {
            return Err(RepositoryError::Conflict);
        }
        table.records.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket)
    }

    fn update(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        let slot = table
            .records
            .get_mut(&ticket.id)
            .ok_or(RepositoryError::NotFound)?;
        if slot.revision != ticket.revision {
            return Err(RepositoryError::Stale);
        }
        *slot = SupportTicket {
            revision: ticket.revision + 1,
            ..ticket
        };
        Ok(slot.clone())
    }

    fn fetch(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.records.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SupportTicket>, RepositoryError> {
        let table = self.table.read().map_err(poisoned)?;
        Ok(table.records.values().cloned().collect())
    }

    fn next_sequence(&self) -> Result<u32, RepositoryError> {
        let mut table = self.table.write().map_err(poisoned)?;
        table.issued += 1;
        Ok(table.issued)
    }
}
