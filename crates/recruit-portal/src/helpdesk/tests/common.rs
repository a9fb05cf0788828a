use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::access::{Actor, Role};
use crate::error::RepositoryError;
use crate::helpdesk::{
    HelpdeskService, SupportTicket, TicketCategory, TicketId, TicketRepository, TicketRequest,
};

pub(super) fn applicant() -> Actor {
    Actor::new("applicant-1", Role::Applicant)
}

pub(super) fn other_applicant() -> Actor {
    Actor::new("applicant-2", Role::Applicant)
}

pub(super) fn supervisor() -> Actor {
    Actor::new("supervisor-1", Role::Supervisor)
}

pub(super) fn request(subject: &str) -> TicketRequest {
    TicketRequest {
        application_number: Some("SERC-2026-00004".to_string()),
        posting_id: None,
        category: TicketCategory::PhotoUpload,
        subject: subject.to_string(),
        message: "The photograph preview stays blank after upload.".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryTickets {
    records: Arc<Mutex<HashMap<TicketId, SupportTicket>>>,
    issued: Arc<Mutex<u32>>,
}

impl TicketRepository for MemoryTickets {
    fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&ticket.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(ticket.id.clone(), ticket.clone());
        Ok(ticket)
    }

    fn update(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        let slot = guard.get_mut(&ticket.id).ok_or(RepositoryError::NotFound)?;
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
        Ok(self.records.lock().expect("lock").get(id).cloned())
    }

    fn list(&self) -> Result<Vec<SupportTicket>, RepositoryError> {
        Ok(self.records.lock().expect("lock").values().cloned().collect())
    }

    fn next_sequence(&self) -> Result<u32, RepositoryError> {
        let mut issued = self.issued.lock().expect("lock");
        *issued += 1;
        Ok(*issued)
    }
}

pub(super) fn build_service() -> (HelpdeskService<MemoryTickets>, Arc<MemoryTickets>) {
    let repository = Arc::new(MemoryTickets::default());
    (HelpdeskService::new(repository.clone()), repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
