use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;

use super::domain::{
    ReplyRequest, SupportTicket, TicketId, TicketReply, TicketRequest, TicketStatus,
};
use super::repository::TicketRepository;
use crate::access::{AccessError, Actor, STAFF};
use crate::error::RepositoryError;

const STAFF_SIGNATURE: &str = "Administrative Officer";

/// Service owning the helpdesk ticket threads.
pub struct HelpdeskService<T> {
    repository: Arc<T>,
}

impl<T> HelpdeskService<T>
where
    T: TicketRepository + 'static,
{
    pub fn new(repository: Arc<T>) -> Self {
        Self { repository }
    }

    /// Staff see every ticket; everyone else sees their own. Newest first.
    pub fn list(&self, actor: &Actor) -> Result<Vec<SupportTicket>, HelpdeskServiceError> {
        let mut tickets = if actor.is_staff() {
            self.repository.list()?
        } else {
            let user = actor.require_user()?;
            self.repository.list_for_owner(user)?
        };
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    pub fn get(&self, actor: &Actor, id: &TicketId) -> Result<SupportTicket, HelpdeskServiceError> {
        let ticket = self.load(id)?;
        ensure_participant(actor, &ticket)?;
        Ok(ticket)
    }

    pub fn create(
        &self,
        actor: &Actor,
        request: TicketRequest,
    ) -> Result<SupportTicket, HelpdeskServiceError> {
        let user = actor.require_user()?;
        let problems = request.problems();
        if !problems.is_empty() {
            return Err(HelpdeskServiceError::InvalidTicket(problems));
        }

        let sequence = self.repository.next_sequence()?;
        let now = Utc::now();
        let ticket = SupportTicket {
            id: TicketId::generate(),
            ticket_number: format!("TKT-{sequence:05}"),
            raised_by: user.clone(),
            application_number: request
                .application_number
                .map(|number| number.trim().to_string())
                .filter(|number| !number.is_empty()),
            posting: request.posting_id,
            category: request.category,
            subject: request.subject.trim().to_string(),
            description: request.message.trim().to_string(),
            status: TicketStatus::Open,
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
            revision: 0,
        };

        let stored = self.repository.insert(ticket)?;
        info!(ticket = %stored.ticket_number, user = %user, category = ?stored.category, "ticket raised");
        Ok(stored)
    }

    /// Append a reply. Any reply reopens a resolved ticket; closed tickets stay closed.
    pub fn reply(
        &self,
        actor: &Actor,
        id: &TicketId,
        request: ReplyRequest,
    ) -> Result<SupportTicket, HelpdeskServiceError> {
        let user = actor.require_user()?;
        if request.message.trim().is_empty() {
            return Err(HelpdeskServiceError::InvalidTicket(vec!["message is required"]));
        }
        let mut ticket = self.load(id)?;
        ensure_participant(actor, &ticket)?;
        if ticket.status == TicketStatus::Closed {
            return Err(HelpdeskServiceError::TicketClosed(ticket.ticket_number));
        }

        let now = Utc::now();
        let sender_name = if actor.is_staff() {
            STAFF_SIGNATURE.to_string()
        } else {
            user.to_string()
        };
        ticket.replies.push(TicketReply {
            sender: user.clone(),
            sender_name,
            sender_role: actor.role,
            message: request.message.trim().to_string(),
            timestamp: now,
        });
        ticket.status = TicketStatus::Open;
        ticket.updated_at = now;

        let stored = self.repository.update(ticket)?;
        info!(ticket = %stored.ticket_number, role = %actor.role, replies = stored.replies.len(), "ticket replied");
        Ok(stored)
    }

    pub fn resolve(&self, actor: &Actor, id: &TicketId) -> Result<SupportTicket, HelpdeskServiceError> {
        actor.require_role(STAFF)?;
        self.set_status(id, TicketStatus::Resolved)
    }

    /// Close a ticket for good; the raiser or staff may do so.
    pub fn close(&self, actor: &Actor, id: &TicketId) -> Result<SupportTicket, HelpdeskServiceError> {
        let ticket = self.load(id)?;
        ensure_participant(actor, &ticket)?;
        self.set_status(id, TicketStatus::Closed)
    }

    fn set_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
    ) -> Result<SupportTicket, HelpdeskServiceError> {
        let mut ticket = self.load(id)?;
        if ticket.status == TicketStatus::Closed {
            return Err(HelpdeskServiceError::TicketClosed(ticket.ticket_number));
        }
        let from = ticket.status;
        ticket.status = status;
        ticket.updated_at = Utc::now();

        let stored = self.repository.update(ticket)?;
        info!(ticket = %stored.ticket_number, %from, to = %status, "ticket status changed");
        Ok(stored)
    }

    fn load(&self, id: &TicketId) -> Result<SupportTicket, HelpdeskServiceError> {
        let ticket = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(ticket)
    }
}

fn ensure_participant(actor: &Actor, ticket: &SupportTicket) -> Result<(), HelpdeskServiceError> {
    if actor.is_staff() {
        return Ok(());
    }
    let user = actor.require_user()?;
    if ticket.is_raised_by(user) {
        Ok(())
    } else {
        Err(HelpdeskServiceError::NotOwner)
    }
}

/// Error raised by the helpdesk service.
#[derive(Debug, thiserror::Error)]
pub enum HelpdeskServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("invalid ticket: {}", .0.join(", "))]
    InvalidTicket(Vec<&'static str>),
    #[error("ticket belongs to another user")]
    NotOwner,
    #[error("ticket {0} is closed")]
    TicketClosed(String),
}

impl HelpdeskServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            HelpdeskServiceError::Repository(err) => err.status(),
            HelpdeskServiceError::Access(err) => err.status(),
            HelpdeskServiceError::InvalidTicket(_) => StatusCode::BAD_REQUEST,
            HelpdeskServiceError::NotOwner => StatusCode::FORBIDDEN,
            HelpdeskServiceError::TicketClosed(_) => StatusCode::CONFLICT,
        }
    }
}
