use super::domain::{SupportTicket, TicketId};
use crate::access::UserId;
use crate::error::RepositoryError;

/// Storage abstraction for support tickets.
///
/// `update` stores the ticket only when its `revision` matches the stored
/// one, bumping it by one; otherwise it fails with [`RepositoryError::Stale`].
pub trait TicketRepository: Send + Sync {
    fn insert(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError>;
    fn update(&self, ticket: SupportTicket) -> Result<SupportTicket, RepositoryError>;
    fn fetch(&self, id: &TicketId) -> Result<Option<SupportTicket>, RepositoryError>;
    fn list(&self) -> Result<Vec<SupportTicket>, RepositoryError>;
    /// Next ticket sequence number, starting at 1. Never handed out twice.
    fn next_sequence(&self) -> Result<u32, RepositoryError>;

    fn list_for_owner(&self, owner: &UserId) -> Result<Vec<SupportTicket>, RepositoryError> {
        let mut tickets = self.list()?;
        tickets.retain(|ticket| ticket.is_raised_by(owner));
        Ok(tickets)
    }
}
