//! Support tickets raised by applicants and answered by staff.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ReplyRequest, SupportTicket, TicketCategory, TicketId, TicketReply, TicketRequest,
    TicketStatus,
};
pub use repository::TicketRepository;
pub use router::helpdesk_router;
pub use service::{HelpdeskService, HelpdeskServiceError};
