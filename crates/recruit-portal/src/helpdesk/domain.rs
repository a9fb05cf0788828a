use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::{Role, UserId};
use crate::postings::PostingId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl TicketId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    Open,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketCategory {
    ApplicationIssue,
    DocumentUpload,
    PhotoUpload,
    PdfDownload,
    Payment,
    #[default]
    Other,
}

/// A message appended to a ticket's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReply {
    pub sender: UserId,
    /// Staff replies are signed by the office, not the individual.
    pub sender_name: String,
    pub sender_role: Role,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: TicketId,
    /// `TKT-00001`, allocated by the repository.
    pub ticket_number: String,
    pub raised_by: UserId,
    pub application_number: Option<String>,
    pub posting: Option<PostingId>,
    pub category: TicketCategory,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub replies: Vec<TicketReply>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

impl SupportTicket {
    pub fn is_raised_by(&self, user: &UserId) -> bool {
        &self.raised_by == user
    }
}

/// Request body for raising a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    #[serde(default)]
    pub application_number: Option<String>,
    #[serde(default)]
    pub posting_id: Option<PostingId>,
    #[serde(default)]
    pub category: TicketCategory,
    pub subject: String,
    pub message: String,
}

impl TicketRequest {
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.subject.trim().is_empty() {
            problems.push("subject is required");
        }
        if self.message.trim().is_empty() {
            problems.push("message is required");
        }
        problems
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}
