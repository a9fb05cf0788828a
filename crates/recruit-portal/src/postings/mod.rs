//! Job postings and the lifecycle that governs when their forms may change.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    schema_from_drafts, FieldDraft, JobPosting, PostType, PostingDraft, PostingId, PostingStatus,
    PostingView,
};
pub use repository::PostingRepository;
pub use router::{posting_router, StatusChange};
pub use service::{PostingService, PostingServiceError};
