//! Applicant drafts and submissions, staff review, and dashboard figures.
//!
//! Every save runs the posting's form in lenient mode and keeps the
//! resulting assessment on the record; submission reruns it strictly and
//! refuses to advance while any visible field fails.

pub mod dashboard;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use dashboard::{daily_trend, CategoryCount, DashboardStats, TrendPoint};
pub use domain::{
    ApplicationForm, ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationSummary,
    BulkItemResult, BulkOutcome, BulkStatusUpdate, BulkUpdateReport, Category, EducationEntry,
    ExperienceEntry, Gender, PersonalDetails, SavedApplication,
};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError};
