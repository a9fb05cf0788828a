use super::domain::{ApplicationId, ApplicationRecord};
use crate::access::UserId;
use crate::error::RepositoryError;
use crate::postings::PostingId;

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Every write is checked and applied under one lock (or one transaction):
/// the service never relies on an earlier read still holding.
pub trait ApplicationRepository: Send + Sync {
    /// Store a new record.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the id is taken or the
    /// applicant already holds an application for the same posting.
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;

    /// Replace a record read at `record.revision`.
    ///
    /// Fails with [`RepositoryError::Stale`] when the stored revision moved
    /// on since that read. The stored copy carries the next revision.
    fn update(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;

    /// Reserve the next application sequence number for `year`, starting at 1.
    fn next_sequence(&self, year: i32) -> Result<u32, RepositoryError>;

    fn list_for_applicant(
        &self,
        applicant: &UserId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let mut records = self.list()?;
        records.retain(|record| &record.applicant == applicant);
        Ok(records)
    }

    fn list_for_posting(
        &self,
        posting: &PostingId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let mut records = self.list()?;
        records.retain(|record| &record.posting == posting);
        Ok(records)
    }
}
