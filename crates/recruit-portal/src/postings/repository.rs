use super::domain::{JobPosting, PostingId};
use crate::error::RepositoryError;

/// Storage abstraction for posting metadata.
///
/// `insert` and `update` must reject a posting whose code another posting
/// already uses (see [`JobPosting::shares_code_with`]) with
/// [`RepositoryError::Conflict`], checked under the same write that stores it.
pub trait PostingRepository: Send + Sync {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn update(&self, posting: JobPosting) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PostingId) -> Result<Option<JobPosting>, RepositoryError>;
    fn delete(&self, id: &PostingId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError>;
}
