use super::domain::{UserId, UserProfile, Visit, VisitId};

/// Storage abstraction for visits so the service can be exercised in isolation.
pub trait VisitRepository: Send + Sync {
    fn insert(&self, visit: Visit) -> Result<Visit, RepositoryError>;
    fn update(&self, visit: Visit) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError>;
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Visit>, RepositoryError>;
    fn delete(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError>;
}

/// One profile per user.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError>;
    fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
