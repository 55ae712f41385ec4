//! Per-user visit log and profile records.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    NewVisit, ProfileSubmission, RecordValidation, UserId, UserProfile, Visit, VisitId,
    VisitUpdate,
};
pub use repository::{ProfileRepository, RepositoryError, VisitRepository};
pub use router::{records_router, USER_ID_HEADER};
pub use service::{RecordsError, RecordsService};
