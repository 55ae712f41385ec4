use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    NewVisit, ProfileSubmission, RecordValidation, UserId, UserProfile, Visit, VisitId,
    VisitUpdate,
};
use super::repository::{ProfileRepository, RepositoryError, VisitRepository};

/// Service over the visit and profile repositories.
pub struct RecordsService<V, P> {
    visits: Arc<V>,
    profiles: Arc<P>,
}

static VISIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_visit_id() -> VisitId {
    visit_id(VISIT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Padded to the full width of `u64` so string order matches creation order.
pub(crate) fn visit_id(sequence: u64) -> VisitId {
    VisitId(format!("visit-{sequence:020}"))
}

impl<V, P> RecordsService<V, P>
where
    V: VisitRepository + 'static,
    P: ProfileRepository + 'static,
{
    pub fn new(visits: Arc<V>, profiles: Arc<P>) -> Self {
        Self { visits, profiles }
    }

    pub fn create_visit(&self, user_id: &UserId, visit: NewVisit) -> Result<Visit, RecordsError> {
        visit.validate()?;
        let visit = visit.into_visit(next_visit_id(), user_id.clone(), Utc::now().date_naive());
        let stored = self.visits.insert(visit)?;
        info!(visit = %stored.id.0, user = %user_id.0, "visit recorded");
        Ok(stored)
    }

    /// Visits owned by the caller, newest first.
    pub fn list_visits(&self, user_id: &UserId) -> Result<Vec<Visit>, RecordsError> {
        let mut visits = self.visits.list_for_user(user_id)?;
        visits.sort_by(|a, b| {
            b.date_of_visit
                .cmp(&a.date_of_visit)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(visits)
    }

    pub fn update_visit(
        &self,
        user_id: &UserId,
        id: &VisitId,
        update: VisitUpdate,
    ) -> Result<Visit, RecordsError> {
        update.validate()?;
        let mut visit = self.owned_visit(user_id, id)?;
        update.apply(&mut visit);
        self.visits.update(visit.clone())?;
        Ok(visit)
    }

    pub fn delete_visit(&self, user_id: &UserId, id: &VisitId) -> Result<Visit, RecordsError> {
        self.owned_visit(user_id, id)?;
        let removed = self.visits.delete(id)?.ok_or(RepositoryError::NotFound)?;
        info!(visit = %id.0, user = %user_id.0, "visit deleted");
        Ok(removed)
    }

    pub fn create_profile(
        &self,
        user_id: &UserId,
        submission: ProfileSubmission,
    ) -> Result<UserProfile, RecordsError> {
        submission.validate()?;
        if self.profiles.fetch(user_id)?.is_some() {
            return Err(RepositoryError::Conflict.into());
        }
        let profile = submission.into_profile(user_id.clone(), Utc::now());
        Ok(self.profiles.insert(profile)?)
    }

    pub fn profile(&self, user_id: &UserId) -> Result<UserProfile, RecordsError> {
        let profile = self
            .profiles
            .fetch(user_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    /// Visits belonging to someone else are reported as missing.
    fn owned_visit(&self, user_id: &UserId, id: &VisitId) -> Result<Visit, RecordsError> {
        let visit = self
            .visits
            .fetch(id)?
            .filter(|visit| &visit.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(visit)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error(transparent)]
    Validation(#[from] RecordValidation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
