use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::records::domain::{NewVisit, ProfileSubmission, UserId, UserProfile, Visit, VisitId};
use crate::records::repository::{ProfileRepository, RepositoryError, VisitRepository};
use crate::records::RecordsService;

pub(super) type MemoryService = RecordsService<MemoryVisits, MemoryProfiles>;

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn new_visit(patient: &str, date: Option<NaiveDate>) -> NewVisit {
    NewVisit {
        patient_name: patient.to_string(),
        date_of_visit: date,
        doctor_name: Some("Dr. Iyer".to_string()),
        symptoms: vec![" fever ".to_string(), "cough".to_string()],
        prescription_url: "https://cdn.example.com/rx/1001.jpg".to_string(),
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn profile_submission() -> ProfileSubmission {
    ProfileSubmission {
        name: Some("Asha Rao".to_string()),
        username: "asha".to_string(),
        phone: Some("+91 98450 00000".to_string()),
        email: Some("asha@example.com".to_string()),
        address: None,
        age: Some(34),
        gender: None,
    }
}

pub(super) fn build_service() -> Arc<MemoryService> {
    Arc::new(RecordsService::new(
        Arc::new(MemoryVisits::default()),
        Arc::new(MemoryProfiles::default()),
    ))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("json body")
}

#[derive(Default)]
pub(super) struct MemoryVisits {
    visits: Mutex<HashMap<VisitId, Visit>>,
}

impl VisitRepository for MemoryVisits {
    fn insert(&self, visit: Visit) -> Result<Visit, RepositoryError> {
        let mut guard = self.visits.lock().expect("mutex");
        if guard.contains_key(&visit.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(visit.id.clone(), visit.clone());
        Ok(visit)
    }

    fn update(&self, visit: Visit) -> Result<(), RepositoryError> {
        let mut guard = self.visits.lock().expect("mutex");
        match guard.get_mut(&visit.id) {
            Some(slot) => {
                *slot = visit;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Ok(self.visits.lock().expect("mutex").get(id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Visit>, RepositoryError> {
        Ok(self
            .visits
            .lock()
            .expect("mutex")
            .values()
            .filter(|visit| &visit.user_id == user_id)
            .cloned()
            .collect())
    }

    fn delete(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Ok(self.visits.lock().expect("mutex").remove(id))
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl ProfileRepository for MemoryProfiles {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("mutex");
        if guard.contains_key(&profile.user_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        Ok(self.profiles.lock().expect("mutex").get(user_id).cloned())
    }
}

pub(super) struct UnavailableVisits;

impl VisitRepository for UnavailableVisits {
    fn insert(&self, _visit: Visit) -> Result<Visit, RepositoryError> {
        Err(RepositoryError::Unavailable("visit store offline".to_string()))
    }

    fn update(&self, _visit: Visit) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("visit store offline".to_string()))
    }

    fn fetch(&self, _id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Err(RepositoryError::Unavailable("visit store offline".to_string()))
    }

    fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Visit>, RepositoryError> {
        Err(RepositoryError::Unavailable("visit store offline".to_string()))
    }

    fn delete(&self, _id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Err(RepositoryError::Unavailable("visit store offline".to_string()))
    }
}
