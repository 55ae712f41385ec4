use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of the caller, as asserted by upstream infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(pub String);

/// A logged visit with a link to its already uploaded prescription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: VisitId,
    pub user_id: UserId,
    pub patient_name: String,
    pub date_of_visit: NaiveDate,
    pub doctor_name: String,
    pub symptoms: Vec<String>,
    pub prescription_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub patient_name: String,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date_of_visit: Option<NaiveDate>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub prescription_url: String,
}

pub const UNKNOWN_DOCTOR: &str = "Unknown";

impl NewVisit {
    pub fn validate(&self) -> Result<(), RecordValidation> {
        require("patientName", &self.patient_name)?;
        if let Some(doctor) = &self.doctor_name {
            require("doctorName", doctor)?;
        }
        validate_symptoms(&self.symptoms)?;
        validate_url(&self.prescription_url)
    }

    pub(crate) fn into_visit(self, id: VisitId, user_id: UserId, today: NaiveDate) -> Visit {
        Visit {
            id,
            user_id,
            patient_name: self.patient_name.trim().to_string(),
            date_of_visit: self.date_of_visit.unwrap_or(today),
            doctor_name: self
                .doctor_name
                .map(|name| name.trim().to_string())
                .unwrap_or_else(|| UNKNOWN_DOCTOR.to_string()),
            symptoms: trimmed(self.symptoms),
            prescription_url: self.prescription_url.trim().to_string(),
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitUpdate {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub date_of_visit: Option<NaiveDate>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
    #[serde(default)]
    pub prescription_url: Option<String>,
}

impl VisitUpdate {
    pub fn is_empty(&self) -> bool {
        self.patient_name.is_none()
            && self.date_of_visit.is_none()
            && self.doctor_name.is_none()
            && self.symptoms.is_none()
            && self.prescription_url.is_none()
    }

    pub fn validate(&self) -> Result<(), RecordValidation> {
        if self.is_empty() {
            return Err(RecordValidation::EmptyUpdate);
        }
        if let Some(name) = &self.patient_name {
            require("patientName", name)?;
        }
        if let Some(doctor) = &self.doctor_name {
            require("doctorName", doctor)?;
        }
        if let Some(symptoms) = &self.symptoms {
            validate_symptoms(symptoms)?;
        }
        if let Some(url) = &self.prescription_url {
            validate_url(url)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, visit: &mut Visit) {
        if let Some(name) = self.patient_name {
            visit.patient_name = name.trim().to_string();
        }
        if let Some(date) = self.date_of_visit {
            visit.date_of_visit = date;
        }
        if let Some(doctor) = self.doctor_name {
            visit.doctor_name = doctor.trim().to_string();
        }
        if let Some(symptoms) = self.symptoms {
            visit.symptoms = trimmed(symptoms);
        }
        if let Some(url) = self.prescription_url {
            visit.prescription_url = url.trim().to_string();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: Option<String>,
    pub username: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSubmission {
    #[serde(default)]
    pub name: Option<String>,
    pub username: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl ProfileSubmission {
    pub fn validate(&self) -> Result<(), RecordValidation> {
        require("username", &self.username)?;
        if let Some(email) = &self.email {
            let email = email.trim();
            let well_formed = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !well_formed {
                return Err(RecordValidation::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }

    pub(crate) fn into_profile(self, user_id: UserId, created_at: DateTime<Utc>) -> UserProfile {
        UserProfile {
            user_id,
            name: self.name,
            username: self.username.trim().to_string(),
            phone: self.phone,
            email: self.email.map(|email| email.trim().to_string()),
            address: self.address,
            age: self.age,
            gender: self.gender,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidation {
    #[error("{0} must not be blank")]
    BlankField(&'static str),
    #[error("prescriptionUrl must be an http(s) URL, got '{0}'")]
    InvalidPrescriptionUrl(String),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("update carries no fields")]
    EmptyUpdate,
}

fn require(field: &'static str, value: &str) -> Result<(), RecordValidation> {
    if value.trim().is_empty() {
        Err(RecordValidation::BlankField(field))
    } else {
        Ok(())
    }
}

fn validate_symptoms(symptoms: &[String]) -> Result<(), RecordValidation> {
    symptoms
        .iter()
        .try_for_each(|symptom| require("symptoms", symptom))
}

fn validate_url(url: &str) -> Result<(), RecordValidation> {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(RecordValidation::InvalidPrescriptionUrl(url.to_string()))
    }
}

fn trimmed(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .collect()
}
