use freight_risk::assessments::AssessmentService;
use freight_risk::config::{AppConfig, ConfigError};
use freight_risk::error::AppError;
use freight_risk::integrations::{GeminiClient, OpenWeatherClient};
use freight_risk::records::{
    ProfileRepository, RepositoryError, UserId, UserProfile, Visit, VisitId, VisitRepository,
};
use freight_risk::scoring::RiskEngine;
use freight_risk::suppliers::SupplierCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared scoring state handed to the risk, supplier and assessment routes.
#[derive(Clone)]
pub(crate) struct RiskState {
    pub(crate) engine: Arc<RiskEngine>,
    pub(crate) catalog: Arc<SupplierCatalog>,
    pub(crate) assessments: Arc<AssessmentService>,
}

impl RiskState {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let engine =
            Arc::new(RiskEngine::new(config.scoring.clone()).map_err(ConfigError::from)?);
        let catalog = Arc::new(config.catalog.load()?);

        let integrations = &config.integrations;
        let weather = Arc::new(OpenWeatherClient::new(
            integrations.openweather.clone(),
            integrations.geocoding_base_url.clone(),
        )?);
        let generator = Arc::new(GeminiClient::new(
            integrations.gemini.clone(),
            integrations.gemini_model.clone(),
        )?);

        let assessments = Arc::new(AssessmentService::new(
            engine.clone(),
            catalog.clone(),
            weather.clone(),
            weather,
            generator,
        ));

        Ok(Self {
            engine,
            catalog,
            assessments,
        })
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryVisitRepository {
    visits: Arc<Mutex<HashMap<VisitId, Visit>>>,
}

impl InMemoryVisitRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<VisitId, Visit>>, RepositoryError> {
        self.visits
            .lock()
            .map_err(|_| RepositoryError::Unavailable("visit store lock poisoned".to_string()))
    }
}

impl VisitRepository for InMemoryVisitRepository {
    fn insert(&self, visit: Visit) -> Result<Visit, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&visit.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(visit.id.clone(), visit.clone());
        Ok(visit)
    }

    fn update(&self, visit: Visit) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&visit.id) {
            guard.insert(visit.id.clone(), visit);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Visit>, RepositoryError> {
        Ok(self
            .guard()?
            .values()
            .filter(|visit| &visit.user_id == user_id)
            .cloned()
            .collect())
    }

    fn delete(&self, id: &VisitId) -> Result<Option<Visit>, RepositoryError> {
        Ok(self.guard()?.remove(id))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn insert(&self, profile: UserProfile) -> Result<UserProfile, RepositoryError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store lock poisoned".to_string()))?;
        if guard.contains_key(&profile.user_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }

    fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store lock poisoned".to_string()))?;
        Ok(guard.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn visit(id: &str, user: &str) -> Visit {
        Visit {
            id: VisitId(id.to_string()),
            user_id: UserId(user.to_string()),
            patient_name: "Ravi".to_string(),
            date_of_visit: NaiveDate::from_ymd_opt(2024, 5, 9).expect("valid date"),
            doctor_name: "Dr. Iyer".to_string(),
            symptoms: Vec::new(),
            prescription_url: "https://cdn.example.com/rx/1.jpg".to_string(),
        }
    }

    #[test]
    fn visit_repository_scopes_listing_by_user() {
        let repository = InMemoryVisitRepository::default();
        repository.insert(visit("visit-1", "u-1")).expect("stored");
        repository.insert(visit("visit-2", "u-2")).expect("stored");

        let listed = repository
            .list_for_user(&UserId("u-1".to_string()))
            .expect("listed");

        assert_eq!(listed.len(), 1);
        assert!(matches!(
            repository.insert(visit("visit-1", "u-1")),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            repository.update(visit("visit-9", "u-1")),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn risk_state_builds_from_default_config_without_credentials() {
        let config = offline_config();

        let state = RiskState::from_config(&config).expect("state builds");

        assert_eq!(state.catalog.len(), 4);
        assert_eq!(state.engine.config(), &config.scoring);
    }
}

/// Configuration with the sample catalog and unreachable, keyless integrations.
#[cfg(test)]
pub(crate) fn offline_config() -> AppConfig {
    use freight_risk::config::{
        AppEnvironment, CatalogConfig, IntegrationConfig, ServerConfig, TelemetryConfig,
    };
    use freight_risk::integrations::HttpSettings;
    use std::time::Duration;

    let offline = || HttpSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: None,
        timeout: Duration::from_secs(1),
    };

    AppConfig {
        environment: AppEnvironment::Test,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
        },
        scoring: freight_risk::scoring::ScoringConfig::default(),
        integrations: IntegrationConfig {
            openweather: offline(),
            geocoding_base_url: "http://127.0.0.1:9".to_string(),
            gemini: offline(),
            gemini_model: "gemini-2.5-flash".to_string(),
        },
        catalog: CatalogConfig::default(),
    }
}
