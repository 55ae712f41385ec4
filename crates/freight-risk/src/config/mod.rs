use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::integrations::HttpSettings;
use crate::scoring::{ConfigurationError, CostBounds, ScoringConfig, WeightSet};
use crate::suppliers::{CatalogError, SupplierCatalog};

const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_GEOCODING_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub integrations: IntegrationConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: load_scoring()?,
            integrations: IntegrationConfig::load()?,
            catalog: CatalogConfig {
                path: optional_var("SUPPLIER_CATALOG_PATH").map(PathBuf::from),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// External API endpoints and credentials. Missing keys are tolerated at startup; the
/// affected routes answer 503 until they are configured.
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    pub openweather: HttpSettings,
    pub geocoding_base_url: String,
    pub gemini: HttpSettings,
    pub gemini_model: String,
}

impl IntegrationConfig {
    fn load() -> Result<Self, ConfigError> {
        let timeout = Duration::from_secs(parse_var(
            "HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        Ok(Self {
            openweather: HttpSettings {
                base_url: optional_var("OPENWEATHER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
                api_key: optional_var("OPENWEATHER_API_KEY"),
                timeout,
            },
            geocoding_base_url: optional_var("GEOCODING_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEOCODING_BASE_URL.to_string()),
            gemini: HttpSettings {
                base_url: optional_var("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                api_key: optional_var("GEMINI_API_KEY"),
                timeout,
            },
            gemini_model: optional_var("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }
}

/// Where the supplier catalog comes from.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Read the configured CSV, or fall back to the built-in sample catalog.
    pub fn load(&self) -> Result<SupplierCatalog, CatalogError> {
        match &self.path {
            Some(path) => SupplierCatalog::from_path(path),
            None => Ok(SupplierCatalog::sample()),
        }
    }
}

fn load_scoring() -> Result<ScoringConfig, ConfigError> {
    let defaults = CostBounds::default();
    let cost_bounds = CostBounds {
        min_cost: parse_var("SCORING_MIN_COST", defaults.min_cost)?,
        max_cost: parse_var("SCORING_MAX_COST", defaults.max_cost)?,
    };

    let mut config = ScoringConfig {
        cost_bounds,
        ..ScoringConfig::default()
    };
    if let Some(raw) = optional_var("SCORING_SUPPLIER_WEIGHTS") {
        config = config.with_weight_set(parse_supplier_weights(&raw)?);
    }

    config.validate()?;
    Ok(config)
}

/// Parse `cost,rating,reviews` weights, e.g. `0.5,0.3,0.2`.
pub fn parse_supplier_weights(raw: &str) -> Result<WeightSet, ConfigError> {
    let invalid = || ConfigError::InvalidWeights {
        value: raw.to_string(),
    };

    let weights = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    match weights.as_slice() {
        [cost, rating, reviews] => Ok(WeightSet::supplier(*cost, *rating, *reviews)),
        _ => Err(invalid()),
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(key) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidWeights { value: String },
    Scoring(ConfigurationError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric, got '{value}'")
            }
            ConfigError::InvalidWeights { value } => write!(
                f,
                "SCORING_SUPPLIER_WEIGHTS must be three comma-separated numbers, got '{value}'"
            ),
            ConfigError::Scoring(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Scoring(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidWeights { .. } => None,
        }
    }
}

impl From<ConfigurationError> for ConfigError {
    fn from(value: ConfigurationError) -> Self {
        Self::Scoring(value)
    }
}
