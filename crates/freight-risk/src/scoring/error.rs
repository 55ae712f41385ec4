/// Typed failures returned by the risk engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid input {}: {reason}", subject(.label, .position))]
    InvalidInput {
        label: String,
        position: Option<usize>,
        reason: InputViolation,
    },
    #[error("batch scoring requires at least one candidate")]
    EmptyBatch,
    #[error("scoring configuration rejected: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ScoringError {
    pub(crate) fn invalid(label: &str, reason: InputViolation) -> Self {
        ScoringError::InvalidInput {
            label: label.to_string(),
            position: None,
            reason,
        }
    }

    pub(crate) fn at_position(self, index: usize) -> Self {
        match self {
            ScoringError::InvalidInput { label, reason, .. } => ScoringError::InvalidInput {
                label,
                position: Some(index),
                reason,
            },
            other => other,
        }
    }
}

fn subject(label: &str, position: &Option<usize>) -> String {
    match position {
        Some(index) => format!("at batch position {index} ('{label}')"),
        None => format!("for '{label}'"),
    }
}

/// Reason a candidate failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputViolation {
    #[error("no scorable attribute present")]
    NoScorableAttributes,
    #[error("rating {0} is outside [0, 10]")]
    RatingOutOfRange(f64),
    #[error("cost {0} is negative")]
    NegativeCost(f64),
    #[error("review count {0} is negative")]
    NegativeReviewCount(i64),
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("{scale} signal {value} is outside [{min}, {max}]")]
    SignalOutOfRange {
        value: f64,
        scale: &'static str,
        min: f64,
        max: f64,
    },
    #[error("no weight set declared for signals [{0}]")]
    UnsupportedSignals(String),
    #[error("external factor {0} must be a positive finite multiplier")]
    InvalidFactor(f64),
}

/// Weight or bound configuration that can never produce a valid score.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("weight set declares no signals")]
    EmptyWeightSet,
    #[error("weight set [{signals}] sums to {sum}, expected 1.0")]
    WeightSum { signals: String, sum: f64 },
    #[error("weight set [{signals}] carries invalid weight {weight}")]
    InvalidWeight { signals: String, weight: f64 },
    #[error("more than one weight set declared for signals [{0}]")]
    DuplicateWeightSet(String),
    #[error("cost bounds must be finite with min < max (min {min}, max {max})")]
    InvalidCostBounds { min: f64, max: f64 },
    #[error("no weight sets configured")]
    NoWeightSets,
}
