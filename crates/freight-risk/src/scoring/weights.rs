use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Signals a candidate can carry into the weighted combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Cost,
    Rating,
    Reviews,
    Signal,
}

impl SignalKind {
    pub const fn label(self) -> &'static str {
        match self {
            SignalKind::Cost => "cost",
            SignalKind::Rating => "rating",
            SignalKind::Reviews => "reviews",
            SignalKind::Signal => "signal",
        }
    }
}

/// Which signals are present on a candidate (or declared by a weight set).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalPresence {
    pub cost: bool,
    pub rating: bool,
    pub reviews: bool,
    pub signal: bool,
}

impl SignalPresence {
    pub fn is_empty(&self) -> bool {
        !(self.cost || self.rating || self.reviews || self.signal)
    }

    pub fn kinds(&self) -> Vec<SignalKind> {
        let mut kinds = Vec::with_capacity(4);
        if self.cost {
            kinds.push(SignalKind::Cost);
        }
        if self.rating {
            kinds.push(SignalKind::Rating);
        }
        if self.reviews {
            kinds.push(SignalKind::Reviews);
        }
        if self.signal {
            kinds.push(SignalKind::Signal);
        }
        kinds
    }

    pub fn describe(&self) -> String {
        self.kinds()
            .into_iter()
            .map(SignalKind::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Linear interpolation bounds for the cost contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBounds {
    pub min_cost: f64,
    pub max_cost: f64,
}

impl Default for CostBounds {
    fn default() -> Self {
        Self {
            min_cost: 40_000.0,
            max_cost: 60_000.0,
        }
    }
}

impl CostBounds {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.min_cost.is_finite() && self.max_cost.is_finite() && self.min_cost < self.max_cost
        {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidCostBounds {
                min: self.min_cost,
                max: self.max_cost,
            })
        }
    }
}

/// Weights for one declared signal combination. Absent signals are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<f64>,
}

impl WeightSet {
    /// Supplier scoring over cost, rating and review count.
    pub fn supplier(cost: f64, rating: f64, reviews: f64) -> Self {
        Self {
            cost: Some(cost),
            rating: Some(rating),
            reviews: Some(reviews),
            signal: None,
        }
    }

    /// Location or forecast scoring driven purely by an external signal.
    pub fn signal_only() -> Self {
        Self {
            signal: Some(1.0),
            ..Self::default()
        }
    }

    pub fn presence(&self) -> SignalPresence {
        SignalPresence {
            cost: self.cost.is_some(),
            rating: self.rating.is_some(),
            reviews: self.reviews.is_some(),
            signal: self.signal.is_some(),
        }
    }

    pub fn weight(&self, kind: SignalKind) -> Option<f64> {
        match kind {
            SignalKind::Cost => self.cost,
            SignalKind::Rating => self.rating,
            SignalKind::Reviews => self.reviews,
            SignalKind::Signal => self.signal,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let presence = self.presence();
        if presence.is_empty() {
            return Err(ConfigurationError::EmptyWeightSet);
        }

        let weights: Vec<f64> = presence
            .kinds()
            .into_iter()
            .filter_map(|kind| self.weight(kind))
            .collect();

        if let Some(weight) = weights
            .iter()
            .copied()
            .find(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(ConfigurationError::InvalidWeight {
                signals: presence.describe(),
                weight,
            });
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::WeightSum {
                signals: presence.describe(),
                sum,
            });
        }

        Ok(())
    }
}

/// Engine configuration: cost bounds plus one weight set per supported signal combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub cost_bounds: CostBounds,
    pub weight_sets: Vec<WeightSet>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            cost_bounds: CostBounds::default(),
            weight_sets: vec![WeightSet::supplier(0.5, 0.3, 0.2), WeightSet::signal_only()],
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.cost_bounds.validate()?;

        if self.weight_sets.is_empty() {
            return Err(ConfigurationError::NoWeightSets);
        }

        for (index, set) in self.weight_sets.iter().enumerate() {
            set.validate()?;
            let presence = set.presence();
            if self.weight_sets[..index]
                .iter()
                .any(|earlier| earlier.presence() == presence)
            {
                return Err(ConfigurationError::DuplicateWeightSet(presence.describe()));
            }
        }

        Ok(())
    }

    /// Replace (or add) the weight set declared for the same signal combination.
    pub fn with_weight_set(mut self, set: WeightSet) -> Self {
        let presence = set.presence();
        match self
            .weight_sets
            .iter_mut()
            .find(|existing| existing.presence() == presence)
        {
            Some(existing) => *existing = set,
            None => self.weight_sets.push(set),
        }
        self
    }

    pub(crate) fn weight_set_for(&self, presence: SignalPresence) -> Option<&WeightSet> {
        self.weight_sets
            .iter()
            .find(|set| set.presence() == presence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ScoringConfig::default()
            .validate()
            .expect("default weights sum to one");
    }

    #[test]
    fn weights_must_sum_to_one() {
        let config = ScoringConfig::default().with_weight_set(WeightSet::supplier(0.5, 0.3, 0.3));

        match config.validate() {
            Err(ConfigurationError::WeightSum { signals, sum }) => {
                assert_eq!(signals, "cost, rating, reviews");
                assert!((sum - 1.1).abs() < 1e-9);
            }
            other => panic!("expected weight sum error, got {other:?}"),
        }
    }

    #[test]
    fn tolerates_float_noise_in_weight_sum() {
        let config = ScoringConfig::default().with_weight_set(WeightSet::supplier(0.6, 0.3, 0.1));
        config.validate().expect("0.6 + 0.3 + 0.1 is accepted");
    }

    #[test]
    fn negative_weights_are_rejected() {
        let set = WeightSet::supplier(1.2, -0.2, 0.0);
        assert!(matches!(
            set.validate(),
            Err(ConfigurationError::InvalidWeight { weight, .. }) if weight == -0.2
        ));
    }

    #[test]
    fn duplicate_signal_combinations_are_rejected() {
        let config = ScoringConfig {
            cost_bounds: CostBounds::default(),
            weight_sets: vec![WeightSet::signal_only(), WeightSet::signal_only()],
        };

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::DuplicateWeightSet("signal".to_string()))
        );
    }

    #[test]
    fn inverted_cost_bounds_are_rejected() {
        let config = ScoringConfig {
            cost_bounds: CostBounds {
                min_cost: 60_000.0,
                max_cost: 40_000.0,
            },
            ..ScoringConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidCostBounds { .. })
        ));
    }

    #[test]
    fn with_weight_set_replaces_matching_combination() {
        let config = ScoringConfig::default().with_weight_set(WeightSet::supplier(0.4, 0.4, 0.2));

        assert_eq!(config.weight_sets.len(), 2);
        assert_eq!(config.weight_sets[0].cost, Some(0.4));
    }
}
