//! Risk scoring engine.
//!
//! Pure computation: candidates are validated, each present signal is normalized onto a
//! `[0, 100]` contribution, contributions are combined with the weight set declared for
//! that signal combination, and the result is rounded and labelled. Nothing here performs
//! I/O or logs; callers own recovery policy.

mod domain;
mod error;
pub mod normalize;
mod weights;

#[cfg(test)]
mod tests;

pub use domain::{
    RawSignal, RiskAttributes, RiskInput, RiskLevel, RiskResult, ScoringBatch,
    SignalContribution, SignalScale,
};
pub use error::{ConfigurationError, InputViolation, ScoringError};
pub use weights::{CostBounds, ScoringConfig, SignalKind, SignalPresence, WeightSet};

/// Stateless scorer over a validated configuration. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: ScoringConfig,
}

impl RiskEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score_candidate(&self, input: &RiskInput) -> Result<RiskResult, ScoringError> {
        normalize::validate(input).map_err(|reason| ScoringError::invalid(&input.label, reason))?;

        let presence = input.presence();
        let weights = self.config.weight_set_for(presence).ok_or_else(|| {
            ScoringError::invalid(
                &input.label,
                InputViolation::UnsupportedSignals(presence.describe()),
            )
        })?;

        let mut contributions = Vec::with_capacity(4);
        for kind in presence.kinds() {
            let contribution = match kind {
                SignalKind::Cost => input
                    .cost
                    .map(|cost| normalize::cost_contribution(cost, &self.config.cost_bounds)),
                SignalKind::Rating => input.rating.map(normalize::rating_contribution),
                SignalKind::Reviews => input.review_count.map(normalize::review_contribution),
                SignalKind::Signal => input.raw_signal.map(normalize::signal_contribution),
            };
            if let (Some(contribution), Some(weight)) = (contribution, weights.weight(kind)) {
                contributions.push(SignalContribution {
                    signal: kind,
                    contribution,
                    weight,
                });
            }
        }

        let weighted_score = contributions
            .iter()
            .map(|entry| entry.contribution * entry.weight)
            .sum::<f64>();

        Ok(RiskResult::new(
            input.label.clone(),
            RiskAttributes::from_input(input),
            contributions,
            weighted_score,
        ))
    }

    /// Score every input in order. One invalid element fails the whole batch.
    pub fn score_batch(&self, inputs: &[RiskInput]) -> Result<ScoringBatch, ScoringError> {
        if inputs.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        let results = inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                self.score_candidate(input)
                    .map_err(|err| err.at_position(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        ScoringBatch::from_results(results)
    }
}

/// Apply each factor in turn; the presented score is rounded once after the last one.
pub fn apply_external_factors(
    result: RiskResult,
    factors: &[f64],
) -> Result<RiskResult, ScoringError> {
    factors
        .iter()
        .try_fold(result, |result, factor| result.apply_external_factor(*factor))
}
