//! Per-signal normalization onto the shared `[0, 100]` risk contribution scale.

use super::domain::{RawSignal, RiskInput, SignalScale};
use super::error::InputViolation;
use super::weights::CostBounds;

/// Linear interpolation between the configured bounds, clamped.
pub fn cost_contribution(cost: f64, bounds: &CostBounds) -> f64 {
    let span = bounds.max_cost - bounds.min_cost;
    (((cost - bounds.min_cost) / span) * 100.0).clamp(0.0, 100.0)
}

/// Inverted rating scale: 10 is no risk, 0 is full risk.
pub fn rating_contribution(rating: f64) -> f64 {
    (10.0 - rating) * 10.0
}

/// Inverse-count heuristic: zero reviews is maximal risk.
pub fn review_contribution(review_count: i64) -> f64 {
    (100.0 / (review_count as f64 + 1.0)).clamp(0.0, 100.0)
}

pub fn signal_contribution(signal: RawSignal) -> f64 {
    match signal.scale {
        SignalScale::Percent => signal.value,
        SignalScale::Centered => (signal.value + 100.0) / 2.0,
    }
}

/// Round half away from zero at two decimals.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn validate(input: &RiskInput) -> Result<(), InputViolation> {
    if input.presence().is_empty() {
        return Err(InputViolation::NoScorableAttributes);
    }

    if let Some(cost) = input.cost {
        if !cost.is_finite() {
            return Err(InputViolation::NonFinite { field: "cost" });
        }
        if cost < 0.0 {
            return Err(InputViolation::NegativeCost(cost));
        }
    }

    if let Some(rating) = input.rating {
        if !rating.is_finite() {
            return Err(InputViolation::NonFinite { field: "rating" });
        }
        if !(0.0..=10.0).contains(&rating) {
            return Err(InputViolation::RatingOutOfRange(rating));
        }
    }

    if let Some(count) = input.review_count {
        if count < 0 {
            return Err(InputViolation::NegativeReviewCount(count));
        }
    }

    if let Some(signal) = input.raw_signal {
        if !signal.value.is_finite() {
            return Err(InputViolation::NonFinite {
                field: "rawSignal",
            });
        }
        let (min, max) = signal.scale.bounds();
        if !(min..=max).contains(&signal.value) {
            return Err(InputViolation::SignalOutOfRange {
                value: signal.value,
                scale: signal.scale.label(),
                min,
                max,
            });
        }
    }

    Ok(())
}
