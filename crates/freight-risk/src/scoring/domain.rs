use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{InputViolation, ScoringError};
use super::normalize::round_percentage;
use super::weights::{SignalKind, SignalPresence};

/// Raw attributes of one scored entity: a supplier, a place, or a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_signal: Option<RawSignal>,
}

impl RiskInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cost: None,
            rating: None,
            review_count: None,
            raw_signal: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_review_count(mut self, review_count: i64) -> Self {
        self.review_count = Some(review_count);
        self
    }

    pub fn with_raw_signal(mut self, value: f64, scale: SignalScale) -> Self {
        self.raw_signal = Some(RawSignal { value, scale });
        self
    }

    pub fn presence(&self) -> SignalPresence {
        SignalPresence {
            cost: self.cost.is_some(),
            rating: self.rating.is_some(),
            reviews: self.review_count.is_some(),
            signal: self.raw_signal.is_some(),
        }
    }
}

/// Externally derived measure together with the scale the caller declares for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    pub value: f64,
    pub scale: SignalScale,
}

/// Declared unit of a raw signal.
///
/// `Percent` values are already a `[0, 100]` risk contribution. `Centered` values span
/// `[-100, 100]` with -100 the safest reading and +100 the riskiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalScale {
    Percent,
    Centered,
}

impl SignalScale {
    pub const fn label(self) -> &'static str {
        match self {
            SignalScale::Percent => "percent",
            SignalScale::Centered => "centered",
        }
    }

    pub const fn bounds(self) -> (f64, f64) {
        match self {
            SignalScale::Percent => (0.0, 100.0),
            SignalScale::Centered => (-100.0, 100.0),
        }
    }
}

/// Canonical ordered risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "No Risk")]
    NoRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Critical Risk")]
    CriticalRisk,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::NoRisk,
        RiskLevel::LowRisk,
        RiskLevel::ModerateRisk,
        RiskLevel::HighRisk,
        RiskLevel::CriticalRisk,
    ];

    /// Half-open `[low, high)` bands; the last band `[80, 100]` is closed.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 20.0 {
            RiskLevel::NoRisk
        } else if percentage < 40.0 {
            RiskLevel::LowRisk
        } else if percentage < 60.0 {
            RiskLevel::ModerateRisk
        } else if percentage < 80.0 {
            RiskLevel::HighRisk
        } else {
            RiskLevel::CriticalRisk
        }
    }

    pub const fn lower_bound(self) -> f64 {
        match self {
            RiskLevel::NoRisk => 0.0,
            RiskLevel::LowRisk => 20.0,
            RiskLevel::ModerateRisk => 40.0,
            RiskLevel::HighRisk => 60.0,
            RiskLevel::CriticalRisk => 80.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "No Risk",
            RiskLevel::LowRisk => "Low Risk",
            RiskLevel::ModerateRisk => "Moderate Risk",
            RiskLevel::HighRisk => "High Risk",
            RiskLevel::CriticalRisk => "Critical Risk",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            RiskLevel::NoRisk => "green",
            RiskLevel::LowRisk => "lightgreen",
            RiskLevel::ModerateRisk => "yellow",
            RiskLevel::HighRisk => "orange",
            RiskLevel::CriticalRisk => "red",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Attributes carried through from the input for display and rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_signal: Option<RawSignal>,
}

impl RiskAttributes {
    pub(crate) fn from_input(input: &RiskInput) -> Self {
        Self {
            cost: input.cost,
            rating: input.rating,
            review_count: input.review_count,
            raw_signal: input.raw_signal,
        }
    }

    fn rationale(&self, level: RiskLevel) -> String {
        format!(
            "{} — cost={}, rating={}/10, reviews={}",
            level.label(),
            display_or_na(self.cost),
            display_or_na(self.rating),
            display_or_na(self.review_count)
        )
    }
}

fn display_or_na<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

/// One signal's normalized contribution and the weight applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalContribution {
    pub signal: SignalKind,
    pub contribution: f64,
    pub weight: f64,
}

/// Output of scoring one candidate.
///
/// The unrounded weighted score and the product of applied external factors are kept so
/// that `risk_percentage` is rounded exactly once, however many factors are chained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub label: String,
    pub risk_percentage: f64,
    pub risk_level: RiskLevel,
    pub color_code: &'static str,
    pub rationale: String,
    pub attributes: RiskAttributes,
    pub contributions: Vec<SignalContribution>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied_factors: Vec<f64>,
    #[serde(skip)]
    weighted_score: f64,
    #[serde(skip)]
    factor_product: f64,
}

impl RiskResult {
    pub(crate) fn new(
        label: String,
        attributes: RiskAttributes,
        contributions: Vec<SignalContribution>,
        weighted_score: f64,
    ) -> Self {
        let mut result = Self {
            label,
            risk_percentage: 0.0,
            risk_level: RiskLevel::NoRisk,
            color_code: RiskLevel::NoRisk.color(),
            rationale: String::new(),
            attributes,
            contributions,
            applied_factors: Vec::new(),
            weighted_score,
            factor_product: 1.0,
        };
        result.refresh();
        result
    }

    /// Weighted sum of contributions before any external factor.
    pub fn weighted_score(&self) -> f64 {
        self.weighted_score
    }

    /// Clamped, unrounded score after all applied factors.
    pub fn adjusted_score(&self) -> f64 {
        (self.weighted_score * self.factor_product).clamp(0.0, 100.0)
    }

    /// Multiply the score by a caller-derived factor (weather severity, sentiment).
    pub fn apply_external_factor(mut self, factor: f64) -> Result<Self, ScoringError> {
        let product = self.factor_product * factor;
        if !factor.is_finite() || factor <= 0.0 || !product.is_finite() {
            return Err(ScoringError::invalid(
                &self.label,
                InputViolation::InvalidFactor(factor),
            ));
        }

        self.factor_product = product;
        self.applied_factors.push(factor);
        self.refresh();
        Ok(self)
    }

    fn refresh(&mut self) {
        self.risk_percentage = round_percentage(self.adjusted_score());
        self.risk_level = RiskLevel::from_percentage(self.risk_percentage);
        self.color_code = self.risk_level.color();
        self.rationale = self.attributes.rationale(self.risk_level);
    }
}

/// Ordered batch results with the lowest-risk candidate designated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringBatch {
    pub candidates: Vec<RiskResult>,
    pub best_index: usize,
    pub best_candidate: RiskResult,
}

impl ScoringBatch {
    pub(crate) fn from_results(candidates: Vec<RiskResult>) -> Result<Self, ScoringError> {
        let best_index = select_best(&candidates).ok_or(ScoringError::EmptyBatch)?;
        let best_candidate = candidates[best_index].clone();
        Ok(Self {
            candidates,
            best_index,
            best_candidate,
        })
    }

    /// Apply the same factor to every candidate and re-select the best one.
    pub fn apply_external_factor(self, factor: f64) -> Result<Self, ScoringError> {
        let candidates = self
            .candidates
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                result
                    .apply_external_factor(factor)
                    .map_err(|err| err.at_position(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_results(candidates)
    }

    /// Candidates ordered by ascending risk; equal scores keep input order.
    pub fn ranked(&self) -> Vec<&RiskResult> {
        let mut ranked: Vec<&RiskResult> = self.candidates.iter().collect();
        ranked.sort_by(|a, b| a.risk_percentage.total_cmp(&b.risk_percentage));
        ranked
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn select_best(candidates: &[RiskResult]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        match best {
            Some(current) if candidates[current].risk_percentage <= candidate.risk_percentage => {}
            _ => best = Some(index),
        }
    }
    best
}
