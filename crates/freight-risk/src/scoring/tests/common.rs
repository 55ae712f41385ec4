use crate::scoring::{RiskEngine, RiskInput, ScoringConfig};

pub(super) fn engine() -> RiskEngine {
    RiskEngine::new(ScoringConfig::default()).expect("default config is valid")
}

pub(super) fn supplier(label: &str, cost: f64, rating: f64, reviews: i64) -> RiskInput {
    RiskInput::new(label)
        .with_cost(cost)
        .with_rating(rating)
        .with_review_count(reviews)
}

pub(super) fn sample_suppliers() -> Vec<RiskInput> {
    vec![
        supplier("Reliable Transports", 50_000.0, 1.0, 5),
        supplier("Speedy Logistics", 55_000.0, 3.0, 1),
        supplier("Quick Haulers", 48_000.0, 7.0, 3),
        supplier("Safe cargo Movers", 52_000.0, 9.0, 2),
    ]
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
