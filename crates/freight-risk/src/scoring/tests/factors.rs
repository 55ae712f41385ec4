use super::common::*;
use crate::scoring::{apply_external_factors, InputViolation, RiskLevel, ScoringError};

#[test]
fn unit_factor_is_a_no_op() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Reliable Transports", 50_000.0, 1.0, 5))
        .expect("scores");

    let adjusted = result
        .clone()
        .apply_external_factor(1.0)
        .expect("unit factor applies");

    assert_eq!(adjusted.risk_percentage, result.risk_percentage);
    assert_eq!(adjusted.risk_level, result.risk_level);
    assert_eq!(adjusted.rationale, result.rationale);
    assert_eq!(adjusted.applied_factors, vec![1.0]);
}

#[test]
fn factor_rederives_level_and_rationale() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Quick Haulers", 48_000.0, 7.0, 3))
        .expect("scores");

    let adjusted = result.apply_external_factor(1.5).expect("factor applies");

    assert_eq!(adjusted.risk_percentage, 51.0);
    assert_eq!(adjusted.risk_level, RiskLevel::ModerateRisk);
    assert!(adjusted.rationale.starts_with("Moderate Risk"));
}

#[test]
fn factor_result_is_clamped_to_hundred() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Speedy Logistics", 55_000.0, 3.0, 1))
        .expect("scores");

    let adjusted = result.apply_external_factor(2.0).expect("factor applies");

    assert_eq!(adjusted.risk_percentage, 100.0);
    assert_eq!(adjusted.risk_level, RiskLevel::CriticalRisk);
}

#[test]
fn chained_factors_round_once_and_ignore_order() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Reliable Transports", 50_000.0, 1.0, 5))
        .expect("scores");

    let forward = apply_external_factors(result.clone(), &[1.13, 0.87, 1.07]).expect("applies");
    let backward = apply_external_factors(result.clone(), &[1.07, 0.87, 1.13]).expect("applies");

    let expected = result.weighted_score() * 1.13 * 0.87 * 1.07;
    assert_eq!(
        forward.risk_percentage,
        (expected * 100.0).round() / 100.0
    );
    assert_eq!(forward.risk_percentage, backward.risk_percentage);
}

#[test]
fn non_positive_factor_is_rejected() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Quick Haulers", 48_000.0, 7.0, 3))
        .expect("scores");

    for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        match result.clone().apply_external_factor(factor) {
            Err(ScoringError::InvalidInput {
                reason: InputViolation::InvalidFactor(_),
                ..
            }) => {}
            other => panic!("expected invalid factor for {factor}, got {other:?}"),
        }
    }
}

#[test]
fn batch_factor_reselects_best_candidate() {
    let engine = engine();
    let batch = engine.score_batch(&sample_suppliers()).expect("scores");

    let adjusted = batch.apply_external_factor(1.2).expect("factor applies");

    assert_eq!(adjusted.len(), 4);
    assert_eq!(adjusted.best_candidate.label, "Quick Haulers");
    assert_eq!(adjusted.best_candidate.risk_percentage, 40.8);
    assert!(adjusted
        .candidates
        .iter()
        .all(|result| result.applied_factors == vec![1.2]));
}

#[test]
fn factor_that_overflows_the_running_product_is_rejected() {
    let engine = engine();
    let result = engine
        .score_candidate(&supplier("Reliable Transports", 50_000.0, 1.0, 5))
        .expect("scores");

    let saturated = result
        .apply_external_factor(1e200)
        .expect("large finite factor applies");
    assert_eq!(saturated.risk_percentage, 100.0);

    let error = saturated
        .apply_external_factor(1e200)
        .expect_err("product would overflow");

    assert!(matches!(
        error,
        ScoringError::InvalidInput {
            reason: InputViolation::InvalidFactor(factor),
            ..
        } if factor == 1e200
    ));
}
