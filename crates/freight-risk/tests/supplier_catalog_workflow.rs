//! Integration tests for catalog loading and supplier analysis through the
//! public crate surface.

mod common {
    use std::fs;
    use std::path::PathBuf;

    pub(super) const CATALOG_CSV: &str = "\
name,cost,rating,reviews
Coastal Carriers,42000,8,9
Northern Freight,58000,6,4
Budget Movers,40000,2,0
";

    pub(super) fn write_catalog(file_name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "freight-risk-{}-{file_name}",
            std::process::id()
        ));
        fs::write(&path, CATALOG_CSV).expect("catalog written");
        path
    }
}

use common::*;
use freight_risk::config::CatalogConfig;
use freight_risk::scoring::{RiskEngine, RiskLevel, ScoringConfig};
use freight_risk::suppliers::{analyze_catalog, analyze_supplier, SupplierCatalog};

#[test]
fn configured_catalog_is_scored_and_ranked() {
    let path = write_catalog("ranked.csv");
    let catalog = CatalogConfig {
        path: Some(path.clone()),
    }
    .load()
    .expect("catalog loads");
    let engine = RiskEngine::new(ScoringConfig::default()).expect("valid config");

    let analysis = analyze_catalog(&engine, &catalog).expect("catalog scores");

    // Coastal: 10*0.5 + 20*0.3 + 10*0.2 = 13
    // Northern: 90*0.5 + 40*0.3 + 20*0.2 = 61
    // Budget: 0*0.5 + 80*0.3 + 100*0.2 = 44
    let scores: Vec<f64> = analysis
        .batch
        .candidates
        .iter()
        .map(|result| result.risk_percentage)
        .collect();
    assert_eq!(scores, vec![13.0, 61.0, 44.0]);
    assert_eq!(analysis.batch.best_index, 0);
    assert_eq!(analysis.batch.best_candidate.risk_level, RiskLevel::NoRisk);
    assert_eq!(
        analysis.ranking,
        vec!["Coastal Carriers", "Budget Movers", "Northern Freight"]
    );

    std::fs::remove_file(path).ok();
}

#[test]
fn catalog_factor_shifts_levels_but_keeps_order() {
    let engine = RiskEngine::new(ScoringConfig::default()).expect("valid config");
    let catalog = SupplierCatalog::sample();

    let analysis = analyze_catalog(&engine, &catalog).expect("catalog scores");
    let adjusted = analysis
        .batch
        .clone()
        .apply_external_factor(1.5)
        .expect("factor applies");

    assert_eq!(adjusted.best_index, analysis.batch.best_index);
    assert_eq!(adjusted.best_candidate.risk_percentage, 51.0);
    assert_eq!(adjusted.best_candidate.risk_level, RiskLevel::ModerateRisk);
    let speedy = &adjusted.candidates[1];
    assert_eq!(speedy.label, "Speedy Logistics");
    assert_eq!(speedy.risk_percentage, 100.0);
    assert_eq!(speedy.risk_level, RiskLevel::CriticalRisk);
}

#[test]
fn single_supplier_lookup_uses_catalog_names() {
    let path = write_catalog("lookup.csv");
    let catalog = SupplierCatalog::from_path(&path).expect("catalog loads");
    let engine = RiskEngine::new(ScoringConfig::default()).expect("valid config");

    let result = analyze_supplier(&engine, &catalog, "budget movers")
        .expect("scores")
        .expect("supplier exists");
    assert_eq!(result.label, "Budget Movers");
    assert_eq!(result.risk_percentage, 44.0);
    assert_eq!(
        result.rationale,
        "Moderate Risk — cost=40000, rating=2/10, reviews=0"
    );

    assert!(analyze_supplier(&engine, &catalog, "Quick Haulers")
        .expect("no error")
        .is_none());

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_catalog_file_is_an_io_error() {
    let config = CatalogConfig {
        path: Some(std::env::temp_dir().join("freight-risk-does-not-exist.csv")),
    };

    assert!(matches!(
        config.load(),
        Err(freight_risk::suppliers::CatalogError::Io(_))
    ));
}
