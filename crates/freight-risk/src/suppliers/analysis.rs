use chrono::{DateTime, Utc};
use serde::Serialize;

use super::SupplierCatalog;
use crate::scoring::{RiskEngine, RiskResult, ScoringBatch, ScoringError};

pub const ANALYSIS_METHOD: &str =
    "Weighted risk assessment over supplier cost, rating, and review count";

/// Catalog-wide analysis: the scored batch plus labels ranked by ascending risk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAnalysis {
    pub batch: ScoringBatch,
    pub ranking: Vec<String>,
    pub analysis_method: &'static str,
    pub analysis_date: DateTime<Utc>,
}

impl CatalogAnalysis {
    pub(crate) fn from_batch(batch: ScoringBatch, analysis_date: DateTime<Utc>) -> Self {
        let ranking = batch
            .ranked()
            .into_iter()
            .map(|result| result.label.clone())
            .collect();

        Self {
            batch,
            ranking,
            analysis_method: ANALYSIS_METHOD,
            analysis_date,
        }
    }

    /// Apply one external factor to every supplier and re-rank; the analysis date is kept.
    pub fn with_external_factor(self, factor: f64) -> Result<Self, ScoringError> {
        let batch = self.batch.apply_external_factor(factor)?;
        Ok(Self::from_batch(batch, self.analysis_date))
    }
}

pub fn analyze_catalog(
    engine: &RiskEngine,
    catalog: &SupplierCatalog,
) -> Result<CatalogAnalysis, ScoringError> {
    let batch = engine.score_batch(&catalog.risk_inputs())?;
    Ok(CatalogAnalysis::from_batch(batch, Utc::now()))
}

/// Score one catalog entry by name; `Ok(None)` when the supplier is unknown.
pub fn analyze_supplier(
    engine: &RiskEngine,
    catalog: &SupplierCatalog,
    name: &str,
) -> Result<Option<RiskResult>, ScoringError> {
    catalog
        .find(name)
        .map(|supplier| engine.score_candidate(&supplier.risk_input()))
        .transpose()
}
