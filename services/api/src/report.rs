use clap::Args;
use freight_risk::config::{AppConfig, ConfigError};
use freight_risk::error::AppError;
use freight_risk::scoring::{apply_external_factors, RiskEngine, RiskInput, RiskResult};
use freight_risk::suppliers::{analyze_catalog, CatalogAnalysis, SupplierCatalog};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct SupplierAnalysisArgs {
    /// Supplier catalog CSV (name,cost,rating,reviews). Defaults to SUPPLIER_CATALOG_PATH or the built-in sample.
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Weather severity multiplier applied to every supplier
    #[arg(long)]
    pub(crate) weather_factor: Option<f64>,
    /// Market sentiment multiplier applied to every supplier
    #[arg(long)]
    pub(crate) sentiment_factor: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Candidate name shown in the result
    #[arg(long)]
    pub(crate) label: String,
    /// Quoted cost
    #[arg(long)]
    pub(crate) cost: Option<f64>,
    /// Rating on a 0-10 scale
    #[arg(long)]
    pub(crate) rating: Option<f64>,
    /// Number of reviews
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) reviews: Option<i64>,
    /// External factor applied after scoring (repeatable)
    #[arg(long = "factor")]
    pub(crate) factors: Vec<f64>,
}

pub(crate) fn run_supplier_analysis(args: SupplierAnalysisArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = RiskEngine::new(config.scoring.clone()).map_err(ConfigError::from)?;

    let (catalog, source) = match &args.catalog {
        Some(path) => (
            SupplierCatalog::from_path(path)?,
            path.display().to_string(),
        ),
        None => match &config.catalog.path {
            Some(path) => (config.catalog.load()?, path.display().to_string()),
            None => (SupplierCatalog::sample(), "built-in sample".to_string()),
        },
    };

    let factors = named_factors(&args);
    let analysis = factored_analysis(&engine, &catalog, &factors)?;
    render_supplier_analysis(&mut io::stdout().lock(), &analysis, &source, &factors)?;
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = RiskEngine::new(config.scoring).map_err(ConfigError::from)?;

    let result = score_from_args(&engine, &args)?;
    render_score(&mut io::stdout().lock(), &result)?;
    Ok(())
}

fn named_factors(args: &SupplierAnalysisArgs) -> Vec<(&'static str, f64)> {
    [
        ("weather", args.weather_factor),
        ("sentiment", args.sentiment_factor),
    ]
    .into_iter()
    .filter_map(|(name, factor)| factor.map(|factor| (name, factor)))
    .collect()
}

fn factored_analysis(
    engine: &RiskEngine,
    catalog: &SupplierCatalog,
    factors: &[(&'static str, f64)],
) -> Result<CatalogAnalysis, AppError> {
    let mut analysis = analyze_catalog(engine, catalog)?;
    for (_, factor) in factors {
        analysis = analysis.with_external_factor(*factor)?;
    }
    Ok(analysis)
}

fn score_from_args(engine: &RiskEngine, args: &ScoreArgs) -> Result<RiskResult, AppError> {
    let mut input = RiskInput::new(args.label.clone());
    input.cost = args.cost;
    input.rating = args.rating;
    input.review_count = args.reviews;

    let result = engine.score_candidate(&input)?;
    Ok(apply_external_factors(result, &args.factors)?)
}

pub(crate) fn render_supplier_analysis<W: Write>(
    out: &mut W,
    analysis: &CatalogAnalysis,
    source: &str,
    factors: &[(&'static str, f64)],
) -> io::Result<()> {
    writeln!(out, "Supplier risk analysis")?;
    writeln!(
        out,
        "Catalog: {} ({} suppliers)",
        source,
        analysis.batch.len()
    )?;
    if factors.is_empty() {
        writeln!(out, "Applied factors: none")?;
    } else {
        let listed = factors
            .iter()
            .map(|(name, factor)| format!("{name} {factor:.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "Applied factors: {listed}")?;
    }

    writeln!(out, "\n{:>3}  {:<24} {:>7}  Level", "#", "Supplier", "Risk %")?;
    for (rank, result) in analysis.batch.ranked().into_iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<24} {:>7.2}  {}",
            rank + 1,
            result.label,
            result.risk_percentage,
            result.risk_level
        )?;
    }

    let best = &analysis.batch.best_candidate;
    writeln!(
        out,
        "\nBest supplier: {} ({:.2}%, {})",
        best.label, best.risk_percentage, best.risk_level
    )?;
    writeln!(out, "Method: {}", analysis.analysis_method)
}

pub(crate) fn render_score<W: Write>(out: &mut W, result: &RiskResult) -> io::Result<()> {
    writeln!(
        out,
        "{}: {:.2}% {} ({})",
        result.label, result.risk_percentage, result.risk_level, result.color_code
    )?;
    writeln!(out, "{}", result.rationale)?;
    for contribution in &result.contributions {
        writeln!(
            out,
            "  {:<8} contribution {:>6.2} x weight {:.2}",
            contribution.signal.label(),
            contribution.contribution,
            contribution.weight
        )?;
    }
    if !result.applied_factors.is_empty() {
        let factors = result
            .applied_factors
            .iter()
            .map(|factor| format!("{factor:.2}"))
            .collect::<Vec<_>>()
            .join(" x ");
        writeln!(out, "  external factors: {factors}")?;
    }
    Ok(())
}
