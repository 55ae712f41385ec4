//! Supplier catalog injected at startup, and the pure analyses over it.

mod analysis;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::RiskInput;

pub use analysis::{analyze_catalog, analyze_supplier, CatalogAnalysis};

/// Freight supplier as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    pub cost: f64,
    pub rating: f64,
    pub reviews: i64,
}

impl Supplier {
    pub fn risk_input(&self) -> RiskInput {
        RiskInput::new(self.name.clone())
            .with_cost(self.cost)
            .with_rating(self.rating)
            .with_review_count(self.reviews)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to open supplier catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed supplier catalog row: {0}")]
    Csv(#[from] csv::Error),
    #[error("supplier catalog is empty")]
    Empty,
    #[error("supplier catalog lists '{0}' more than once")]
    DuplicateSupplier(String),
}

/// Ordered supplier list; order is preserved through analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierCatalog {
    suppliers: Vec<Supplier>,
}

impl SupplierCatalog {
    pub fn new(suppliers: Vec<Supplier>) -> Result<Self, CatalogError> {
        if suppliers.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, supplier) in suppliers.iter().enumerate() {
            let key = normalize_name(&supplier.name);
            if suppliers[..index]
                .iter()
                .any(|earlier| normalize_name(&earlier.name) == key)
            {
                return Err(CatalogError::DuplicateSupplier(supplier.name.clone()));
            }
        }

        Ok(Self { suppliers })
    }

    /// Built-in catalog used when no CSV is configured.
    pub fn sample() -> Self {
        let supplier = |name: &str, cost: f64, rating: f64, reviews: i64| Supplier {
            name: name.to_string(),
            cost,
            rating,
            reviews,
        };

        Self {
            suppliers: vec![
                supplier("Reliable Transports", 50_000.0, 1.0, 5),
                supplier("Speedy Logistics", 55_000.0, 3.0, 1),
                supplier("Quick Haulers", 48_000.0, 7.0, 3),
                supplier("Safe cargo Movers", 52_000.0, 9.0, 2),
            ],
        }
    }

    /// Load a catalog from CSV with a `name,cost,rating,reviews` header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let suppliers = csv_reader
            .deserialize::<Supplier>()
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(suppliers)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }

    /// Case-insensitive lookup that ignores surrounding and repeated whitespace.
    pub fn find(&self, name: &str) -> Option<&Supplier> {
        let key = normalize_name(name);
        self.suppliers
            .iter()
            .find(|supplier| normalize_name(&supplier.name) == key)
    }

    pub fn risk_inputs(&self) -> Vec<RiskInput> {
        self.suppliers.iter().map(Supplier::risk_input).collect()
    }
}

fn normalize_name(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn loads_catalog_from_csv() {
        let csv = "name,cost,rating,reviews\nHarbor Freight Co, 41000 ,8.5,12\nInland Movers,58000,4,0\n";

        let catalog = SupplierCatalog::from_reader(Cursor::new(csv)).expect("catalog loads");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.suppliers()[0].name, "Harbor Freight Co");
        assert_eq!(catalog.suppliers()[0].cost, 41_000.0);
        assert_eq!(catalog.suppliers()[1].reviews, 0);
    }

    #[test]
    fn rejects_malformed_rows() {
        let csv = "name,cost,rating,reviews\nBroken,not-a-number,5,1\n";

        assert!(matches!(
            SupplierCatalog::from_reader(Cursor::new(csv)),
            Err(CatalogError::Csv(_))
        ));
    }

    #[test]
    fn rejects_empty_and_duplicate_catalogs() {
        assert!(matches!(
            SupplierCatalog::from_reader(Cursor::new("name,cost,rating,reviews\n")),
            Err(CatalogError::Empty)
        ));

        let csv = "name,cost,rating,reviews\nAcme,1,1,1\n  ACME ,2,2,2\n";
        assert!(matches!(
            SupplierCatalog::from_reader(Cursor::new(csv)),
            Err(CatalogError::DuplicateSupplier(name)) if name == "ACME"
        ));
    }

    #[test]
    fn find_ignores_case_and_spacing() {
        let catalog = SupplierCatalog::sample();

        let found = catalog.find("  quick   HAULERS ").expect("supplier found");

        assert_eq!(found.name, "Quick Haulers");
        assert!(catalog.find("Slow Haulers").is_none());
    }
}
