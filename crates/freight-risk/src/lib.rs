//! Freight risk scoring: a pure weighted-risk engine for shipping and insurance
//! decisions, plus the supplier catalog, live-signal assessments, and record keeping
//! served over HTTP by `freight-risk-api`.

pub mod assessments;
pub mod config;
pub mod error;
pub mod integrations;
pub mod records;
pub mod scoring;
pub mod suppliers;
pub mod telemetry;
