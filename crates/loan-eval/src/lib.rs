//! Loan evaluation pipeline: intake normalisation, heuristic scoring, loan
//! recommendations, and the session ledger that backs the dashboard.

pub mod config;
pub mod error;
pub mod evaluations;
pub mod intake;
pub mod report;
pub mod scoring;
pub mod telemetry;
