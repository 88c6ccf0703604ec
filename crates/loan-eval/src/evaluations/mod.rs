//! Evaluation service, its session ledger, and the HTTP router over both.

pub mod ledger;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use ledger::{EvaluationId, EvaluationLedger, EvaluationRecord, LedgerEntry, LedgerError};
pub use router::evaluation_router;
pub use service::{EvaluationServiceError, LoanEvaluationService};
