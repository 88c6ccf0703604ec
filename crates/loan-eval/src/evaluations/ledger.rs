use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intake::ValidationReport;
use crate::scoring::{EvaluationResult, RiskCategory};

/// Identifier wrapper for completed evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full outcome of one evaluation as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    pub submitted_at: DateTime<Utc>,
    pub requested_amount: Option<f64>,
    pub validation: ValidationReport,
    pub result: EvaluationResult,
}

impl EvaluationRecord {
    pub fn ledger_entry(&self) -> LedgerEntry {
        LedgerEntry {
            id: self.id.clone(),
            submitted_at: self.submitted_at,
            requested_amount: self.requested_amount,
            risk_score: self.result.risk_score(),
            risk_category: self.result.risk.value.risk_category,
            credit_score: self.result.credit_score(),
            approved: self.result.approved,
            recommended_amount: self.result.recommendation.value.recommended_amount,
        }
    }
}

/// Summary row kept for every evaluation in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EvaluationId,
    pub submitted_at: DateTime<Utc>,
    pub requested_amount: Option<f64>,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub credit_score: u16,
    pub approved: bool,
    pub recommended_amount: f64,
}

/// Append-only storage for the session's evaluation history.
pub trait EvaluationLedger: Send + Sync {
    fn append(&self, entry: LedgerEntry) -> Result<(), LedgerError>;
    /// Entries in insertion order, oldest first.
    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}
