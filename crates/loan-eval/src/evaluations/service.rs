use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::ledger::{EvaluationId, EvaluationLedger, EvaluationRecord, LedgerEntry, LedgerError};
use crate::intake::{Application, DataProcessor, ValidationReport, Validator};
use crate::report::DashboardSummary;
use crate::scoring::{EvaluationConfig, EvaluationEngine};

/// Runs applications through intake, validation and scoring, recording every
/// accepted evaluation in the session ledger.
pub struct LoanEvaluationService<L> {
    ledger: Arc<L>,
    processor: DataProcessor,
    validator: Validator,
    engine: Arc<EvaluationEngine>,
    sequence: AtomicU64,
}

impl<L> LoanEvaluationService<L>
where
    L: EvaluationLedger + 'static,
{
    pub fn new(ledger: Arc<L>, config: EvaluationConfig) -> Self {
        Self {
            ledger,
            processor: DataProcessor::new(),
            validator: Validator::new(),
            engine: Arc::new(EvaluationEngine::new(config)),
            sequence: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        self.engine.config()
    }

    fn next_evaluation_id(&self) -> EvaluationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        EvaluationId(format!("eval-{id:06}"))
    }

    /// Evaluate one application. Rejected applications are not scored and do
    /// not reach the ledger.
    pub fn evaluate(
        &self,
        application: Application,
    ) -> Result<EvaluationRecord, EvaluationServiceError> {
        let processed = self.processor.process(application);
        let validation = self.validator.validate(&processed.application);
        if !validation.is_valid {
            tracing::info!(
                errors = validation.errors.len(),
                "application rejected by validation"
            );
            return Err(EvaluationServiceError::Invalid(validation));
        }

        let result = self.engine.evaluate(&processed);

        let record = EvaluationRecord {
            id: self.next_evaluation_id(),
            submitted_at: Utc::now(),
            requested_amount: processed.application.requested_amount(),
            validation,
            result,
        };

        self.ledger.append(record.ledger_entry())?;

        tracing::info!(
            evaluation_id = %record.id,
            risk_score = record.result.risk_score(),
            credit_score = record.result.credit_score(),
            approved = record.result.approved,
            fallbacks = record.result.fallbacks().len(),
            "loan evaluation completed"
        );

        Ok(record)
    }

    pub fn history(&self) -> Result<Vec<LedgerEntry>, EvaluationServiceError> {
        Ok(self.ledger.entries()?)
    }

    pub fn dashboard(&self) -> Result<DashboardSummary, EvaluationServiceError> {
        let entries = self.ledger.entries()?;
        Ok(DashboardSummary::from_entries(&entries))
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("application failed validation with {} error(s)", .0.errors.len())]
    Invalid(ValidationReport),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
