use loan_eval::error::AppError;
use loan_eval::evaluations::{EvaluationLedger, LedgerEntry, LedgerError};
use loan_eval::intake::Application;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session ledger. Entries live as long as the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationLedger {
    entries: Arc<Mutex<Vec<LedgerEntry>>>,
}

impl EvaluationLedger for InMemoryEvaluationLedger {
    fn append(&self, entry: LedgerEntry) -> Result<(), LedgerError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }
}

pub(crate) fn load_application(path: &Path) -> Result<Application, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let application = serde_json::from_str(&raw)?;
    Ok(application)
}
